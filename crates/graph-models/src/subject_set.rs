//! Subject sets: who may approve a request.
//!
//! `SubjectSet` is abstract on the service. Payloads always carry a
//! concrete subtype, selected by `@odata.type`.

use std::ops::{Deref, DerefMut};

use graph_core::accessor;
use graph_core::parsable::{FieldDeserializers, field, inherit};
use graph_core::store::default_backing_store;
use graph_core::{BackingStore, ODATA_TYPE_KEY, Parsable, ParseNode, Result, SerializationWriter};
use tracing::debug;

use crate::odata;

/// `microsoft.graph.subjectSet`.
#[derive(Debug, Clone)]
pub struct SubjectSet {
    store: Box<dyn BackingStore>,
}

impl Default for SubjectSet {
    fn default() -> Self {
        Self::new()
    }
}

impl SubjectSet {
    pub fn new() -> Self {
        Self::with_odata_type(odata::SUBJECT_SET)
    }

    fn with_odata_type(odata_type: &str) -> Self {
        let mut set = Self {
            store: default_backing_store(),
        };
        set.set_odata_type(Some(odata_type.to_owned()));
        set
    }

    pub fn create_from_discriminator_value(node: &dyn ParseNode) -> Result<Box<dyn Parsable>> {
        let discriminator = node.discriminator();
        debug!(discriminator = discriminator.as_deref(), "subject set factory");
        Ok(match discriminator.as_deref() {
            Some(odata::SINGLE_USER) => Box::new(SingleUser::new()),
            Some(odata::GROUP_MEMBERS) => Box::new(GroupMembers::new()),
            _ => Box::new(Self::new()),
        })
    }

    /// Views any subject set model as its `SubjectSet` base.
    pub fn of(model: &dyn Parsable) -> Option<&SubjectSet> {
        let any = model.as_any();
        any.downcast_ref::<SubjectSet>()
            .or_else(|| any.downcast_ref::<SingleUser>().map(|m| &m.base))
            .or_else(|| any.downcast_ref::<GroupMembers>().map(|m| &m.base))
    }

    pub fn store(&self) -> &dyn BackingStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn BackingStore {
        self.store.as_mut()
    }

    pub fn odata_type(&self) -> Option<&str> {
        accessor::get_str(self.store(), ODATA_TYPE_KEY)
    }

    pub fn set_odata_type(&mut self, value: Option<String>) {
        accessor::set(self.store_mut(), ODATA_TYPE_KEY, value);
    }

    fn serialize_members(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        writer.write_string_value(Some(ODATA_TYPE_KEY), self.odata_type())
    }

    pub fn serialize_fields(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        self.serialize_members(writer)?;
        writer.write_additional_data(Parsable::additional_data(self))
    }

    pub fn field_deserializers() -> FieldDeserializers<Self> {
        FieldDeserializers::from([(
            ODATA_TYPE_KEY,
            field(|m: &mut Self, n: &dyn ParseNode| {
                m.set_odata_type(n.get_string_value()?);
                Ok(())
            }),
        )])
    }
}

graph_core::impl_parsable!(SubjectSet);

/// A single named user as approver.
#[derive(Debug, Clone)]
pub struct SingleUser {
    base: SubjectSet,
}

impl Default for SingleUser {
    fn default() -> Self {
        Self::new()
    }
}

impl SingleUser {
    pub fn new() -> Self {
        Self {
            base: SubjectSet::with_odata_type(odata::SINGLE_USER),
        }
    }

    pub fn create_from_discriminator_value(_node: &dyn ParseNode) -> Result<Box<dyn Parsable>> {
        Ok(Box::new(Self::new()))
    }

    pub fn store(&self) -> &dyn BackingStore {
        self.base.store()
    }

    pub fn store_mut(&mut self) -> &mut dyn BackingStore {
        self.base.store_mut()
    }

    fn base_mut(&mut self) -> &mut SubjectSet {
        &mut self.base
    }

    pub fn description(&self) -> Option<&str> {
        accessor::get_str(self.store(), "description")
    }

    pub fn set_description(&mut self, value: Option<String>) {
        accessor::set(self.store_mut(), "description", value);
    }

    pub fn user_id(&self) -> Option<&str> {
        accessor::get_str(self.store(), "userId")
    }

    pub fn set_user_id(&mut self, value: Option<String>) {
        accessor::set(self.store_mut(), "userId", value);
    }

    pub fn serialize_fields(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        self.base.serialize_members(writer)?;
        writer.write_string_value(Some("description"), self.description())?;
        writer.write_string_value(Some("userId"), self.user_id())?;
        writer.write_additional_data(Parsable::additional_data(self))
    }

    pub fn field_deserializers() -> FieldDeserializers<Self> {
        let mut table = inherit(SubjectSet::field_deserializers(), Self::base_mut);
        table.insert(
            "description",
            field(|m: &mut Self, n: &dyn ParseNode| {
                m.set_description(n.get_string_value()?);
                Ok(())
            }),
        );
        table.insert(
            "userId",
            field(|m: &mut Self, n: &dyn ParseNode| {
                m.set_user_id(n.get_string_value()?);
                Ok(())
            }),
        );
        table
    }
}

impl Deref for SingleUser {
    type Target = SubjectSet;

    fn deref(&self) -> &SubjectSet {
        &self.base
    }
}

impl DerefMut for SingleUser {
    fn deref_mut(&mut self) -> &mut SubjectSet {
        &mut self.base
    }
}

graph_core::impl_parsable!(SingleUser);

/// Every member of a group as approvers.
#[derive(Debug, Clone)]
pub struct GroupMembers {
    base: SubjectSet,
}

impl Default for GroupMembers {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupMembers {
    pub fn new() -> Self {
        Self {
            base: SubjectSet::with_odata_type(odata::GROUP_MEMBERS),
        }
    }

    pub fn create_from_discriminator_value(_node: &dyn ParseNode) -> Result<Box<dyn Parsable>> {
        Ok(Box::new(Self::new()))
    }

    pub fn store(&self) -> &dyn BackingStore {
        self.base.store()
    }

    pub fn store_mut(&mut self) -> &mut dyn BackingStore {
        self.base.store_mut()
    }

    fn base_mut(&mut self) -> &mut SubjectSet {
        &mut self.base
    }

    pub fn description(&self) -> Option<&str> {
        accessor::get_str(self.store(), "description")
    }

    pub fn set_description(&mut self, value: Option<String>) {
        accessor::set(self.store_mut(), "description", value);
    }

    pub fn group_id(&self) -> Option<&str> {
        accessor::get_str(self.store(), "groupId")
    }

    pub fn set_group_id(&mut self, value: Option<String>) {
        accessor::set(self.store_mut(), "groupId", value);
    }

    pub fn serialize_fields(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        self.base.serialize_members(writer)?;
        writer.write_string_value(Some("description"), self.description())?;
        writer.write_string_value(Some("groupId"), self.group_id())?;
        writer.write_additional_data(Parsable::additional_data(self))
    }

    pub fn field_deserializers() -> FieldDeserializers<Self> {
        let mut table = inherit(SubjectSet::field_deserializers(), Self::base_mut);
        table.insert(
            "description",
            field(|m: &mut Self, n: &dyn ParseNode| {
                m.set_description(n.get_string_value()?);
                Ok(())
            }),
        );
        table.insert(
            "groupId",
            field(|m: &mut Self, n: &dyn ParseNode| {
                m.set_group_id(n.get_string_value()?);
                Ok(())
            }),
        );
        table
    }
}

impl Deref for GroupMembers {
    type Target = SubjectSet;

    fn deref(&self) -> &SubjectSet {
        &self.base
    }
}

impl DerefMut for GroupMembers {
    fn deref_mut(&mut self) -> &mut SubjectSet {
        &mut self.base
    }
}

graph_core::impl_parsable!(GroupMembers);
