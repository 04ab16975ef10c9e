//! `microsoft.graph.entity`: the root of every addressable resource.

use graph_core::accessor;
use graph_core::parsable::{FieldDeserializers, field};
use graph_core::store::default_backing_store;
use graph_core::{BackingStore, ODATA_TYPE_KEY, Parsable, ParseNode, Result, SerializationWriter};
use tracing::debug;

use crate::access_package::AccessPackageAssignmentPolicy;
use crate::directory::{DirectoryObject, Group, User};
use crate::odata;

#[derive(Debug, Clone)]
pub struct Entity {
    store: Box<dyn BackingStore>,
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity {
    pub fn new() -> Self {
        Self {
            store: default_backing_store(),
        }
    }

    /// Builds an entity carrying a fixed discriminator. Used by subtypes.
    pub(crate) fn with_odata_type(odata_type: &str) -> Self {
        let mut entity = Self::new();
        entity.set_odata_type(Some(odata_type.to_owned()));
        entity
    }

    /// Picks the concrete entity type named by the payload's discriminator.
    pub fn create_from_discriminator_value(node: &dyn ParseNode) -> Result<Box<dyn Parsable>> {
        let discriminator = node.discriminator();
        debug!(discriminator = discriminator.as_deref(), "entity factory");
        Ok(match discriminator.as_deref() {
            Some(odata::DIRECTORY_OBJECT) => Box::new(DirectoryObject::new()),
            Some(odata::USER) => Box::new(User::new()),
            Some(odata::GROUP) => Box::new(Group::new()),
            Some(odata::ACCESS_PACKAGE_ASSIGNMENT_POLICY) => {
                Box::new(AccessPackageAssignmentPolicy::new())
            }
            _ => Box::new(Self::new()),
        })
    }

    pub fn store(&self) -> &dyn BackingStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn BackingStore {
        self.store.as_mut()
    }

    /// The unique identifier. Read-only on the service.
    pub fn id(&self) -> Option<&str> {
        accessor::get_str(self.store(), "id")
    }

    pub fn set_id(&mut self, value: Option<String>) {
        accessor::set(self.store_mut(), "id", value);
    }

    pub fn odata_type(&self) -> Option<&str> {
        accessor::get_str(self.store(), ODATA_TYPE_KEY)
    }

    pub fn set_odata_type(&mut self, value: Option<String>) {
        accessor::set(self.store_mut(), ODATA_TYPE_KEY, value);
    }

    pub(crate) fn serialize_members(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        writer.write_string_value(Some("id"), self.id())?;
        writer.write_string_value(Some(ODATA_TYPE_KEY), self.odata_type())
    }

    pub fn serialize_fields(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        self.serialize_members(writer)?;
        writer.write_additional_data(Parsable::additional_data(self))
    }

    pub fn field_deserializers() -> FieldDeserializers<Self> {
        FieldDeserializers::from([
            (
                "id",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_id(n.get_string_value()?);
                    Ok(())
                }),
            ),
            (
                ODATA_TYPE_KEY,
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_odata_type(n.get_string_value()?);
                    Ok(())
                }),
            ),
        ])
    }
}

graph_core::impl_parsable!(Entity);
