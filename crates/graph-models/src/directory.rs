//! Directory objects: users, groups and their common base.

use std::ops::{Deref, DerefMut};

use chrono::{DateTime, FixedOffset};
use graph_core::accessor;
use graph_core::parsable::{FieldDeserializers, field, inherit};
use graph_core::{BackingStore, Parsable, ParseNode, Result, SerializationWriter};
use tracing::debug;

use crate::decode;
use crate::entity::Entity;
use crate::enums::{AgeGroup, GroupVisibility, UserType};
use crate::odata;

// ---------------------------------------------------------------------------
// DirectoryObject
// ---------------------------------------------------------------------------

/// `microsoft.graph.directoryObject`.
#[derive(Debug, Clone)]
pub struct DirectoryObject {
    base: Entity,
}

impl Default for DirectoryObject {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryObject {
    pub fn new() -> Self {
        Self::with_odata_type(odata::DIRECTORY_OBJECT)
    }

    pub(crate) fn with_odata_type(odata_type: &str) -> Self {
        Self {
            base: Entity::with_odata_type(odata_type),
        }
    }

    /// Picks `User` or `Group` by discriminator, else a plain directory object.
    pub fn create_from_discriminator_value(node: &dyn ParseNode) -> Result<Box<dyn Parsable>> {
        let discriminator = node.discriminator();
        debug!(discriminator = discriminator.as_deref(), "directory object factory");
        Ok(match discriminator.as_deref() {
            Some(odata::USER) => Box::new(User::new()),
            Some(odata::GROUP) => Box::new(Group::new()),
            _ => Box::new(Self::new()),
        })
    }

    pub fn store(&self) -> &dyn BackingStore {
        self.base.store()
    }

    pub fn store_mut(&mut self) -> &mut dyn BackingStore {
        self.base.store_mut()
    }

    fn base_mut(&mut self) -> &mut Entity {
        &mut self.base
    }

    /// When the object was soft-deleted. Absent for live objects.
    pub fn deleted_date_time(&self) -> Option<DateTime<FixedOffset>> {
        accessor::get_date_time(self.store(), "deletedDateTime")
    }

    pub fn set_deleted_date_time(&mut self, value: Option<DateTime<FixedOffset>>) {
        accessor::set(self.store_mut(), "deletedDateTime", value);
    }

    pub(crate) fn serialize_members(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        self.base.serialize_members(writer)?;
        writer.write_date_time_value(Some("deletedDateTime"), self.deleted_date_time())
    }

    pub fn serialize_fields(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        self.serialize_members(writer)?;
        writer.write_additional_data(Parsable::additional_data(self))
    }

    pub fn field_deserializers() -> FieldDeserializers<Self> {
        let mut table = inherit(Entity::field_deserializers(), Self::base_mut);
        table.insert(
            "deletedDateTime",
            field(|m: &mut Self, n: &dyn ParseNode| {
                m.set_deleted_date_time(n.get_date_time_value()?);
                Ok(())
            }),
        );
        table
    }
}

impl Deref for DirectoryObject {
    type Target = Entity;

    fn deref(&self) -> &Entity {
        &self.base
    }
}

impl DerefMut for DirectoryObject {
    fn deref_mut(&mut self) -> &mut Entity {
        &mut self.base
    }
}

graph_core::impl_parsable!(DirectoryObject);

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// `microsoft.graph.user`.
#[derive(Debug, Clone)]
pub struct User {
    base: DirectoryObject,
}

impl Default for User {
    fn default() -> Self {
        Self::new()
    }
}

impl User {
    pub fn new() -> Self {
        Self {
            base: DirectoryObject::with_odata_type(odata::USER),
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

    fn base_mut(&mut self) -> &mut DirectoryObject {
        &mut self.base
    }

    pub fn account_enabled(&self) -> Option<bool> {
        accessor::get_bool(self.store(), "accountEnabled")
    }

    pub fn set_account_enabled(&mut self, value: Option<bool>) {
        accessor::set(self.store_mut(), "accountEnabled", value);
    }

    pub fn age_group(&self) -> Option<AgeGroup> {
        accessor::get_enum(self.store(), "ageGroup")
    }

    pub fn set_age_group(&mut self, value: Option<AgeGroup>) {
        accessor::set(self.store_mut(), "ageGroup", value);
    }

    pub fn business_phones(&self) -> Option<Vec<String>> {
        accessor::get_strings(self.store(), "businessPhones")
    }

    pub fn set_business_phones(&mut self, value: Option<Vec<String>>) {
        accessor::set(self.store_mut(), "businessPhones", value);
    }

    pub fn created_date_time(&self) -> Option<DateTime<FixedOffset>> {
        accessor::get_date_time(self.store(), "createdDateTime")
    }

    pub fn set_created_date_time(&mut self, value: Option<DateTime<FixedOffset>>) {
        accessor::set(self.store_mut(), "createdDateTime", value);
    }

    pub fn display_name(&self) -> Option<&str> {
        accessor::get_str(self.store(), "displayName")
    }

    pub fn set_display_name(&mut self, value: Option<String>) {
        accessor::set(self.store_mut(), "displayName", value);
    }

    pub fn employee_hire_date(&self) -> Option<DateTime<FixedOffset>> {
        accessor::get_date_time(self.store(), "employeeHireDate")
    }

    pub fn set_employee_hire_date(&mut self, value: Option<DateTime<FixedOffset>>) {
        accessor::set(self.store_mut(), "employeeHireDate", value);
    }

    pub fn given_name(&self) -> Option<&str> {
        accessor::get_str(self.store(), "givenName")
    }

    pub fn set_given_name(&mut self, value: Option<String>) {
        accessor::set(self.store_mut(), "givenName", value);
    }

    pub fn mail(&self) -> Option<&str> {
        accessor::get_str(self.store(), "mail")
    }

    pub fn set_mail(&mut self, value: Option<String>) {
        accessor::set(self.store_mut(), "mail", value);
    }

    pub fn surname(&self) -> Option<&str> {
        accessor::get_str(self.store(), "surname")
    }

    pub fn set_surname(&mut self, value: Option<String>) {
        accessor::set(self.store_mut(), "surname", value);
    }

    pub fn user_principal_name(&self) -> Option<&str> {
        accessor::get_str(self.store(), "userPrincipalName")
    }

    pub fn set_user_principal_name(&mut self, value: Option<String>) {
        accessor::set(self.store_mut(), "userPrincipalName", value);
    }

    pub fn user_type(&self) -> Option<UserType> {
        accessor::get_enum(self.store(), "userType")
    }

    pub fn set_user_type(&mut self, value: Option<UserType>) {
        accessor::set(self.store_mut(), "userType", value);
    }

    pub fn serialize_fields(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        self.base.serialize_members(writer)?;
        writer.write_bool_value(Some("accountEnabled"), self.account_enabled())?;
        writer.write_enum_value(Some("ageGroup"), self.age_group().as_ref().map(AgeGroup::as_str))?;
        writer.write_collection_of_string_values(
            Some("businessPhones"),
            self.business_phones().as_deref(),
        )?;
        writer.write_date_time_value(Some("createdDateTime"), self.created_date_time())?;
        writer.write_string_value(Some("displayName"), self.display_name())?;
        writer.write_date_time_value(Some("employeeHireDate"), self.employee_hire_date())?;
        writer.write_string_value(Some("givenName"), self.given_name())?;
        writer.write_string_value(Some("mail"), self.mail())?;
        writer.write_string_value(Some("surname"), self.surname())?;
        writer.write_string_value(Some("userPrincipalName"), self.user_principal_name())?;
        writer.write_enum_value(Some("userType"), self.user_type().as_ref().map(UserType::as_str))?;
        writer.write_additional_data(Parsable::additional_data(self))
    }

    pub fn field_deserializers() -> FieldDeserializers<Self> {
        let mut table = inherit(DirectoryObject::field_deserializers(), Self::base_mut);
        table.extend([
            (
                "accountEnabled",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_account_enabled(n.get_bool_value()?);
                    Ok(())
                }),
            ),
            (
                "ageGroup",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_age_group(decode::enumeration(n)?);
                    Ok(())
                }),
            ),
            (
                "businessPhones",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_business_phones(decode::strings(n)?);
                    Ok(())
                }),
            ),
            (
                "createdDateTime",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_created_date_time(n.get_date_time_value()?);
                    Ok(())
                }),
            ),
            (
                "displayName",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_display_name(n.get_string_value()?);
                    Ok(())
                }),
            ),
            (
                "employeeHireDate",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_employee_hire_date(n.get_date_time_value()?);
                    Ok(())
                }),
            ),
            (
                "givenName",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_given_name(n.get_string_value()?);
                    Ok(())
                }),
            ),
            (
                "mail",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_mail(n.get_string_value()?);
                    Ok(())
                }),
            ),
            (
                "surname",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_surname(n.get_string_value()?);
                    Ok(())
                }),
            ),
            (
                "userPrincipalName",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_user_principal_name(n.get_string_value()?);
                    Ok(())
                }),
            ),
            (
                "userType",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_user_type(decode::enumeration(n)?);
                    Ok(())
                }),
            ),
        ]);
        table
    }
}

impl Deref for User {
    type Target = DirectoryObject;

    fn deref(&self) -> &DirectoryObject {
        &self.base
    }
}

impl DerefMut for User {
    fn deref_mut(&mut self) -> &mut DirectoryObject {
        &mut self.base
    }
}

graph_core::impl_parsable!(User);

// ---------------------------------------------------------------------------
// Group
// ---------------------------------------------------------------------------

/// `microsoft.graph.group`.
#[derive(Debug, Clone)]
pub struct Group {
    base: DirectoryObject,
}

impl Default for Group {
    fn default() -> Self {
        Self::new()
    }
}

impl Group {
    pub fn new() -> Self {
        Self {
            base: DirectoryObject::with_odata_type(odata::GROUP),
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

    fn base_mut(&mut self) -> &mut DirectoryObject {
        &mut self.base
    }

    pub fn description(&self) -> Option<&str> {
        accessor::get_str(self.store(), "description")
    }

    pub fn set_description(&mut self, value: Option<String>) {
        accessor::set(self.store_mut(), "description", value);
    }

    pub fn display_name(&self) -> Option<&str> {
        accessor::get_str(self.store(), "displayName")
    }

    pub fn set_display_name(&mut self, value: Option<String>) {
        accessor::set(self.store_mut(), "displayName", value);
    }

    /// `Unified` marks a Microsoft 365 group; `DynamicMembership` a
    /// rule-based one.
    pub fn group_types(&self) -> Option<Vec<String>> {
        accessor::get_strings(self.store(), "groupTypes")
    }

    pub fn set_group_types(&mut self, value: Option<Vec<String>>) {
        accessor::set(self.store_mut(), "groupTypes", value);
    }

    pub fn mail_enabled(&self) -> Option<bool> {
        accessor::get_bool(self.store(), "mailEnabled")
    }

    pub fn set_mail_enabled(&mut self, value: Option<bool>) {
        accessor::set(self.store_mut(), "mailEnabled", value);
    }

    pub fn mail_nickname(&self) -> Option<&str> {
        accessor::get_str(self.store(), "mailNickname")
    }

    pub fn set_mail_nickname(&mut self, value: Option<String>) {
        accessor::set(self.store_mut(), "mailNickname", value);
    }

    pub fn security_enabled(&self) -> Option<bool> {
        accessor::get_bool(self.store(), "securityEnabled")
    }

    pub fn set_security_enabled(&mut self, value: Option<bool>) {
        accessor::set(self.store_mut(), "securityEnabled", value);
    }

    pub fn visibility(&self) -> Option<GroupVisibility> {
        accessor::get_enum(self.store(), "visibility")
    }

    pub fn set_visibility(&mut self, value: Option<GroupVisibility>) {
        accessor::set(self.store_mut(), "visibility", value);
    }

    pub fn serialize_fields(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        self.base.serialize_members(writer)?;
        writer.write_string_value(Some("description"), self.description())?;
        writer.write_string_value(Some("displayName"), self.display_name())?;
        writer.write_collection_of_string_values(Some("groupTypes"), self.group_types().as_deref())?;
        writer.write_bool_value(Some("mailEnabled"), self.mail_enabled())?;
        writer.write_string_value(Some("mailNickname"), self.mail_nickname())?;
        writer.write_bool_value(Some("securityEnabled"), self.security_enabled())?;
        writer.write_enum_value(
            Some("visibility"),
            self.visibility().as_ref().map(GroupVisibility::as_str),
        )?;
        writer.write_additional_data(Parsable::additional_data(self))
    }

    pub fn field_deserializers() -> FieldDeserializers<Self> {
        let mut table = inherit(DirectoryObject::field_deserializers(), Self::base_mut);
        table.extend([
            (
                "description",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_description(n.get_string_value()?);
                    Ok(())
                }),
            ),
            (
                "displayName",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_display_name(n.get_string_value()?);
                    Ok(())
                }),
            ),
            (
                "groupTypes",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_group_types(decode::strings(n)?);
                    Ok(())
                }),
            ),
            (
                "mailEnabled",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_mail_enabled(n.get_bool_value()?);
                    Ok(())
                }),
            ),
            (
                "mailNickname",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_mail_nickname(n.get_string_value()?);
                    Ok(())
                }),
            ),
            (
                "securityEnabled",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_security_enabled(n.get_bool_value()?);
                    Ok(())
                }),
            ),
            (
                "visibility",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_visibility(decode::enumeration(n)?);
                    Ok(())
                }),
            ),
        ]);
        table
    }
}

impl Deref for Group {
    type Target = DirectoryObject;

    fn deref(&self) -> &DirectoryObject {
        &self.base
    }
}

impl DerefMut for Group {
    fn deref_mut(&mut self) -> &mut DirectoryObject {
        &mut self.base
    }
}

graph_core::impl_parsable!(Group);
