//! Collection responses: one page of a list result.
//!
//! Every page carries the items under `value`, plus `@odata.nextLink` while
//! more pages remain and `@odata.count` when the request asked for it.

use std::ops::{Deref, DerefMut};

use graph_core::accessor;
use graph_core::parsable::{FieldDeserializers, field, inherit};
use graph_core::store::default_backing_store;
use graph_core::{BackingStore, Parsable, ParseNode, Result, SerializationWriter, StoreValue};

use crate::directory::{DirectoryObject, Group, User};

const COUNT_KEY: &str = "@odata.count";
const NEXT_LINK_KEY: &str = "@odata.nextLink";
const VALUE_KEY: &str = "value";

/// Pagination metadata shared by every collection response.
#[derive(Debug, Clone)]
pub struct BaseCollectionPaginationCountResponse {
    store: Box<dyn BackingStore>,
}

impl Default for BaseCollectionPaginationCountResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseCollectionPaginationCountResponse {
    pub fn new() -> Self {
        Self {
            store: default_backing_store(),
        }
    }

    pub fn create_from_discriminator_value(_node: &dyn ParseNode) -> Result<Box<dyn Parsable>> {
        Ok(Box::new(Self::new()))
    }

    pub fn store(&self) -> &dyn BackingStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn BackingStore {
        self.store.as_mut()
    }

    pub fn odata_count(&self) -> Option<i64> {
        accessor::get_i64(self.store(), COUNT_KEY)
    }

    pub fn set_odata_count(&mut self, value: Option<i64>) {
        accessor::set(self.store_mut(), COUNT_KEY, value);
    }

    /// URL of the next page; absent on the last page.
    pub fn odata_next_link(&self) -> Option<&str> {
        accessor::get_str(self.store(), NEXT_LINK_KEY)
    }

    pub fn set_odata_next_link(&mut self, value: Option<String>) {
        accessor::set(self.store_mut(), NEXT_LINK_KEY, value);
    }

    pub fn has_next_page(&self) -> bool {
        self.odata_next_link().is_some()
    }

    fn serialize_members(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        writer.write_i64_value(Some(COUNT_KEY), self.odata_count())?;
        writer.write_string_value(Some(NEXT_LINK_KEY), self.odata_next_link())
    }

    pub fn serialize_fields(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        self.serialize_members(writer)?;
        writer.write_additional_data(Parsable::additional_data(self))
    }

    pub fn field_deserializers() -> FieldDeserializers<Self> {
        FieldDeserializers::from([
            (
                COUNT_KEY,
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_odata_count(n.get_i64_value()?);
                    Ok(())
                }),
            ),
            (
                NEXT_LINK_KEY,
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_odata_next_link(n.get_string_value()?);
                    Ok(())
                }),
            ),
        ])
    }
}

graph_core::impl_parsable!(BaseCollectionPaginationCountResponse);

/// Defines a page of a single concrete item type.
macro_rules! collection_response {
    ($(#[$meta:meta])* $name:ident, $item:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            base: BaseCollectionPaginationCountResponse,
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $name {
            pub fn new() -> Self {
                Self {
                    base: BaseCollectionPaginationCountResponse::new(),
                }
            }

            pub fn create_from_discriminator_value(
                _node: &dyn ParseNode,
            ) -> Result<Box<dyn Parsable>> {
                Ok(Box::new(Self::new()))
            }

            pub fn store(&self) -> &dyn BackingStore {
                self.base.store()
            }

            pub fn store_mut(&mut self) -> &mut dyn BackingStore {
                self.base.store_mut()
            }

            fn base_mut(&mut self) -> &mut BaseCollectionPaginationCountResponse {
                &mut self.base
            }

            pub fn value(&self) -> Option<Vec<&$item>> {
                accessor::get_objects(self.store(), VALUE_KEY)
            }

            pub fn set_value(&mut self, value: Option<Vec<$item>>) {
                accessor::set(self.store_mut(), VALUE_KEY, value.map(StoreValue::objects));
            }

            pub fn serialize_fields(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
                self.base.serialize_members(writer)?;
                writer.write_collection_of_object_values(
                    Some(VALUE_KEY),
                    accessor::get_dyn_objects(self.store(), VALUE_KEY).as_deref(),
                )?;
                writer.write_additional_data(Parsable::additional_data(self))
            }

            pub fn field_deserializers() -> FieldDeserializers<Self> {
                let mut table = inherit(
                    BaseCollectionPaginationCountResponse::field_deserializers(),
                    Self::base_mut,
                );
                table.insert(
                    VALUE_KEY,
                    field(|m: &mut Self, n: &dyn ParseNode| {
                        let items =
                            n.get_collection_of_object_values($item::create_from_discriminator_value)?;
                        accessor::set(m.store_mut(), VALUE_KEY, items.map(StoreValue::boxed_objects));
                        Ok(())
                    }),
                );
                table
            }
        }

        impl Deref for $name {
            type Target = BaseCollectionPaginationCountResponse;

            fn deref(&self) -> &BaseCollectionPaginationCountResponse {
                &self.base
            }
        }

        impl DerefMut for $name {
            fn deref_mut(&mut self) -> &mut BaseCollectionPaginationCountResponse {
                &mut self.base
            }
        }

        graph_core::impl_parsable!($name);
    };
}

collection_response! {
    /// A page of `/users`.
    UserCollectionResponse, User
}

collection_response! {
    /// A page of `/groups`.
    GroupCollectionResponse, Group
}

/// A page of directory objects of mixed concrete types, as returned by
/// `/directoryObjects` or `memberOf`.
#[derive(Debug, Clone, Default)]
pub struct DirectoryObjectCollectionResponse {
    base: BaseCollectionPaginationCountResponse,
}

impl DirectoryObjectCollectionResponse {
    pub fn new() -> Self {
        Self::default()
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

    fn base_mut(&mut self) -> &mut BaseCollectionPaginationCountResponse {
        &mut self.base
    }

    /// Items as decoded: `User`, `Group` or plain `DirectoryObject`.
    pub fn value(&self) -> Option<Vec<&dyn Parsable>> {
        accessor::get_dyn_objects(self.store(), VALUE_KEY)
    }

    pub fn set_value(&mut self, value: Option<Vec<Box<dyn Parsable>>>) {
        accessor::set(self.store_mut(), VALUE_KEY, value.map(StoreValue::boxed_objects));
    }

    pub fn serialize_fields(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        self.base.serialize_members(writer)?;
        writer.write_collection_of_object_values(Some(VALUE_KEY), self.value().as_deref())?;
        writer.write_additional_data(Parsable::additional_data(self))
    }

    pub fn field_deserializers() -> FieldDeserializers<Self> {
        let mut table = inherit(
            BaseCollectionPaginationCountResponse::field_deserializers(),
            Self::base_mut,
        );
        table.insert(
            VALUE_KEY,
            field(|m: &mut Self, n: &dyn ParseNode| {
                m.set_value(
                    n.get_collection_of_object_values(
                        DirectoryObject::create_from_discriminator_value,
                    )?,
                );
                Ok(())
            }),
        );
        table
    }
}

impl Deref for DirectoryObjectCollectionResponse {
    type Target = BaseCollectionPaginationCountResponse;

    fn deref(&self) -> &BaseCollectionPaginationCountResponse {
        &self.base
    }
}

impl DerefMut for DirectoryObjectCollectionResponse {
    fn deref_mut(&mut self) -> &mut BaseCollectionPaginationCountResponse {
        &mut self.base
    }
}

graph_core::impl_parsable!(DirectoryObjectCollectionResponse);

#[cfg(test)]
mod tests {
    use super::*;
    use graph_core::json::{from_json_as, to_json_value};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn user_page_with_next_link() {
        let page: UserCollectionResponse = from_json_as(
            &json!({
                "@odata.context": "https://graph.microsoft.com/v1.0/$metadata#users",
                "@odata.nextLink": "https://graph.microsoft.com/v1.0/users?$skiptoken=X",
                "value": [
                    {"id": "1", "displayName": "Adele Vance"},
                    {"id": "2", "displayName": "Alex Wilber"}
                ]
            })
            .to_string(),
            UserCollectionResponse::create_from_discriminator_value,
        )
        .unwrap();
        assert!(page.has_next_page());
        assert_eq!(page.odata_count(), None);
        let names: Vec<_> = page
            .value()
            .unwrap()
            .into_iter()
            .filter_map(User::display_name)
            .collect();
        assert_eq!(names, vec!["Adele Vance", "Alex Wilber"]);
        assert!(
            page.additional_data()
                .is_some_and(|d| d.contains_key("@odata.context"))
        );
    }

    #[test]
    fn directory_page_keeps_concrete_types() {
        let input = json!({
            "@odata.count": 2,
            "value": [
                {"@odata.type": "#microsoft.graph.group", "id": "g", "displayName": "Finance"},
                {"@odata.type": "#microsoft.graph.user", "id": "u", "mail": "adele@contoso.com"}
            ]
        });
        let page: DirectoryObjectCollectionResponse = from_json_as(
            &input.to_string(),
            DirectoryObjectCollectionResponse::create_from_discriminator_value,
        )
        .unwrap();
        assert_eq!(page.odata_count(), Some(2));
        let items = page.value().unwrap();
        assert!(items[0].is::<Group>());
        assert!(items[1].is::<User>());
        assert_eq!(to_json_value(&page).unwrap(), input);
    }

    #[test]
    fn group_page_built_by_hand() {
        let mut group = Group::new();
        group.set_display_name(Some("Finance".into()));
        let mut page = GroupCollectionResponse::new();
        page.set_value(Some(vec![group]));
        page.set_odata_count(Some(1));
        assert_eq!(
            to_json_value(&page).unwrap(),
            json!({
                "@odata.count": 1,
                "value": [{"@odata.type": "#microsoft.graph.group", "displayName": "Finance"}]
            })
        );
    }
}
