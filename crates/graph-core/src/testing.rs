//! A minimal model for exercising the codec in unit tests.

use crate::accessor;
use crate::error::Result;
use crate::parsable::{FieldDeserializers, Parsable, field};
use crate::parse::ParseNode;
use crate::store::{BackingStore, default_backing_store};
use crate::value::{PrimitiveKind, StoreValue};
use crate::write::SerializationWriter;

#[derive(Debug, Clone)]
pub struct Note {
    store: Box<dyn BackingStore>,
}

impl Note {
    pub fn new() -> Self {
        Self {
            store: default_backing_store(),
        }
    }

    pub fn create(_node: &dyn ParseNode) -> Result<Box<dyn Parsable>> {
        Ok(Box::new(Self::new()))
    }

    pub fn store(&self) -> &dyn BackingStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn BackingStore {
        self.store.as_mut()
    }

    pub fn title(&self) -> Option<&str> {
        accessor::get_str(self.store(), "title")
    }

    pub fn set_title(&mut self, value: Option<String>) {
        accessor::set(self.store_mut(), "title", value);
    }

    pub fn pinned(&self) -> Option<bool> {
        accessor::get_bool(self.store(), "pinned")
    }

    pub fn set_pinned(&mut self, value: Option<bool>) {
        accessor::set(self.store_mut(), "pinned", value);
    }

    pub fn tags(&self) -> Option<Vec<String>> {
        accessor::get_strings(self.store(), "tags")
    }

    pub fn serialize_fields(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        writer.write_string_value(Some("title"), self.title())?;
        writer.write_bool_value(Some("pinned"), self.pinned())?;
        writer.write_collection_of_string_values(Some("tags"), self.tags().as_deref())?;
        writer.write_additional_data(self.additional_data())
    }

    pub fn field_deserializers() -> FieldDeserializers<Self> {
        FieldDeserializers::from([
            (
                "title",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_title(n.get_string_value()?);
                    Ok(())
                }),
            ),
            (
                "pinned",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_pinned(n.get_bool_value()?);
                    Ok(())
                }),
            ),
            (
                "tags",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    let tags = n.get_collection_of_primitive_values(PrimitiveKind::String)?;
                    accessor::set(m.store_mut(), "tags", tags.map(StoreValue::Collection));
                    Ok(())
                }),
            ),
        ])
    }
}

crate::impl_parsable!(Note);
