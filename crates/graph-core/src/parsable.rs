//! The `Parsable` trait and the per-type field decoder tables.
//!
//! A model decodes itself one wire field at a time: [`Parsable::deserialize_field`]
//! looks the wire name up in the model's [`FieldDeserializers`] table and
//! runs the matching closure. Subtypes build their table by lifting the
//! parent's table with [`inherit`] and adding their own entries.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::accessor;
use crate::error::{Result, SerializationError};
use crate::parse::ParseNode;
use crate::store::BackingStore;
use crate::value::StoreValue;
use crate::write::SerializationWriter;

/// Store key of the `@odata.type` discriminator.
pub const ODATA_TYPE_KEY: &str = "@odata.type";

/// Store key of the catch-all map of unknown wire fields.
pub const ADDITIONAL_DATA_KEY: &str = "additionalData";

/// Store key listing the additional-data keys written after decoding.
pub const ADDITIONAL_DATA_EDITS_KEY: &str = "additionalData@edits";

/// Wire fields that are not listed in a model's table.
pub type AdditionalData = Map<String, Value>;

/// Decodes one wire field into a model.
pub type FieldDeserializer<T> = Box<dyn Fn(&mut T, &dyn ParseNode) -> Result<()> + Send + Sync>;

/// Wire name → field decoder.
pub type FieldDeserializers<T> = HashMap<&'static str, FieldDeserializer<T>>;

/// Builds a model from a parse node, usually by inspecting its
/// discriminator.
pub type ParsableFactory = fn(&dyn ParseNode) -> Result<Box<dyn Parsable>>;

/// A model that can be decoded from and encoded to the wire.
pub trait Parsable: Any + fmt::Debug + Send + Sync {
    /// Writes every known field followed by additional data.
    fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<()>;

    /// Decodes one wire field. Returns `Ok(false)` when `key` is not a
    /// field of this type.
    fn deserialize_field(&mut self, key: &str, node: &dyn ParseNode) -> Result<bool>;

    fn backing_store(&self) -> &dyn BackingStore;

    fn backing_store_mut(&mut self) -> &mut dyn BackingStore;

    /// The Rust type name, for diagnostics.
    fn type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn clone_box(&self) -> Box<dyn Parsable>;

    /// The `@odata.type` discriminator, if the model carries one.
    fn odata_type(&self) -> Option<&str> {
        accessor::get_str(self.backing_store(), ODATA_TYPE_KEY)
    }

    fn additional_data(&self) -> Option<&AdditionalData> {
        match accessor::get_raw(self.backing_store(), ADDITIONAL_DATA_KEY) {
            Some(Value::Object(map)) => Some(map),
            _ => None,
        }
    }

    /// Replaces the additional data.
    ///
    /// After initialization every added, altered or removed key is
    /// recorded, so a changes-only encoding can emit just those keys.
    fn set_additional_data(&mut self, data: AdditionalData) {
        let store = self.backing_store_mut();
        if store.initialization_completed() {
            let edits = additional_data_edits(store, &data);
            accessor::set(store, ADDITIONAL_DATA_EDITS_KEY, edits);
        }
        accessor::set(store, ADDITIONAL_DATA_KEY, StoreValue::Untyped(Value::Object(data)));
    }
}

/// Returns the additional-data keys edited since initialization completed.
///
/// Keys removed from the map are included.
pub fn edited_additional_keys(store: &mut dyn BackingStore) -> Vec<String> {
    let only_changed = store.return_only_changed_values();
    store.set_return_only_changed_values(true);
    let edits = accessor::get_strings(store, ADDITIONAL_DATA_EDITS_KEY).unwrap_or_default();
    store.set_return_only_changed_values(only_changed);
    edits
}

fn additional_data_edits(store: &mut dyn BackingStore, data: &AdditionalData) -> Vec<String> {
    let mut edits = edited_additional_keys(store);
    let previous = match accessor::get_raw(store, ADDITIONAL_DATA_KEY) {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    };
    let written = data
        .iter()
        .filter(|(key, value)| previous.and_then(|p| p.get(key.as_str())) != Some(*value))
        .map(|(key, _)| key);
    let removed = previous
        .into_iter()
        .flat_map(|p| p.keys())
        .filter(|key| !data.contains_key(key.as_str()));
    for key in written.chain(removed) {
        if !edits.contains(key) {
            edits.push(key.clone());
        }
    }
    edits
}

impl Clone for Box<dyn Parsable> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl<'a> dyn Parsable + 'a {
    /// Borrows the model as `T` if that is its concrete type.
    pub fn downcast_ref<T: Parsable>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Mutably borrows the model as `T` if that is its concrete type.
    pub fn downcast_mut<T: Parsable>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Returns `true` if the concrete type is `T`.
    pub fn is<T: Parsable>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// Recovers the concrete type of a boxed model.
pub fn downcast<T: Parsable>(model: Box<dyn Parsable>) -> Result<T> {
    let found = model.type_name();
    model
        .into_any()
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| SerializationError::Downcast {
            expected: short_type_name::<T>(),
            found,
        })
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Wraps a closure as a boxed field decoder.
pub fn field<T, F>(decode: F) -> FieldDeserializer<T>
where
    F: Fn(&mut T, &dyn ParseNode) -> Result<()> + Send + Sync + 'static,
{
    Box::new(decode)
}

/// Lifts a parent type's decoder table into a subtype that embeds the
/// parent, reached through `project`.
pub fn inherit<P, T>(parent: FieldDeserializers<P>, project: fn(&mut T) -> &mut P) -> FieldDeserializers<T>
where
    P: 'static,
    T: 'static,
{
    parent
        .into_iter()
        .map(|(key, decode)| {
            let lifted: FieldDeserializer<T> =
                Box::new(move |model: &mut T, node: &dyn ParseNode| decode(project(model), node));
            (key, lifted)
        })
        .collect()
}

/// Runs the decoder registered for `key`, tagging any error with the wire
/// name.
pub fn dispatch_field<T>(
    table: &FieldDeserializers<T>,
    model: &mut T,
    key: &str,
    node: &dyn ParseNode,
) -> Result<bool> {
    match table.get(key) {
        Some(decode) => {
            decode(model, node).map_err(|e| SerializationError::field(key, e))?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Implements [`Parsable`] for a model type.
///
/// The type must provide `store()`, `store_mut()`, `serialize_fields()` and
/// `field_deserializers()` as inherent methods.
#[macro_export]
macro_rules! impl_parsable {
    ($ty:ident) => {
        impl $crate::parsable::Parsable for $ty {
            fn serialize(
                &self,
                writer: &mut dyn $crate::write::SerializationWriter,
            ) -> $crate::error::Result<()> {
                self.serialize_fields(writer)
            }

            fn deserialize_field(
                &mut self,
                key: &str,
                node: &dyn $crate::parse::ParseNode,
            ) -> $crate::error::Result<bool> {
                static TABLE: ::std::sync::LazyLock<$crate::parsable::FieldDeserializers<$ty>> =
                    ::std::sync::LazyLock::new($ty::field_deserializers);
                $crate::parsable::dispatch_field(&TABLE, self, key, node)
            }

            fn backing_store(&self) -> &dyn $crate::store::BackingStore {
                self.store()
            }

            fn backing_store_mut(&mut self) -> &mut dyn $crate::store::BackingStore {
                self.store_mut()
            }

            fn type_name(&self) -> &'static str {
                stringify!($ty)
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            fn into_any(self: Box<Self>) -> Box<dyn ::std::any::Any> {
                self
            }

            fn clone_box(&self) -> Box<dyn $crate::parsable::Parsable> {
                Box::new(self.clone())
            }
        }
    };
}
