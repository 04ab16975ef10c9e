//! Typed reads and writes over a [`BackingStore`].
//!
//! Every model getter and setter goes through these helpers. A missing key
//! or a stored `Null` reads as `None`. A store error, or a value of the
//! wrong kind under a key, means the store itself is broken and aborts the
//! process; it is never a data problem.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::duration::IsoDuration;
use crate::error::StoreError;
use crate::parsable::Parsable;
use crate::store::BackingStore;
use crate::value::StoreValue;

#[cold]
#[track_caller]
fn store_failure(key: &str, err: &StoreError) -> ! {
    panic!("backing store failure on '{key}': {err}")
}

#[cold]
#[track_caller]
fn kind_mismatch(key: &str, expected: &str, found: &StoreValue) -> ! {
    panic!(
        "backing store holds {} under '{key}', expected {expected}",
        found.kind()
    )
}

/// Reads the raw stored value; `Null` reads as `None`.
#[track_caller]
pub fn get_value<'a>(store: &'a dyn BackingStore, key: &str) -> Option<&'a StoreValue> {
    match store.get(key) {
        Ok(Some(StoreValue::Null)) | Ok(None) => None,
        Ok(Some(value)) => Some(value),
        Err(err) => store_failure(key, &err),
    }
}

/// Writes `value` under `key`.
#[track_caller]
pub fn set(store: &mut dyn BackingStore, key: &str, value: impl Into<StoreValue>) {
    if let Err(err) = store.set(key, value.into()) {
        store_failure(key, &err);
    }
}

macro_rules! copy_getter {
    ($(#[$meta:meta])* $name:ident, $ty:ty, $variant:ident, $expected:expr) => {
        $(#[$meta])*
        #[track_caller]
        pub fn $name(store: &dyn BackingStore, key: &str) -> Option<$ty> {
            match get_value(store, key) {
                None => None,
                Some(StoreValue::$variant(v)) => Some(*v),
                Some(other) => kind_mismatch(key, $expected, other),
            }
        }
    };
}

copy_getter!(get_bool, bool, Bool, "bool");
copy_getter!(get_u8, u8, Byte, "byte");
copy_getter!(get_f32, f32, Float32, "float32");
copy_getter!(get_f64, f64, Float64, "float64");
copy_getter!(get_uuid, Uuid, Uuid, "uuid");
copy_getter!(get_date_time, DateTime<FixedOffset>, DateTime, "date-time");
copy_getter!(get_date, NaiveDate, Date, "date");
copy_getter!(get_time, NaiveTime, Time, "time");
copy_getter!(get_duration, IsoDuration, Duration, "duration");

/// Reads an `int32`; a stored byte widens.
#[track_caller]
pub fn get_i32(store: &dyn BackingStore, key: &str) -> Option<i32> {
    match get_value(store, key) {
        None => None,
        Some(StoreValue::Int32(v)) => Some(*v),
        Some(StoreValue::Byte(v)) => Some(i32::from(*v)),
        Some(other) => kind_mismatch(key, "int32", other),
    }
}

/// Reads an `int64`; narrower integers widen.
#[track_caller]
pub fn get_i64(store: &dyn BackingStore, key: &str) -> Option<i64> {
    match get_value(store, key) {
        None => None,
        Some(StoreValue::Int64(v)) => Some(*v),
        Some(StoreValue::Int32(v)) => Some(i64::from(*v)),
        Some(StoreValue::Byte(v)) => Some(i64::from(*v)),
        Some(other) => kind_mismatch(key, "int64", other),
    }
}

#[track_caller]
pub fn get_str<'a>(store: &'a dyn BackingStore, key: &str) -> Option<&'a str> {
    match get_value(store, key) {
        None => None,
        Some(StoreValue::String(s)) => Some(s.as_str()),
        Some(other) => kind_mismatch(key, "string", other),
    }
}

#[track_caller]
pub fn get_bytes<'a>(store: &'a dyn BackingStore, key: &str) -> Option<&'a [u8]> {
    match get_value(store, key) {
        None => None,
        Some(StoreValue::Bytes(b)) => Some(b.as_slice()),
        Some(other) => kind_mismatch(key, "bytes", other),
    }
}

/// Reads an enum member, converting from its wire name.
#[track_caller]
pub fn get_enum<E>(store: &dyn BackingStore, key: &str) -> Option<E>
where
    E: for<'s> From<&'s str>,
{
    match get_value(store, key) {
        None => None,
        Some(StoreValue::Enum(s)) | Some(StoreValue::String(s)) => Some(E::from(s.as_str())),
        Some(other) => kind_mismatch(key, "enum", other),
    }
}

/// Reads a collection of enum members.
#[track_caller]
pub fn get_enums<E>(store: &dyn BackingStore, key: &str) -> Option<Vec<E>>
where
    E: for<'s> From<&'s str>,
{
    collection(store, key).map(|items| {
        items
            .iter()
            .filter_map(|item| match item {
                StoreValue::Enum(s) | StoreValue::String(s) => Some(E::from(s.as_str())),
                StoreValue::Null => None,
                other => kind_mismatch(key, "enum", other),
            })
            .collect()
    })
}

/// Reads a collection of strings.
#[track_caller]
pub fn get_strings(store: &dyn BackingStore, key: &str) -> Option<Vec<String>> {
    collection(store, key).map(|items| {
        items
            .iter()
            .filter_map(|item| match item {
                StoreValue::String(s) => Some(s.clone()),
                StoreValue::Null => None,
                other => kind_mismatch(key, "string", other),
            })
            .collect()
    })
}

/// Reads raw JSON stored as [`StoreValue::Untyped`].
#[track_caller]
pub fn get_raw<'a>(store: &'a dyn BackingStore, key: &str) -> Option<&'a serde_json::Value> {
    match get_value(store, key) {
        None => None,
        Some(StoreValue::Untyped(v)) => Some(v),
        Some(other) => kind_mismatch(key, "untyped", other),
    }
}

/// Reads a nested model of any concrete type.
#[track_caller]
pub fn get_dyn_object<'a>(store: &'a dyn BackingStore, key: &str) -> Option<&'a dyn Parsable> {
    match get_value(store, key) {
        None => None,
        Some(StoreValue::Object(model)) => Some(model.as_ref()),
        Some(other) => kind_mismatch(key, "object", other),
    }
}

/// Reads a nested model as its concrete type `T`.
#[track_caller]
pub fn get_object<'a, T: Parsable>(store: &'a dyn BackingStore, key: &str) -> Option<&'a T> {
    get_dyn_object(store, key).map(|model| match model.as_any().downcast_ref::<T>() {
        Some(typed) => typed,
        None => model_mismatch::<T>(key, model),
    })
}

#[cold]
#[track_caller]
fn model_mismatch<T>(key: &str, found: &dyn Parsable) -> ! {
    panic!(
        "backing store holds {} under '{key}', expected {}",
        found.type_name(),
        std::any::type_name::<T>()
    )
}

/// Reads a collection of nested models of any concrete type.
#[track_caller]
pub fn get_dyn_objects<'a>(store: &'a dyn BackingStore, key: &str) -> Option<Vec<&'a dyn Parsable>> {
    collection(store, key).map(|items| {
        items
            .iter()
            .filter_map(|item| match item {
                StoreValue::Object(model) => Some(model.as_ref()),
                StoreValue::Null => None,
                other => kind_mismatch(key, "object", other),
            })
            .collect()
    })
}

/// Reads a collection of nested models as their concrete type `T`.
#[track_caller]
pub fn get_objects<'a, T: Parsable>(store: &'a dyn BackingStore, key: &str) -> Option<Vec<&'a T>> {
    get_dyn_objects(store, key).map(|models| {
        models
            .into_iter()
            .map(|model| match model.as_any().downcast_ref::<T>() {
                Some(typed) => typed,
                None => model_mismatch::<T>(key, model),
            })
            .collect()
    })
}

#[track_caller]
fn collection<'a>(store: &'a dyn BackingStore, key: &str) -> Option<&'a [StoreValue]> {
    match get_value(store, key) {
        None => None,
        Some(StoreValue::Collection(items)) => Some(items.as_slice()),
        Some(other) => kind_mismatch(key, "collection", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryBackingStore;

    #[test]
    fn null_reads_as_none() {
        let mut store = InMemoryBackingStore::new();
        set(&mut store, "mail", None::<String>);
        assert_eq!(get_str(&store, "mail"), None);
        assert_eq!(get_str(&store, "absent"), None);
    }

    #[test]
    fn integers_widen() {
        let mut store = InMemoryBackingStore::new();
        set(&mut store, "small", 7u8);
        set(&mut store, "count", 42i32);
        assert_eq!(get_i32(&store, "small"), Some(7));
        assert_eq!(get_i64(&store, "count"), Some(42));
    }

    #[test]
    fn strings_collection() {
        let mut store = InMemoryBackingStore::new();
        set(&mut store, "groupTypes", vec!["Unified".to_string(), "DynamicMembership".to_string()]);
        assert_eq!(
            get_strings(&store, "groupTypes"),
            Some(vec!["Unified".to_string(), "DynamicMembership".to_string()])
        );
    }

    #[test]
    #[should_panic(expected = "backing store holds Wrapped under 'notes'")]
    fn mixed_model_collection_is_fatal() {
        use crate::testing::Note;

        let mut store = InMemoryBackingStore::new();
        let models: Vec<Box<dyn Parsable>> = vec![Box::new(Note::new()), Box::new(Wrapped(Note::new()))];
        set(&mut store, "notes", StoreValue::boxed_objects(models));
        let _ = get_objects::<Note>(&store, "notes");
    }

    #[derive(Debug, Clone)]
    struct Wrapped(crate::testing::Note);

    impl Wrapped {
        fn store(&self) -> &dyn BackingStore {
            self.0.store()
        }

        fn store_mut(&mut self) -> &mut dyn BackingStore {
            self.0.store_mut()
        }

        fn serialize_fields(
            &self,
            writer: &mut dyn crate::write::SerializationWriter,
        ) -> crate::error::Result<()> {
            self.0.serialize_fields(writer)
        }

        fn field_deserializers() -> crate::parsable::FieldDeserializers<Self> {
            crate::parsable::FieldDeserializers::new()
        }
    }

    crate::impl_parsable!(Wrapped);

    #[test]
    #[should_panic(expected = "expected bool")]
    fn wrong_kind_is_fatal() {
        let mut store = InMemoryBackingStore::new();
        set(&mut store, "accountEnabled", "yes");
        let _ = get_bool(&store, "accountEnabled");
    }
}
