//! Serialization writers: the mirror image of parse nodes.
//!
//! Every writer method takes an optional key (`None` inside collections)
//! and an optional value. A `None` value writes nothing; use
//! [`SerializationWriter::write_null_value`] for an explicit `null`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, SecondsFormat};
use serde_json::{Map, Number, Value};
use uuid::Uuid;

use crate::duration::IsoDuration;
use crate::error::{Result, SerializationError};
use crate::parsable::{AdditionalData, Parsable};
use crate::value::StoreValue;

/// An encoder for models and wire primitives.
pub trait SerializationWriter {
    fn write_string_value(&mut self, key: Option<&str>, value: Option<&str>) -> Result<()>;
    fn write_bool_value(&mut self, key: Option<&str>, value: Option<bool>) -> Result<()>;
    fn write_byte_value(&mut self, key: Option<&str>, value: Option<u8>) -> Result<()>;
    fn write_i32_value(&mut self, key: Option<&str>, value: Option<i32>) -> Result<()>;
    fn write_i64_value(&mut self, key: Option<&str>, value: Option<i64>) -> Result<()>;
    fn write_f32_value(&mut self, key: Option<&str>, value: Option<f32>) -> Result<()>;
    fn write_f64_value(&mut self, key: Option<&str>, value: Option<f64>) -> Result<()>;
    fn write_uuid_value(&mut self, key: Option<&str>, value: Option<Uuid>) -> Result<()>;
    fn write_date_time_value(
        &mut self,
        key: Option<&str>,
        value: Option<DateTime<FixedOffset>>,
    ) -> Result<()>;
    fn write_date_value(&mut self, key: Option<&str>, value: Option<NaiveDate>) -> Result<()>;
    fn write_time_value(&mut self, key: Option<&str>, value: Option<NaiveTime>) -> Result<()>;
    fn write_duration_value(&mut self, key: Option<&str>, value: Option<IsoDuration>)
    -> Result<()>;
    fn write_byte_array_value(&mut self, key: Option<&str>, value: Option<&[u8]>) -> Result<()>;

    /// Writes an enum member by its wire name.
    fn write_enum_value(&mut self, key: Option<&str>, value: Option<&str>) -> Result<()>;

    fn write_null_value(&mut self, key: Option<&str>) -> Result<()>;

    fn write_object_value(&mut self, key: Option<&str>, value: Option<&dyn Parsable>)
    -> Result<()>;

    fn write_collection_of_object_values(
        &mut self,
        key: Option<&str>,
        values: Option<&[&dyn Parsable]>,
    ) -> Result<()>;

    fn write_collection_of_string_values(
        &mut self,
        key: Option<&str>,
        values: Option<&[String]>,
    ) -> Result<()>;

    /// Writes any stored value, dispatching on its kind.
    fn write_store_value(&mut self, key: Option<&str>, value: &StoreValue) -> Result<()>;

    /// Merges additional data into the object being written.
    fn write_additional_data(&mut self, data: Option<&AdditionalData>) -> Result<()>;

    /// Writes raw JSON verbatim.
    fn write_raw_value(&mut self, key: Option<&str>, value: Option<&Value>) -> Result<()>;
}

enum Frame {
    Object(Map<String, Value>),
    Array(Vec<Value>),
}

/// Builds a `serde_json::Value` tree.
#[derive(Default)]
pub struct JsonSerializationWriter {
    frames: Vec<Frame>,
    root: Option<Value>,
}

impl JsonSerializationWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the written value, or `Null` if nothing was written.
    pub fn into_value(self) -> Value {
        self.root.unwrap_or(Value::Null)
    }

    pub fn to_json_string(self) -> Result<String> {
        Ok(serde_json::to_string(&self.into_value())?)
    }

    pub fn to_pretty_string(self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.into_value())?)
    }

    fn put(&mut self, key: Option<&str>, value: Value) {
        match self.frames.last_mut() {
            Some(Frame::Object(map)) => {
                if let Some(key) = key {
                    map.insert(key.to_owned(), value);
                }
            }
            Some(Frame::Array(items)) => items.push(value),
            None => self.root = Some(value),
        }
    }

    fn put_some(&mut self, key: Option<&str>, value: Option<Value>) -> Result<()> {
        if let Some(value) = value {
            self.put(key, value);
        }
        Ok(())
    }

    fn write_model(&mut self, model: &dyn Parsable) -> Result<Value> {
        self.frames.push(Frame::Object(Map::new()));
        let written = write_model_fields(self, model);
        let map = match self.frames.pop() {
            Some(Frame::Object(map)) => map,
            _ => Map::new(),
        };
        written?;
        Ok(Value::Object(map))
    }

    fn write_array<F>(&mut self, fill: F) -> Result<Value>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.frames.push(Frame::Array(Vec::new()));
        let written = fill(self);
        let items = match self.frames.pop() {
            Some(Frame::Array(items)) => items,
            _ => Vec::new(),
        };
        written?;
        Ok(Value::Array(items))
    }
}

/// Writes a model's fields into the current object.
///
/// When the model's store only exposes changed values, keys that were
/// changed to `null` are written as explicit `null`s.
fn write_model_fields(writer: &mut dyn SerializationWriter, model: &dyn Parsable) -> Result<()> {
    model.serialize(writer)?;
    let store = model.backing_store();
    if store.return_only_changed_values() {
        for key in store.keys_changed_to_null() {
            writer.write_null_value(Some(key))?;
        }
    }
    Ok(())
}

fn float(value: f64) -> Value {
    match Number::from_f64(value) {
        Some(n) => Value::Number(n),
        None if value.is_nan() => Value::String("NaN".into()),
        None if value > 0.0 => Value::String("INF".into()),
        None => Value::String("-INF".into()),
    }
}

fn format_date_time(value: &DateTime<FixedOffset>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn format_time(value: &NaiveTime) -> String {
    value.format("%H:%M:%S%.f").to_string()
}

impl SerializationWriter for JsonSerializationWriter {
    fn write_string_value(&mut self, key: Option<&str>, value: Option<&str>) -> Result<()> {
        self.put_some(key, value.map(|s| Value::String(s.to_owned())))
    }

    fn write_bool_value(&mut self, key: Option<&str>, value: Option<bool>) -> Result<()> {
        self.put_some(key, value.map(Value::Bool))
    }

    fn write_byte_value(&mut self, key: Option<&str>, value: Option<u8>) -> Result<()> {
        self.put_some(key, value.map(Value::from))
    }

    fn write_i32_value(&mut self, key: Option<&str>, value: Option<i32>) -> Result<()> {
        self.put_some(key, value.map(Value::from))
    }

    fn write_i64_value(&mut self, key: Option<&str>, value: Option<i64>) -> Result<()> {
        self.put_some(key, value.map(Value::from))
    }

    fn write_f32_value(&mut self, key: Option<&str>, value: Option<f32>) -> Result<()> {
        self.put_some(key, value.map(|v| float(f64::from(v))))
    }

    fn write_f64_value(&mut self, key: Option<&str>, value: Option<f64>) -> Result<()> {
        self.put_some(key, value.map(float))
    }

    fn write_uuid_value(&mut self, key: Option<&str>, value: Option<Uuid>) -> Result<()> {
        self.put_some(
            key,
            value.map(|u| Value::String(u.hyphenated().to_string())),
        )
    }

    fn write_date_time_value(
        &mut self,
        key: Option<&str>,
        value: Option<DateTime<FixedOffset>>,
    ) -> Result<()> {
        self.put_some(key, value.map(|v| Value::String(format_date_time(&v))))
    }

    fn write_date_value(&mut self, key: Option<&str>, value: Option<NaiveDate>) -> Result<()> {
        self.put_some(
            key,
            value.map(|v| Value::String(v.format("%Y-%m-%d").to_string())),
        )
    }

    fn write_time_value(&mut self, key: Option<&str>, value: Option<NaiveTime>) -> Result<()> {
        self.put_some(key, value.map(|v| Value::String(format_time(&v))))
    }

    fn write_duration_value(
        &mut self,
        key: Option<&str>,
        value: Option<IsoDuration>,
    ) -> Result<()> {
        self.put_some(key, value.map(|v| Value::String(v.to_string())))
    }

    fn write_byte_array_value(&mut self, key: Option<&str>, value: Option<&[u8]>) -> Result<()> {
        self.put_some(key, value.map(|b| Value::String(BASE64.encode(b))))
    }

    fn write_enum_value(&mut self, key: Option<&str>, value: Option<&str>) -> Result<()> {
        self.write_string_value(key, value.filter(|s| !s.is_empty()))
    }

    fn write_null_value(&mut self, key: Option<&str>) -> Result<()> {
        self.put(key, Value::Null);
        Ok(())
    }

    fn write_object_value(
        &mut self,
        key: Option<&str>,
        value: Option<&dyn Parsable>,
    ) -> Result<()> {
        let Some(model) = value else {
            return Ok(());
        };
        let object = self.write_model(model)?;
        self.put(key, object);
        Ok(())
    }

    fn write_collection_of_object_values(
        &mut self,
        key: Option<&str>,
        values: Option<&[&dyn Parsable]>,
    ) -> Result<()> {
        let Some(models) = values else {
            return Ok(());
        };
        let array = self.write_array(|w| {
            for model in models {
                w.write_object_value(None, Some(*model))?;
            }
            Ok(())
        })?;
        self.put(key, array);
        Ok(())
    }

    fn write_collection_of_string_values(
        &mut self,
        key: Option<&str>,
        values: Option<&[String]>,
    ) -> Result<()> {
        self.put_some(
            key,
            values.map(|v| Value::Array(v.iter().cloned().map(Value::String).collect())),
        )
    }

    fn write_store_value(&mut self, key: Option<&str>, value: &StoreValue) -> Result<()> {
        match value {
            StoreValue::Null => self.write_null_value(key),
            StoreValue::Bool(v) => self.write_bool_value(key, Some(*v)),
            StoreValue::Byte(v) => self.write_byte_value(key, Some(*v)),
            StoreValue::Int32(v) => self.write_i32_value(key, Some(*v)),
            StoreValue::Int64(v) => self.write_i64_value(key, Some(*v)),
            StoreValue::Float32(v) => self.write_f32_value(key, Some(*v)),
            StoreValue::Float64(v) => self.write_f64_value(key, Some(*v)),
            StoreValue::String(v) => self.write_string_value(key, Some(v)),
            StoreValue::Uuid(v) => self.write_uuid_value(key, Some(*v)),
            StoreValue::DateTime(v) => self.write_date_time_value(key, Some(*v)),
            StoreValue::Date(v) => self.write_date_value(key, Some(*v)),
            StoreValue::Time(v) => self.write_time_value(key, Some(*v)),
            StoreValue::Duration(v) => self.write_duration_value(key, Some(*v)),
            StoreValue::Bytes(v) => self.write_byte_array_value(key, Some(v)),
            StoreValue::Enum(v) => self.write_enum_value(key, Some(v)),
            StoreValue::Object(model) => self.write_object_value(key, Some(model.as_ref())),
            StoreValue::Untyped(v) => self.write_raw_value(key, Some(v)),
            StoreValue::Collection(items) => {
                let array = self.write_array(|w| {
                    for item in items {
                        w.write_store_value(None, item)?;
                    }
                    Ok(())
                })?;
                self.put(key, array);
                Ok(())
            }
        }
    }

    fn write_additional_data(&mut self, data: Option<&AdditionalData>) -> Result<()> {
        let Some(data) = data else {
            return Ok(());
        };
        match self.frames.last_mut() {
            Some(Frame::Object(map)) => {
                for (key, value) in data {
                    map.entry(key.clone()).or_insert_with(|| value.clone());
                }
                Ok(())
            }
            _ if data.is_empty() => Ok(()),
            Some(Frame::Array(_)) => Err(SerializationError::NotAnObject("array")),
            None => Err(SerializationError::NotAnObject("null")),
        }
    }

    fn write_raw_value(&mut self, key: Option<&str>, value: Option<&Value>) -> Result<()> {
        self.put_some(key, value.cloned())
    }
}
