//! Parse nodes: typed readers over one wire value.
//!
//! [`ParseNode`] is the decoding seam; [`JsonParseNode`] is the JSON
//! implementation. A `null` wire value reads as `None` from every reader.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde_json::{Map, Value};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::duration::IsoDuration;
use crate::error::{Result, SerializationError};
use crate::parsable::{AdditionalData, ODATA_TYPE_KEY, Parsable, ParsableFactory};
use crate::value::{PrimitiveKind, StoreValue};

/// A typed reader over a single wire value.
pub trait ParseNode {
    /// Returns the child node under `key` if this node is an object that
    /// has it.
    fn child_node(&self, key: &str) -> Option<Box<dyn ParseNode + '_>>;

    /// The `@odata.type` discriminator of an object node.
    fn discriminator(&self) -> Option<String> {
        self.child_node(ODATA_TYPE_KEY)
            .and_then(|node| node.get_string_value().ok().flatten())
    }

    fn get_string_value(&self) -> Result<Option<String>>;
    fn get_bool_value(&self) -> Result<Option<bool>>;
    fn get_byte_value(&self) -> Result<Option<u8>>;
    fn get_i32_value(&self) -> Result<Option<i32>>;
    fn get_i64_value(&self) -> Result<Option<i64>>;
    fn get_f32_value(&self) -> Result<Option<f32>>;
    fn get_f64_value(&self) -> Result<Option<f64>>;
    fn get_uuid_value(&self) -> Result<Option<Uuid>>;
    fn get_date_time_value(&self) -> Result<Option<DateTime<FixedOffset>>>;
    fn get_date_value(&self) -> Result<Option<NaiveDate>>;
    fn get_time_value(&self) -> Result<Option<NaiveTime>>;
    fn get_duration_value(&self) -> Result<Option<IsoDuration>>;
    fn get_byte_array_value(&self) -> Result<Option<Vec<u8>>>;

    /// Reads an enum member as its raw wire name.
    fn get_enum_value(&self) -> Result<Option<String>>;

    /// Decodes a nested model; `factory` picks the concrete type.
    fn get_object_value(&self, factory: ParsableFactory) -> Result<Option<Box<dyn Parsable>>>;

    fn get_collection_of_object_values(
        &self,
        factory: ParsableFactory,
    ) -> Result<Option<Vec<Box<dyn Parsable>>>>;

    fn get_collection_of_primitive_values(
        &self,
        kind: PrimitiveKind,
    ) -> Result<Option<Vec<StoreValue>>>;

    /// Returns the node's wire value verbatim.
    fn get_raw_value(&self) -> Result<Option<Value>>;
}

/// A [`ParseNode`] over a borrowed `serde_json::Value`.
#[derive(Debug, Clone, Copy)]
pub struct JsonParseNode<'a> {
    value: &'a Value,
}

impl<'a> JsonParseNode<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }

    fn string(&self, expected: &'static str) -> Result<Option<&'a str>> {
        match self.value {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s.as_str())),
            other => Err(mismatch(expected, other)),
        }
    }

    fn parse_string<T>(
        &self,
        kind: &'static str,
        parse: impl FnOnce(&str) -> std::result::Result<T, String>,
    ) -> Result<Option<T>> {
        match self.string(kind)? {
            None => Ok(None),
            Some(s) => parse(s)
                .map(Some)
                .map_err(|reason| SerializationError::invalid(kind, s, reason)),
        }
    }

    fn integer(&self, expected: &'static str) -> Result<Option<i64>> {
        match self.value {
            Value::Null => Ok(None),
            Value::Number(n) => match n.as_i64() {
                Some(v) => Ok(Some(v)),
                None => Err(SerializationError::invalid(
                    expected,
                    n.to_string(),
                    "not an integer",
                )),
            },
            other => Err(mismatch(expected, other)),
        }
    }

    fn primitive(&self, kind: PrimitiveKind) -> Result<Option<StoreValue>> {
        Ok(match kind {
            PrimitiveKind::Bool => self.get_bool_value()?.map(StoreValue::Bool),
            PrimitiveKind::Byte => self.get_byte_value()?.map(StoreValue::Byte),
            PrimitiveKind::Int32 => self.get_i32_value()?.map(StoreValue::Int32),
            PrimitiveKind::Int64 => self.get_i64_value()?.map(StoreValue::Int64),
            PrimitiveKind::Float32 => self.get_f32_value()?.map(StoreValue::Float32),
            PrimitiveKind::Float64 => self.get_f64_value()?.map(StoreValue::Float64),
            PrimitiveKind::String => self.get_string_value()?.map(StoreValue::String),
            PrimitiveKind::Uuid => self.get_uuid_value()?.map(StoreValue::Uuid),
            PrimitiveKind::DateTime => self.get_date_time_value()?.map(StoreValue::DateTime),
            PrimitiveKind::Date => self.get_date_value()?.map(StoreValue::Date),
            PrimitiveKind::Time => self.get_time_value()?.map(StoreValue::Time),
            PrimitiveKind::Duration => self.get_duration_value()?.map(StoreValue::Duration),
            PrimitiveKind::Enum => self.get_enum_value()?.map(StoreValue::Enum),
        })
    }

    fn items(&self) -> Result<Option<&'a Vec<Value>>> {
        match self.value {
            Value::Null => Ok(None),
            Value::Array(items) => Ok(Some(items)),
            other => Err(mismatch("array", other)),
        }
    }
}

/// Names a JSON value's type, for error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(expected: &'static str, found: &Value) -> SerializationError {
    SerializationError::TypeMismatch {
        expected,
        found: json_kind(found),
    }
}

/// Decodes an object's fields into a freshly constructed model.
///
/// Fields without a decoder are collected into additional data. Once every
/// field is applied the store is marked initialized, so a freshly decoded
/// model reports no changes.
pub fn decode_object(
    object: &Map<String, Value>,
    node: &dyn ParseNode,
    factory: ParsableFactory,
) -> Result<Box<dyn Parsable>> {
    let mut model = factory(node)?;
    debug!(model = model.type_name(), "decoding object");
    model.backing_store_mut().set_initialization_completed(false);

    let mut unknown = AdditionalData::new();
    for (key, value) in object {
        let child = JsonParseNode::new(value);
        if !model.deserialize_field(key, &child)? {
            trace!(key = key.as_str(), model = model.type_name(), "stashing unknown field");
            unknown.insert(key.clone(), value.clone());
        }
    }
    if !unknown.is_empty() || model.additional_data().is_none() {
        let mut data = model.additional_data().cloned().unwrap_or_default();
        data.extend(unknown);
        model.set_additional_data(data);
    }

    model.backing_store_mut().set_initialization_completed(true);
    Ok(model)
}

/// Applies one wire field to an already decoded model.
///
/// Known fields go through the model's decoder; anything else is merged
/// into additional data. Either way the key is recorded as changed.
pub fn apply_field(model: &mut dyn Parsable, key: &str, value: &Value) -> Result<()> {
    if model.deserialize_field(key, &JsonParseNode::new(value))? {
        return Ok(());
    }
    let mut data = model.additional_data().cloned().unwrap_or_default();
    data.insert(key.to_owned(), value.clone());
    model.set_additional_data(data);
    Ok(())
}

impl ParseNode for JsonParseNode<'_> {
    fn child_node(&self, key: &str) -> Option<Box<dyn ParseNode + '_>> {
        match self.value {
            Value::Object(map) => map
                .get(key)
                .map(|v| Box::new(JsonParseNode::new(v)) as Box<dyn ParseNode + '_>),
            _ => None,
        }
    }

    fn get_string_value(&self) -> Result<Option<String>> {
        Ok(self.string("string")?.map(str::to_owned))
    }

    fn get_bool_value(&self) -> Result<Option<bool>> {
        match self.value {
            Value::Null => Ok(None),
            Value::Bool(b) => Ok(Some(*b)),
            other => Err(mismatch("bool", other)),
        }
    }

    fn get_byte_value(&self) -> Result<Option<u8>> {
        self.integer("byte")?
            .map(|v| {
                u8::try_from(v)
                    .map_err(|_| SerializationError::invalid("byte", v.to_string(), "out of range"))
            })
            .transpose()
    }

    fn get_i32_value(&self) -> Result<Option<i32>> {
        self.integer("int32")?
            .map(|v| {
                i32::try_from(v)
                    .map_err(|_| SerializationError::invalid("int32", v.to_string(), "out of range"))
            })
            .transpose()
    }

    fn get_i64_value(&self) -> Result<Option<i64>> {
        self.integer("int64")
    }

    fn get_f32_value(&self) -> Result<Option<f32>> {
        self.get_f64_value()?
            .map(|v| {
                let narrowed = v as f32;
                if v.is_finite() && !narrowed.is_finite() {
                    Err(SerializationError::invalid("float32", v.to_string(), "out of range"))
                } else {
                    Ok(narrowed)
                }
            })
            .transpose()
    }

    fn get_f64_value(&self) -> Result<Option<f64>> {
        match self.value {
            Value::Null => Ok(None),
            Value::Number(n) => Ok(n.as_f64()),
            // Graph sends non-finite doubles as strings.
            Value::String(s) => match s.as_str() {
                "NaN" => Ok(Some(f64::NAN)),
                "INF" | "Infinity" => Ok(Some(f64::INFINITY)),
                "-INF" | "-Infinity" => Ok(Some(f64::NEG_INFINITY)),
                _ => Err(SerializationError::invalid("float64", s.as_str(), "not a number")),
            },
            other => Err(mismatch("number", other)),
        }
    }

    fn get_uuid_value(&self) -> Result<Option<Uuid>> {
        self.parse_string("uuid", |s| Uuid::parse_str(s).map_err(|e| e.to_string()))
    }

    fn get_date_time_value(&self) -> Result<Option<DateTime<FixedOffset>>> {
        self.parse_string("date-time", |s| {
            DateTime::parse_from_rfc3339(s).map_err(|e| e.to_string())
        })
    }

    fn get_date_value(&self) -> Result<Option<NaiveDate>> {
        self.parse_string("date", |s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| e.to_string())
        })
    }

    fn get_time_value(&self) -> Result<Option<NaiveTime>> {
        self.parse_string("time", |s| {
            NaiveTime::parse_from_str(s, "%H:%M:%S%.f").map_err(|e| e.to_string())
        })
    }

    fn get_duration_value(&self) -> Result<Option<IsoDuration>> {
        match self.string("duration")? {
            None => Ok(None),
            Some(s) => IsoDuration::parse(s).map(Some),
        }
    }

    fn get_byte_array_value(&self) -> Result<Option<Vec<u8>>> {
        self.parse_string("base64", |s| BASE64.decode(s).map_err(|e| e.to_string()))
    }

    fn get_enum_value(&self) -> Result<Option<String>> {
        Ok(self
            .string("enum")?
            .filter(|s| !s.is_empty())
            .map(str::to_owned))
    }

    fn get_object_value(&self, factory: ParsableFactory) -> Result<Option<Box<dyn Parsable>>> {
        match self.value {
            Value::Null => Ok(None),
            Value::Object(map) => decode_object(map, self, factory).map(Some),
            other => Err(SerializationError::NotAnObject(json_kind(other))),
        }
    }

    fn get_collection_of_object_values(
        &self,
        factory: ParsableFactory,
    ) -> Result<Option<Vec<Box<dyn Parsable>>>> {
        let Some(items) = self.items()? else {
            return Ok(None);
        };
        let mut models = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let node = JsonParseNode::new(item);
            let decoded = node
                .get_object_value(factory)
                .map_err(|e| SerializationError::field(format!("[{index}]"), e))?;
            if let Some(model) = decoded {
                models.push(model);
            }
        }
        Ok(Some(models))
    }

    fn get_collection_of_primitive_values(
        &self,
        kind: PrimitiveKind,
    ) -> Result<Option<Vec<StoreValue>>> {
        let Some(items) = self.items()? else {
            return Ok(None);
        };
        let mut values = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let value = JsonParseNode::new(item)
                .primitive(kind)
                .map_err(|e| SerializationError::field(format!("[{index}]"), e))?;
            values.push(value.unwrap_or(StoreValue::Null));
        }
        Ok(Some(values))
    }

    fn get_raw_value(&self) -> Result<Option<Value>> {
        match self.value {
            Value::Null => Ok(None),
            other => Ok(Some(other.clone())),
        }
    }
}
