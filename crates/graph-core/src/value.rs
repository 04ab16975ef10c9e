//! Loosely typed values held by a backing store.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::duration::IsoDuration;
use crate::parsable::Parsable;

/// A wire-format value stored under a property key.
#[derive(Debug, Clone)]
pub enum StoreValue {
    Null,
    Bool(bool),
    Byte(u8),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    String(String),
    Uuid(Uuid),
    DateTime(DateTime<FixedOffset>),
    Date(NaiveDate),
    Time(NaiveTime),
    Duration(IsoDuration),
    /// Raw bytes, base64 on the wire.
    Bytes(Vec<u8>),
    /// An enum member by its wire name.
    Enum(String),
    Object(Box<dyn Parsable>),
    Collection(Vec<StoreValue>),
    /// Raw JSON, used for additional data and untyped properties.
    Untyped(serde_json::Value),
}

/// The primitive kinds a collection of primitives can be decoded as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Bool,
    Byte,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    Uuid,
    DateTime,
    Date,
    Time,
    Duration,
    Enum,
}

impl StoreValue {
    /// Wraps a model as an object value.
    pub fn object<T: Parsable>(model: T) -> Self {
        Self::Object(Box::new(model))
    }

    /// Builds a collection of object values.
    pub fn objects<T: Parsable>(models: Vec<T>) -> Self {
        Self::Collection(models.into_iter().map(Self::object).collect())
    }

    /// Builds a collection from already boxed models.
    pub fn boxed_objects(models: Vec<Box<dyn Parsable>>) -> Self {
        Self::Collection(models.into_iter().map(Self::Object).collect())
    }

    /// Builds an enum value from anything with a wire name.
    pub fn enumeration(wire_name: impl Into<String>) -> Self {
        Self::Enum(wire_name.into())
    }

    /// Returns `true` for [`StoreValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Names the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Byte(_) => "byte",
            Self::Int32(_) => "int32",
            Self::Int64(_) => "int64",
            Self::Float32(_) => "float32",
            Self::Float64(_) => "float64",
            Self::String(_) => "string",
            Self::Uuid(_) => "uuid",
            Self::DateTime(_) => "date-time",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::Duration(_) => "duration",
            Self::Bytes(_) => "bytes",
            Self::Enum(_) => "enum",
            Self::Object(_) => "object",
            Self::Collection(_) => "collection",
            Self::Untyped(_) => "untyped",
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for StoreValue {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

impl_from! {
    bool => Bool,
    u8 => Byte,
    i32 => Int32,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
    String => String,
    Uuid => Uuid,
    DateTime<FixedOffset> => DateTime,
    NaiveDate => Date,
    NaiveTime => Time,
    IsoDuration => Duration,
    Box<dyn Parsable> => Object,
    serde_json::Value => Untyped,
}

impl From<&str> for StoreValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl<T: Into<StoreValue>> From<Option<T>> for StoreValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<StoreValue>> From<Vec<T>> for StoreValue {
    fn from(values: Vec<T>) -> Self {
        Self::Collection(values.into_iter().map(Into::into).collect())
    }
}
