//! Runtime support for Graph model bindings.
//!
//! Models keep their properties in a [`BackingStore`], decode themselves one
//! wire field at a time through a [`ParseNode`], and encode through a
//! [`SerializationWriter`]. The [`json`] module ties these together for
//! whole documents.

pub mod accessor;
pub mod diff;
pub mod duration;
pub mod error;
pub mod json;
pub mod jsonl;
pub mod parsable;
pub mod parse;
pub mod store;
pub mod value;
pub mod write;

#[cfg(test)]
mod testing;

pub use duration::IsoDuration;
pub use error::{Result, SerializationError, StoreError};
pub use parsable::{
    ADDITIONAL_DATA_EDITS_KEY, ADDITIONAL_DATA_KEY, AdditionalData, FieldDeserializers,
    ODATA_TYPE_KEY, Parsable, ParsableFactory,
};
pub use parse::{JsonParseNode, ParseNode};
pub use store::{BackingStore, InMemoryBackingStore};
pub use value::{PrimitiveKind, StoreValue};
pub use write::{JsonSerializationWriter, SerializationWriter};
