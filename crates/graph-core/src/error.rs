//! Error types for decoding, encoding and backing-store access.

use std::io;

/// Errors raised while decoding or encoding a model.
///
/// Decoding stops at the first failure; the error carries the path of wire
/// fields leading to it through nested [`SerializationError::Field`] frames.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The wire value has the wrong JSON type for the requested reader.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// The wire value has the right JSON type but cannot be converted.
    #[error("invalid {kind} value '{value}': {reason}")]
    InvalidValue {
        kind: &'static str,
        value: String,
        reason: String,
    },

    /// Decoding a named field failed.
    #[error("field '{field}': {source}")]
    Field {
        field: String,
        #[source]
        source: Box<SerializationError>,
    },

    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),

    /// Strict decoding met a discriminator with no registered type.
    #[error("unknown discriminator '{0}'")]
    UnknownDiscriminator(String),

    /// A decoded model was not of the requested concrete type.
    #[error("expected model of type {expected}, decoded {found}")]
    Downcast {
        expected: &'static str,
        found: &'static str,
    },

    #[error("JSON error at line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: Box<SerializationError>,
    },
}

/// Result alias for codec operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

impl SerializationError {
    /// Wraps `source` with the wire name of the field being decoded.
    pub fn field(field: impl Into<String>, source: SerializationError) -> Self {
        Self::Field {
            field: field.into(),
            source: Box::new(source),
        }
    }

    /// Creates a [`SerializationError::InvalidValue`].
    pub fn invalid(
        kind: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            kind,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Returns the dotted path of wire fields leading to the innermost error,
    /// looking through line frames.
    ///
    /// Returns an empty string for errors not raised inside a field.
    pub fn field_path(&self) -> String {
        let mut parts = Vec::new();
        let mut current = self;
        loop {
            match current {
                Self::Field { field, source } => {
                    parts.push(field.as_str());
                    current = source;
                }
                Self::Line { source, .. } => current = source,
                _ => break,
            }
        }
        parts.join(".")
    }

    /// Returns the innermost error, skipping field and line frames.
    pub fn root_cause(&self) -> &SerializationError {
        match self {
            Self::Field { source, .. } | Self::Line { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Errors reported by a [`BackingStore`](crate::store::BackingStore)
/// implementation.
///
/// Model accessors treat these as fatal: a failing store is a broken store,
/// not bad data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("backing store failure: {0}")]
    Backend(String),

    #[error("key '{0}' is read-only")]
    ReadOnly(String),
}
