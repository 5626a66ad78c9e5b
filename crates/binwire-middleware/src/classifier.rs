//! Binary classifier
//!
//! Decides from the entity's representation category whether a response
//! body travels as binary or as text. Raw byte sequences, and byte sources
//! without a declared charset, are binary. Everything else is text,
//! including bodiless responses and responses whose entity was never tagged.

use binwire_core::EntityKind;
use http::Response;
use std::fmt;

/// How the transport should treat a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
    /// Raw bytes
    Binary,
    /// Human-readable text
    Text,
}

impl Representation {
    /// Whether this is [`Representation::Binary`]
    pub fn is_binary(self) -> bool {
        self == Representation::Binary
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Representation::Binary => f.write_str("binary"),
            Representation::Text => f.write_str("text"),
        }
    }
}

/// Classify an entity kind; `None` (unrecognized entity) is text
pub fn classify(kind: Option<&EntityKind>) -> Representation {
    match kind {
        Some(EntityKind::Bytes) | Some(EntityKind::Stream { charset: None }) => {
            Representation::Binary
        }
        Some(
            EntityKind::Empty
            | EntityKind::Text
            | EntityKind::Json
            | EntityKind::Form
            | EntityKind::Stream { charset: Some(_) },
        )
        | None => Representation::Text,
    }
}

/// Classify a response by the [`EntityKind`] recorded in its extensions
pub fn classify_response<B>(response: &Response<B>) -> Representation {
    classify(response.extensions().get::<EntityKind>())
}
