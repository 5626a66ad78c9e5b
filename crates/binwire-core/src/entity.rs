//! Typed response entities
//!
//! Endpoints describe their payload as an [`Entity`] rather than raw body
//! bytes. When the entity is written into a response, its representation
//! category survives as an [`EntityKind`] extension so later pipeline
//! stages can tell raw bytes from text without looking at the body.

use crate::Result;
use bytes::Bytes;
use std::io::Read;

/// Default content type for raw byte payloads
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Response payload, tagged by representation
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    /// No body
    Empty,
    /// Raw byte sequence
    Bytes(Bytes),
    /// Bytes drained from a reader, optionally declared as text in `charset`
    Stream {
        /// Everything the source produced
        data: Bytes,
        /// Declared text charset, if any
        charset: Option<String>,
    },
    /// UTF-8 text
    Text(String),
    /// JSON document
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded` pairs
    Form(Vec<(String, String)>),
}

/// Representation category of an entity, stored in response extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKind {
    /// No body
    Empty,
    /// Raw byte sequence
    Bytes,
    /// Byte source with an optional declared charset
    Stream {
        /// Declared text charset, if any
        charset: Option<String>,
    },
    /// UTF-8 text
    Text,
    /// JSON document
    Json,
    /// Form pairs
    Form,
}

impl Entity {
    /// Read a byte source to completion
    pub fn from_reader<R: Read>(mut reader: R, charset: Option<&str>) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(Entity::Stream {
            data: Bytes::from(data),
            charset: charset.map(str::to_string),
        })
    }

    /// Serialize a value as a JSON entity
    pub fn json<T: serde::Serialize>(value: &T) -> Result<Self> {
        Ok(Entity::Json(serde_json::to_value(value)?))
    }

    /// The representation category of this entity
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Empty => EntityKind::Empty,
            Entity::Bytes(_) => EntityKind::Bytes,
            Entity::Stream { charset, .. } => EntityKind::Stream {
                charset: charset.clone(),
            },
            Entity::Text(_) => EntityKind::Text,
            Entity::Json(_) => EntityKind::Json,
            Entity::Form(_) => EntityKind::Form,
        }
    }

    /// Content type used when the response does not set one
    pub fn default_content_type(&self) -> Option<String> {
        match self {
            Entity::Empty => None,
            Entity::Bytes(_) | Entity::Stream { charset: None, .. } => {
                Some(OCTET_STREAM.to_string())
            }
            Entity::Stream {
                charset: Some(cs), ..
            } => Some(format!("text/plain; charset={cs}")),
            Entity::Text(_) => Some("text/plain; charset=utf-8".to_string()),
            Entity::Json(_) => Some("application/json".to_string()),
            Entity::Form(_) => Some("application/x-www-form-urlencoded".to_string()),
        }
    }

    /// Serialize the entity into body bytes
    pub fn into_bytes(self) -> Result<Bytes> {
        let bytes = match self {
            Entity::Empty => Bytes::new(),
            Entity::Bytes(data) | Entity::Stream { data, .. } => data,
            Entity::Text(text) => Bytes::from(text),
            Entity::Json(value) => Bytes::from(serde_json::to_vec(&value)?),
            Entity::Form(pairs) => {
                let encoded = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(pairs.iter())
                    .finish();
                Bytes::from(encoded)
            }
        };
        Ok(bytes)
    }
}

impl From<Bytes> for Entity {
    fn from(data: Bytes) -> Self {
        Entity::Bytes(data)
    }
}

impl From<Vec<u8>> for Entity {
    fn from(data: Vec<u8>) -> Self {
        Entity::Bytes(Bytes::from(data))
    }
}

impl From<&'static [u8]> for Entity {
    fn from(data: &'static [u8]) -> Self {
        Entity::Bytes(Bytes::from_static(data))
    }
}

impl From<String> for Entity {
    fn from(text: String) -> Self {
        Entity::Text(text)
    }
}

impl From<&str> for Entity {
    fn from(text: &str) -> Self {
        Entity::Text(text.to_string())
    }
}

impl From<serde_json::Value> for Entity {
    fn from(value: serde_json::Value) -> Self {
        Entity::Json(value)
    }
}
