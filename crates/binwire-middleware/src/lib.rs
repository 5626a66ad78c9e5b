//! # binwire middleware
//!
//! Binary/text response policy for gateways that can only deliver a body as
//! "binary" or "text":
//! - Binary classifier over the response entity
//! - Encoding gate deciding whether a negotiated coding may run
//! - Binary marker header for the transport layer
//! - Builder wiring negotiation, gate and codec in the required order

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod binary_response;
pub mod builder;
pub mod classifier;
pub mod config;
pub mod gate;
pub mod marker;

pub use binary_response::BinaryResponseFilter;
pub use builder::MiddlewareBuilder;
pub use classifier::{classify, classify_response, Representation};
pub use config::BinaryResponseConfig;
pub use gate::{EncodingGate, GateDecision};
pub use marker::{
    is_marked_binary, mark_binary, BINARY_COMPRESSION_ONLY_PROPERTY, BINARY_RESPONSE_HEADER,
    BINARY_RESPONSE_VALUE, DEFAULT_BINARY_COMPRESSION_ONLY,
};

// Re-export core middleware types from binwire-core
pub use binwire_core::middleware::{Middleware, Next};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::binary_response::BinaryResponseFilter;
    pub use crate::builder::MiddlewareBuilder;
    pub use crate::classifier::Representation;
    pub use crate::config::BinaryResponseConfig;
    pub use crate::gate::{EncodingGate, GateDecision};
    pub use crate::marker::{BINARY_COMPRESSION_ONLY_PROPERTY, BINARY_RESPONSE_HEADER};
    pub use binwire_core::middleware::{Middleware, Next};
}
