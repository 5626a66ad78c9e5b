//! # binwire core
//!
//! Core types, traits, and error handling shared by the binwire crates:
//! - Typed response entities and the response builder
//! - Middleware trait, endpoints and the ordered pipeline
//! - Error types

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod entity;
pub mod error;
pub mod middleware;
pub mod response;

pub use entity::{Entity, EntityKind};
pub use error::{Error, Result};
pub use middleware::{endpoint_fn, Body, Endpoint, Middleware, Next, Pipeline};
pub use response::ResponseBuilder;

// Re-export commonly used HTTP types
pub use bytes::Bytes;
pub use http::{Request, Response, StatusCode};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::entity::{Entity, EntityKind};
    pub use crate::error::{Error, Result};
    pub use crate::middleware::{endpoint_fn, Body, Endpoint, Middleware, Next, Pipeline};
    pub use crate::response::{responses, ResponseBuilder};
}
