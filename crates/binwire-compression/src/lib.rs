//! Response compression for binwire
//!
//! Compression runs as two middlewares with a veto point between them:
//! - [`EncodingNegotiator`] reads `Accept-Encoding` (with q-values) and marks
//!   the chosen coding as pending on the response
//! - [`ContentEncoder`] transforms the body for a coding that is still
//!   pending when the response reaches it
//!
//! Codecs: gzip, brotli, zstd.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod compressor;
pub mod config;
pub mod encoding;
pub mod middleware;

pub use compressor::{CompressionAlgorithm, Compressor};
pub use config::CompressionConfig;
pub use encoding::{
    cancel_encoding, is_encoding_pending, pending_encoding, select_encoding, PendingEncoding,
};
pub use middleware::{ContentEncoder, EncodingNegotiator};
