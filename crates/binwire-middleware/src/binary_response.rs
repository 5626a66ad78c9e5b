//! Binary response filter middleware

use crate::config::BinaryResponseConfig;
use crate::gate::EncodingGate;
use async_trait::async_trait;
use binwire_core::{Body, Middleware, Next, Result};
use http::{Request, Response};

/// Runs the [`EncodingGate`] on every response passing through
///
/// Must sit between the content-coding negotiator (inside) and the codec
/// (outside); see [`MiddlewareBuilder::with_binary_response_encoding`].
///
/// [`MiddlewareBuilder::with_binary_response_encoding`]: crate::MiddlewareBuilder::with_binary_response_encoding
#[derive(Debug, Clone, Default)]
pub struct BinaryResponseFilter {
    gate: EncodingGate,
}

impl BinaryResponseFilter {
    /// Create a filter with the default (binary-compression-only) policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filter with a custom policy
    pub fn with_config(config: BinaryResponseConfig) -> Self {
        Self {
            gate: EncodingGate::new(config),
        }
    }

    /// The gate this filter applies
    pub fn gate(&self) -> &EncodingGate {
        &self.gate
    }
}

#[async_trait]
impl Middleware for BinaryResponseFilter {
    async fn call(&self, req: Request<Body>, next: Next) -> Result<Response<Body>> {
        let mut response = next.run(req).await?;
        self.gate.apply(&mut response);
        Ok(response)
    }
}
