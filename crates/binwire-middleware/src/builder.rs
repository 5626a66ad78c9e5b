//! Middleware chain builder
//!
//! Middlewares are pushed outermost first. Responses unwind in reverse, so
//! the encoding stages are always pushed as one block (codec, gate,
//! negotiator) to keep negotiation, gate and codec running in that order.

use crate::binary_response::BinaryResponseFilter;
use crate::config::BinaryResponseConfig;
use binwire_compression::{CompressionConfig, ContentEncoder, EncodingNegotiator};
use binwire_core::{Endpoint, Middleware, Pipeline};
use std::sync::Arc;
use tracing::warn;

/// Middleware chain builder
#[derive(Debug, Default)]
pub struct MiddlewareBuilder {
    middlewares: Vec<Arc<dyn Middleware>>,
    encoding_installed: bool,
}

impl MiddlewareBuilder {
    /// Create a new middleware builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add response compression without the binary response gate
    #[must_use]
    pub fn with_compression(self, config: CompressionConfig) -> Self {
        self.with_encoding_stack(config, None)
    }

    /// Add compression gated by the binary response policy
    ///
    /// Installs, outermost first, the [`ContentEncoder`], the
    /// [`BinaryResponseFilter`] and the [`EncodingNegotiator`], so a coding
    /// vetoed by the filter is never applied.
    #[must_use]
    pub fn with_binary_response_encoding(
        self,
        policy: BinaryResponseConfig,
        compression: CompressionConfig,
    ) -> Self {
        self.with_encoding_stack(compression, Some(policy))
    }

    fn with_encoding_stack(
        mut self,
        compression: CompressionConfig,
        policy: Option<BinaryResponseConfig>,
    ) -> Self {
        if self.encoding_installed {
            warn!("Encoding stages already installed, ignoring duplicate");
            return self;
        }
        self.encoding_installed = true;

        self.middlewares
            .push(Arc::new(ContentEncoder::new(compression.clone())));
        if let Some(policy) = policy {
            self.middlewares
                .push(Arc::new(BinaryResponseFilter::with_config(policy)));
        }
        self.middlewares
            .push(Arc::new(EncodingNegotiator::new(compression)));
        self
    }

    /// Add custom middleware
    #[must_use]
    pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middlewares.push(middleware);
        self
    }

    /// Build the middleware chain
    ///
    /// Returns an `Arc<[Arc<dyn Middleware>]>` for efficient sharing.
    #[must_use]
    pub fn build(self) -> Arc<[Arc<dyn Middleware>]> {
        self.middlewares.into()
    }

    /// Build the chain and bind it to an endpoint
    #[must_use]
    pub fn build_pipeline(self, endpoint: Arc<dyn Endpoint>) -> Pipeline {
        Pipeline::new(self.build(), endpoint)
    }

    /// Get the number of middlewares in the chain
    #[must_use]
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// Check if the chain is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }
}
