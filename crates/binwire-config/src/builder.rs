//! Configuration builder

use crate::types::Config;
use binwire_compression::CompressionConfig;
use binwire_middleware::BinaryResponseConfig;

/// Builder for constructing configuration programmatically
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the binary-compression-only policy flag
    pub fn binary_compression_only(mut self, enabled: bool) -> Self {
        self.config.binary_response.binary_compression_only = enabled;
        self
    }

    /// Set the whole binary response policy
    pub fn binary_response(mut self, policy: BinaryResponseConfig) -> Self {
        self.config.binary_response = policy;
        self
    }

    /// Set compression configuration
    pub fn compression(mut self, compression: CompressionConfig) -> Self {
        self.config.compression = compression;
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> binwire_core::Result<Config> {
        crate::validator::validate_config(&self.config)?;
        Ok(self.config)
    }
}
