//! Configuration for the compression stages

use crate::compressor::CompressionAlgorithm;
use serde::{Deserialize, Serialize};

/// Compression configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionConfig {
    /// Enable compression
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Compression level, clamped per codec (gzip 9, brotli 11, zstd 22)
    #[serde(default = "default_level")]
    pub level: u32,

    /// Minimum response size to compress (in bytes)
    #[serde(default)]
    pub min_size: usize,

    /// Algorithms the server offers, most preferred first
    #[serde(default = "default_algorithms")]
    pub algorithms: Vec<CompressionAlgorithm>,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            level: default_level(),
            min_size: 0,
            algorithms: default_algorithms(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_level() -> u32 {
    6
}

fn default_algorithms() -> Vec<CompressionAlgorithm> {
    vec![
        CompressionAlgorithm::Gzip,
        CompressionAlgorithm::Brotli,
        CompressionAlgorithm::Zstd,
    ]
}

impl CompressionConfig {
    /// Check if compression should be applied based on content size
    pub fn should_compress(&self, size: usize) -> bool {
        self.enabled && size > 0 && size >= self.min_size
    }
}
