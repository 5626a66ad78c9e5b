//! Configuration validation

use crate::Config;
use binwire_compression::CompressionAlgorithm;
use binwire_core::{Error, Result};

/// Highest level any supported codec accepts
const MAX_LEVEL: u32 = 22;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_compression(config)?;
    Ok(())
}

fn validate_compression(config: &Config) -> Result<()> {
    let compression = &config.compression;

    if compression.level > MAX_LEVEL {
        return Err(Error::Config(format!(
            "compression level {} exceeds maximum of {MAX_LEVEL}",
            compression.level
        )));
    }

    if compression.enabled && compression.algorithms.is_empty() {
        return Err(Error::Config(
            "compression is enabled but no algorithms are configured".to_string(),
        ));
    }

    let gzip = CompressionAlgorithm::Gzip;
    if compression.algorithms.contains(&gzip) && compression.level > gzip.max_level() {
        tracing::warn!(
            level = compression.level,
            "gzip level above {} will be clamped",
            gzip.max_level()
        );
    }

    Ok(())
}
