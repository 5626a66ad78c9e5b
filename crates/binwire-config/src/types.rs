//! Configuration types

use binwire_compression::CompressionConfig;
use binwire_middleware::BinaryResponseConfig;
use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Binary response policy
    #[serde(default, alias = "binary-response")]
    pub binary_response: BinaryResponseConfig,

    /// Content-coding negotiation and codec settings
    #[serde(default)]
    pub compression: CompressionConfig,
}
