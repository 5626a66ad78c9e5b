//! Binary response policy configuration

use crate::marker::DEFAULT_BINARY_COMPRESSION_ONLY;
use serde::{Deserialize, Serialize};

/// Policy for the encoding gate, fixed for the lifetime of a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryResponseConfig {
    /// Only let compression run on binary responses
    #[serde(
        default = "default_binary_compression_only",
        alias = "binary-compression-only"
    )]
    pub binary_compression_only: bool,

    /// Also mark text responses as binary when they will be compressed,
    /// since their wire bytes are no longer text. Off by default.
    #[serde(default, alias = "mark-compressed-text")]
    pub mark_compressed_text: bool,
}

fn default_binary_compression_only() -> bool {
    DEFAULT_BINARY_COMPRESSION_ONLY
}

impl Default for BinaryResponseConfig {
    fn default() -> Self {
        Self {
            binary_compression_only: default_binary_compression_only(),
            mark_compressed_text: false,
        }
    }
}

impl BinaryResponseConfig {
    /// Permissive policy: text may be compressed
    pub fn permissive() -> Self {
        Self {
            binary_compression_only: false,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_restrictive() {
        let config = BinaryResponseConfig::default();
        assert!(config.binary_compression_only);
        assert!(!config.mark_compressed_text);
        assert!(!BinaryResponseConfig::permissive().binary_compression_only);
    }

    #[test]
    fn test_deserialize_with_aliases() {
        let config: BinaryResponseConfig =
            serde_json::from_str(r#"{"binary-compression-only": false}"#).unwrap();
        assert!(!config.binary_compression_only);

        let config: BinaryResponseConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, BinaryResponseConfig::default());
    }
}
