//! # binwire configuration
//!
//! Resolves the binary response policy and compression settings from:
//! - Files (YAML, TOML, JSON) with `${VAR}` / `${VAR:-default}` expansion
//! - `BINWIRE_*` environment overrides
//! - Flat host property maps
//!
//! Loading failures never disable the restrictive policy: see
//! [`load_or_default`].

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod builder;
pub mod loader;
pub mod properties;
pub mod types;
pub mod validator;

pub use builder::ConfigBuilder;
pub use loader::{load_config, load_from_file, load_from_str, load_or_default};
pub use properties::{
    apply_env_overrides, binary_compression_only_from_properties, env_defaults, parse_flag,
};
pub use types::Config;
pub use validator::validate_config;

use binwire_core::{Error, Result};
use std::path::Path;

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format
    Yaml,
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::Config("Unable to detect config format".to_string()))?;

        match ext {
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "toml" => Ok(ConfigFormat::Toml),
            "json" => Ok(ConfigFormat::Json),
            _ => Err(Error::Config(format!("Unsupported config format: {ext}"))),
        }
    }
}
