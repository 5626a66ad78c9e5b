//! Configuration loading

use crate::properties::{apply_env_overrides, apply_overrides};
use crate::{Config, ConfigFormat};
use binwire_core::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Load configuration from a file
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;

    let format = ConfigFormat::from_path(path)?;

    load_from_str(&content, format)
}

/// Expand environment variables in configuration string
/// Supports syntax: ${VAR} and ${VAR:-default}
fn expand_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(:-([^}]*))?\}")
        .map_err(|e| Error::Config(format!("Invalid regex: {e}")))?;

    let mut result = String::new();
    let mut last_match = 0;

    for cap in re.captures_iter(content) {
        let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        let var_name = var_name.as_str();

        let value = match (env::var(var_name), cap.get(3)) {
            (Ok(val), _) => val,
            (Err(_), Some(default)) => default.as_str().to_string(),
            (Err(_), None) => {
                return Err(Error::Config(format!(
                    "Environment variable '{var_name}' not set and no default provided"
                )));
            }
        };

        result.push_str(&content[last_match..full_match.start()]);
        result.push_str(&value);
        last_match = full_match.end();
    }

    result.push_str(&content[last_match..]);

    Ok(result)
}

/// Load configuration from a string
pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<Config> {
    let expanded_content = expand_env_vars(content)?;

    let config = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(&expanded_content)
            .map_err(|e| Error::Config(format!("Failed to parse YAML: {e}")))?,
        ConfigFormat::Toml => toml::from_str(&expanded_content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {e}")))?,
        ConfigFormat::Json => serde_json::from_str(&expanded_content)
            .map_err(|e| Error::Config(format!("Failed to parse JSON: {e}")))?,
    };

    Ok(config)
}

/// Load a file, apply `BINWIRE_*` environment overrides, and validate
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let mut config = load_from_file(path)?;
    apply_env_overrides(&mut config);
    crate::validator::validate_config(&config)?;
    Ok(config)
}

/// Like [`load_config`], but never fails
///
/// Any read, parse or validation error is logged and the defaults are used,
/// still subject to `BINWIRE_*` overrides. Without an override the
/// binary-compression-only policy stays enabled.
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Config {
    load_or_fallback(path.as_ref(), |name| env::var(name).ok())
}

fn load_or_fallback(path: &Path, lookup: impl Fn(&str) -> Option<String>) -> Config {
    load_config(path).unwrap_or_else(|e| {
        warn!(
            path = %path.display(),
            error = %e,
            "Failed to load configuration, using defaults"
        );
        let mut config = Config::default();
        apply_overrides(&mut config, lookup);
        config
    })
}
