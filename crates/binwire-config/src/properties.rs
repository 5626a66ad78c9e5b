//! Flat property and environment sources

use crate::Config;
use binwire_middleware::{BINARY_COMPRESSION_ONLY_PROPERTY, DEFAULT_BINARY_COMPRESSION_ONLY};
use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use tracing::warn;

/// Overrides `binary_response.binary_compression_only`
pub const ENV_BINARY_COMPRESSION_ONLY: &str = "BINWIRE_BINARY_COMPRESSION_ONLY";
/// Overrides `compression.enabled`
pub const ENV_COMPRESSION_ENABLED: &str = "BINWIRE_COMPRESSION_ENABLED";
/// Overrides `compression.level`
pub const ENV_COMPRESSION_LEVEL: &str = "BINWIRE_COMPRESSION_LEVEL";

/// Parse a boolean flag, accepting the usual spellings
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Resolve the policy flag from a host-supplied property map
///
/// A missing property means `true`. An unreadable one is logged and also
/// means `true`.
pub fn binary_compression_only_from_properties(properties: &HashMap<String, String>) -> bool {
    let Some(raw) = properties.get(BINARY_COMPRESSION_ONLY_PROPERTY) else {
        return DEFAULT_BINARY_COMPRESSION_ONLY;
    };
    parse_flag(raw).unwrap_or_else(|| {
        warn!(
            property = BINARY_COMPRESSION_ONLY_PROPERTY,
            value = %raw,
            "Invalid boolean property, using default"
        );
        DEFAULT_BINARY_COMPRESSION_ONLY
    })
}

/// Apply `BINWIRE_*` environment overrides; unparsable values are ignored
pub fn apply_env_overrides(config: &mut Config) {
    apply_overrides(config, |name| env::var(name).ok());
}

/// Defaults with `BINWIRE_*` environment overrides applied
pub fn env_defaults() -> Config {
    let mut config = Config::default();
    apply_env_overrides(&mut config);
    config
}

pub(crate) fn apply_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(flag) = read_override(&lookup, ENV_BINARY_COMPRESSION_ONLY, parse_flag) {
        config.binary_response.binary_compression_only = flag;
    }
    if let Some(enabled) = read_override(&lookup, ENV_COMPRESSION_ENABLED, parse_flag) {
        config.compression.enabled = enabled;
    }
    if let Some(level) = read_override(&lookup, ENV_COMPRESSION_LEVEL, |v| u32::from_str(v.trim()).ok()) {
        config.compression.level = level;
    }
}

fn read_override<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let raw = lookup(name)?;
    let parsed = parse(&raw);
    if parsed.is_none() {
        warn!(variable = name, value = %raw, "Ignoring unparsable environment override");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_property_defaults_to_true() {
        let properties = HashMap::new();
        assert!(binary_compression_only_from_properties(&properties));
    }

    #[test]
    fn test_property_read() {
        let mut properties = HashMap::new();
        properties.insert(BINARY_COMPRESSION_ONLY_PROPERTY.to_string(), "false".to_string());
        assert!(!binary_compression_only_from_properties(&properties));
    }

    #[test]
    fn test_invalid_property_falls_back() {
        let mut properties = HashMap::new();
        properties.insert(BINARY_COMPRESSION_ONLY_PROPERTY.to_string(), "nah".to_string());
        assert!(binary_compression_only_from_properties(&properties));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_BINARY_COMPRESSION_ONLY, "false"),
            (ENV_COMPRESSION_LEVEL, "3"),
            (ENV_COMPRESSION_ENABLED, "sometimes"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        apply_overrides(&mut config, |name| vars.get(name).map(|v| v.to_string()));

        assert!(!config.binary_response.binary_compression_only);
        assert_eq!(config.compression.level, 3);
        assert!(config.compression.enabled);
    }
}
