//! Decoder configuration
//!
//! The decoder has exactly one tunable: the base value of the
//! interface-relative command table. Hubs assign that base at runtime (a
//! `QueryInterface` exchange reports it), so host applications usually ship
//! it in their settings file alongside capture paths and channel mappings.
//! [`DecoderConfig`] deserializes from that YAML directly.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{HubtraceError, Result};

/// Interface base REV hubs report for the DEKA interface in practice.
pub const DEFAULT_INTERFACE_FIRST_ID: u16 = 0x1000;

/// Configuration for an RHSP decoder instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Base type id of the interface-relative command table.
    ///
    /// Interface commands are classified as `interface_first_id + offset`;
    /// the hub reports this base in its `QueryInterface` response.
    #[serde(default = "default_interface_first_id")]
    pub interface_first_id: u16,
}

fn default_interface_first_id() -> u16 {
    DEFAULT_INTERFACE_FIRST_ID
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self { interface_first_id: DEFAULT_INTERFACE_FIRST_ID }
    }
}

impl DecoderConfig {
    /// Create a configuration with an explicit interface base.
    pub fn new(interface_first_id: u16) -> Self {
        Self { interface_first_id }
    }

    /// Parse a configuration from YAML settings content.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| {
            HubtraceError::config_with_source("failed to parse decoder settings YAML", Box::new(e))
        })
    }

    /// Load a configuration from a YAML settings file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .map_err(|e| HubtraceError::capture_file(path.as_ref().to_path_buf(), e))?;
        Self::from_yaml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_deka_base() {
        let config = DecoderConfig::default();
        assert_eq!(config.interface_first_id, 0x1000);
    }

    #[test]
    fn parses_explicit_base_from_yaml() {
        let config = DecoderConfig::from_yaml("interface_first_id: 256\n").unwrap();
        assert_eq!(config.interface_first_id, 0x0100);
    }

    #[test]
    fn missing_field_falls_back_to_default() {
        let config = DecoderConfig::from_yaml("{}\n").unwrap();
        assert_eq!(config.interface_first_id, DEFAULT_INTERFACE_FIRST_ID);
    }

    #[test]
    fn malformed_yaml_reports_config_error() {
        let result = DecoderConfig::from_yaml("interface_first_id: [not a number\n");
        let error = result.unwrap_err();
        assert!(matches!(error, HubtraceError::Config { .. }));
        assert!(!error.is_retryable());
    }

    #[test]
    fn missing_settings_file_reports_file_error() {
        let result = DecoderConfig::from_yaml_file("/nonexistent/settings.yaml");
        assert!(matches!(result.unwrap_err(), HubtraceError::CaptureFile { .. }));
    }

    #[test]
    fn config_roundtrips_through_yaml() {
        let config = DecoderConfig::new(0x2000);
        let yaml = serde_yaml_ng::to_string(&config).unwrap();
        let parsed = DecoderConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, config);
    }
}
