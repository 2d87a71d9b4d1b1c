//! Configuration management for geoblock.
//!
//! The config file is optional: when it is missing every value falls back to
//! the defaults below, which target ipdeny.com, the `INPUT` chain and `sudo`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::GeoblockError;

/// Placeholder replaced by the lowercase country code in source URLs
pub const COUNTRY_PLACEHOLDER: &str = "{cc}";

/// Default config file location
pub const DEFAULT_CONFIG_PATH: &str = "/etc/geoblock/config.yaml";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Zone file URL templates
    pub sources: Sources,

    /// Inbound chain the drop rules are inserted into
    pub chain: String,

    /// Privilege elevation settings
    pub elevation: Elevation,

    /// Paths or names of the system tools
    pub binaries: Binaries,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: Sources::default(),
            chain: "INPUT".to_string(),
            elevation: Elevation::default(),
            binaries: Binaries::default(),
        }
    }
}

/// Per-version zone file URL templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sources {
    pub ipv4: String,
    pub ipv6: String,
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            ipv4: "https://www.ipdeny.com/ipblocks/data/countries/{cc}.zone".to_string(),
            ipv6: "https://www.ipdeny.com/ipv6/ipaddresses/blocks/{cc}.zone".to_string(),
        }
    }
}

/// How to gain root when not already running as root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Elevation {
    /// Prefix command (e.g. `sudo`, `doas`). Empty disables elevation.
    pub command: String,
}

impl Default for Elevation {
    fn default() -> Self {
        Self {
            command: "sudo".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Binaries {
    pub ipset: String,
    pub iptables: String,
    pub ip6tables: String,
}

impl Default for Binaries {
    fn default() -> Self {
        Self {
            ipset: "ipset".to_string(),
            iptables: "iptables".to_string(),
            ip6tables: "ip6tables".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;

        config.validate()?;

        Ok(config)
    }

    /// Load the file if it exists, otherwise use defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        for (name, template) in [
            ("sources.ipv4", &self.sources.ipv4),
            ("sources.ipv6", &self.sources.ipv6),
        ] {
            if !template.starts_with("https://") {
                return Err(GeoblockError::Config(format!(
                    "{} must use HTTPS: {}",
                    name, template
                ))
                .into());
            }
            if !template.contains(COUNTRY_PLACEHOLDER) {
                return Err(GeoblockError::Config(format!(
                    "{} must contain the {} placeholder: {}",
                    name, COUNTRY_PLACEHOLDER, template
                ))
                .into());
            }
        }

        for (name, value) in [
            ("chain", &self.chain),
            ("binaries.ipset", &self.binaries.ipset),
            ("binaries.iptables", &self.binaries.iptables),
            ("binaries.ip6tables", &self.binaries.ip6tables),
        ] {
            if !is_valid_word(value) {
                return Err(GeoblockError::Config(format!(
                    "{} must be a non-empty value without whitespace: {:?}",
                    name, value
                ))
                .into());
            }
        }

        if self.elevation.command.chars().any(char::is_whitespace) {
            return Err(GeoblockError::Config(format!(
                "elevation.command must not contain whitespace: {:?}",
                self.elevation.command
            ))
            .into());
        }

        Ok(())
    }
}

fn is_valid_word(value: &str) -> bool {
    !value.is_empty() && !value.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chain, "INPUT");
        assert_eq!(config.elevation.command, "sudo");
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let file = write_config("chain: GEOBLOCK\n");
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.chain, "GEOBLOCK");
        assert_eq!(config.sources, Sources::default());
        assert_eq!(config.binaries, Binaries::default());
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"
sources:
  ipv4: "https://mirror.example.org/v4/{cc}.zone"
  ipv6: "https://mirror.example.org/v6/{cc}.zone"
chain: INPUT
elevation:
  command: doas
binaries:
  ipset: /usr/sbin/ipset
  iptables: /usr/sbin/iptables-nft
  ip6tables: /usr/sbin/ip6tables-nft
"#,
        );
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.sources.ipv4, "https://mirror.example.org/v4/{cc}.zone");
        assert_eq!(config.elevation.command, "doas");
        assert_eq!(config.binaries.iptables, "/usr/sbin/iptables-nft");
    }

    #[test]
    fn test_empty_elevation_is_allowed() {
        let file = write_config("elevation:\n  command: \"\"\n");
        let config = Config::load(file.path()).unwrap();
        assert!(config.elevation.command.is_empty());
    }

    #[test]
    fn test_rejects_plain_http_source() {
        let mut config = Config::default();
        config.sources.ipv4 = "http://www.ipdeny.com/{cc}.zone".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("HTTPS"));
    }

    #[test]
    fn test_rejects_source_without_placeholder() {
        let mut config = Config::default();
        config.sources.ipv6 = "https://www.ipdeny.com/all.zone".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("{cc}"));
    }

    #[test]
    fn test_rejects_chain_with_whitespace() {
        let mut config = Config::default();
        config.chain = "INPUT -j ACCEPT".to_string();
        assert!(config.validate().is_err());

        config.chain = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_invalid_yaml() {
        let file = write_config("chain: [unterminated\n");
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default("/nonexistent/geoblock/config.yaml").unwrap();
        assert_eq!(config, Config::default());
    }
}
