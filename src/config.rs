//! Runtime configuration: parsing and loading.
//!
//! The recorder is configured from a small TOML file supplied on the command
//! line:
//!
//! ```toml
//! import_dir = "/var/eod/import"
//! database_url = "/var/eod/recorder.db"
//!
//! [alert]
//! notify_below = 5
//! notify_target = "ops@example.com"
//! ```
//!
//! Entrypoints:
//! - Parse from a TOML string: [`load_config_str`]
//! - Parse from a file path: [`load_config_path`]

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Top-level recorder configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root of the import tree; deliveries live under its `ASCII/` subtree.
    pub import_dir: PathBuf,
    /// SQLite database path.
    pub database_url: String,
    /// Alerting thresholds and target.
    #[serde(default)]
    pub alert: AlertConfig,
}

/// Alert delivery configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct AlertConfig {
    /// Severities strictly below this value additionally trigger external
    /// notification (syslog convention: lower is more severe).
    pub notify_below: i32,
    /// Opaque notification target handed to the notifier; None disables delivery.
    pub notify_target: Option<String>,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            notify_below: 5,
            notify_target: None,
        }
    }
}

/// Parse a configuration from TOML text.
pub fn load_config_str(raw: &str) -> anyhow::Result<Config> {
    let cfg: Config = toml::from_str(raw).context("parse recorder config")?;
    Ok(cfg)
}

/// Read and parse a configuration file.
pub fn load_config_path(path: &Path) -> anyhow::Result<Config> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read config file {}", path.display()))?;
    load_config_str(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_defaults_alert() {
        let cfg = load_config_str(
            r#"
import_dir = "/tmp/import"
database_url = "/tmp/eod.db"
"#,
        )
        .unwrap();
        assert_eq!(cfg.alert.notify_below, 5);
        assert!(cfg.alert.notify_target.is_none());
    }

    #[test]
    fn unknown_keys_rejected() {
        let err = load_config_str("import_dir = \"/tmp\"\ndatabase_url = \"x\"\nbogus = 1\n");
        assert!(err.is_err());
    }
}
