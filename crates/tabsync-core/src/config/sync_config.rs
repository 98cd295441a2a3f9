use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::defaults;
use crate::error::{Result, TabSyncError};

/// Configuration of the tablist sync layer
///
/// Every field has a default, so partial JSON documents are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Period of the display-name sweep (milliseconds)
    pub reconcile_interval_ms: u64,

    /// Rewrite display names other plugins put into outbound packets
    pub anti_override: bool,

    /// Overwrite latency in outbound packets
    pub ping_spoof: PingSpoofConfig,

    /// Rewrite profile names to active nicknames
    pub nick_compat: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PingSpoofConfig {
    pub enabled: bool,

    /// Latency every row shows while enabled
    pub value: i32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            reconcile_interval_ms: defaults::DEFAULT_RECONCILE_INTERVAL_MS,
            anti_override: defaults::DEFAULT_ANTI_OVERRIDE,
            ping_spoof: PingSpoofConfig::default(),
            nick_compat: defaults::DEFAULT_NICK_COMPAT,
        }
    }
}

impl Default for PingSpoofConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::DEFAULT_PING_SPOOF_ENABLED,
            value: defaults::DEFAULT_PING_SPOOF_VALUE,
        }
    }
}

impl SyncConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SyncConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.reconcile_interval_ms == 0 {
            return Err(TabSyncError::ConfigError(
                "reconcile_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn reconcile_interval(&self) -> Duration {
        Duration::from_millis(self.reconcile_interval_ms)
    }

    /// Latency to force onto outbound entries, if ping spoofing is on
    pub fn spoofed_latency(&self) -> Option<i32> {
        self.ping_spoof.enabled.then_some(self.ping_spoof.value)
    }

    pub fn with_reconcile_interval_ms(mut self, interval_ms: u64) -> Self {
        self.reconcile_interval_ms = interval_ms;
        self
    }

    pub fn with_anti_override(mut self, enabled: bool) -> Self {
        self.anti_override = enabled;
        self
    }

    pub fn with_ping_spoof(mut self, value: i32) -> Self {
        self.ping_spoof = PingSpoofConfig {
            enabled: true,
            value,
        };
        self
    }

    pub fn with_nick_compat(mut self, enabled: bool) -> Self {
        self.nick_compat = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SyncConfig::new();
        assert_eq!(config.reconcile_interval(), Duration::from_secs(1));
        assert!(config.anti_override);
        assert!(config.nick_compat);
        assert_eq!(config.spoofed_latency(), None);
    }

    #[test]
    fn test_partial_json() {
        let config = SyncConfig::from_json_str(r#"{"ping_spoof":{"enabled":true,"value":-1}}"#)
            .unwrap();
        assert_eq!(config.spoofed_latency(), Some(-1));
        assert_eq!(config.reconcile_interval_ms, 1000);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = SyncConfig::from_json_str(r#"{"reconcile_interval_ms":0}"#).unwrap_err();
        assert!(matches!(err, TabSyncError::ConfigError(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = SyncConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, TabSyncError::SerializationError(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"anti_override":false,"reconcile_interval_ms":250}}"#).unwrap();

        let config = SyncConfig::load(file.path()).unwrap();
        assert!(!config.anti_override);
        assert_eq!(config.reconcile_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_load_missing_file() {
        let err = SyncConfig::load("/nonexistent/tabsync.json").unwrap_err();
        assert!(matches!(err, TabSyncError::IoError(_)));
    }

    #[test]
    fn test_builders() {
        let config = SyncConfig::new()
            .with_ping_spoof(5)
            .with_anti_override(false)
            .with_nick_compat(false)
            .with_reconcile_interval_ms(50);
        assert_eq!(config.spoofed_latency(), Some(5));
        assert!(!config.anti_override);
        assert!(!config.nick_compat);
        assert_eq!(config.reconcile_interval_ms, 50);
    }
}
