// crates/relink-core/src/config.rs
//
// Every tunable number the engine uses. Nothing in the validator, search or
// orchestrator hard-codes a threshold. They read it from here so behaviour
// can be calibrated without touching the algorithms.
//
// Loaded from TOML; every field is optional and falls back to the default.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RestoreError, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestoreConfig {
    /// Minimum confidence for a live file to count as the saved one.
    pub validity_threshold:     f64,
    pub name_penalty:           f64,
    /// Must exceed `1 - validity_threshold` or size drift alone won't flag a file.
    pub size_penalty:           f64,
    pub timestamp_penalty:      f64,
    pub size_tolerance_bytes:   u64,
    /// FAT and SMB round mtimes to 2 s.
    pub timestamp_tolerance_ms: i64,
    pub search_depth:           usize,
    pub batch_size:             usize,
    pub probe_timeout_ms:       u64,
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self {
            validity_threshold:     0.6,
            name_penalty:           0.3,
            size_penalty:           0.5,
            timestamp_penalty:      0.2,
            size_tolerance_bytes:   0,
            timestamp_tolerance_ms: 2_000,
            search_depth:           3,
            batch_size:             3,
            probe_timeout_ms:       5_000,
        }
    }
}

impl RestoreConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let cfg  = Self::from_toml_str(&text)?;
        log::debug!("[config] loaded {}", path.display());
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let unit = [
            ("validity_threshold", self.validity_threshold),
            ("name_penalty",       self.name_penalty),
            ("size_penalty",       self.size_penalty),
            ("timestamp_penalty",  self.timestamp_penalty),
        ];
        for (field, v) in unit {
            if !(0.0..=1.0).contains(&v) {
                return Err(RestoreError::InvalidConfig(format!("{field} must be within 0..=1, got {v}")));
            }
        }
        if self.batch_size == 0 {
            return Err(RestoreError::InvalidConfig("batch_size must be at least 1".into()));
        }
        if self.probe_timeout_ms == 0 {
            return Err(RestoreError::InvalidConfig("probe_timeout_ms must be positive".into()));
        }
        if self.timestamp_tolerance_ms < 0 {
            return Err(RestoreError::InvalidConfig("timestamp_tolerance_ms must not be negative".into()));
        }
        Ok(())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(RestoreConfig::from_toml_str("").unwrap(), RestoreConfig::default());
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let cfg = RestoreConfig::from_toml_str("validity_threshold = 0.75\nsearch_depth = 5\n").unwrap();
        assert_eq!(cfg.validity_threshold, 0.75);
        assert_eq!(cfg.search_depth, 5);
        assert_eq!(cfg.batch_size, 3);
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let err = RestoreConfig::from_toml_str("validity_threshold = 1.5").unwrap_err();
        assert!(matches!(err, RestoreError::InvalidConfig(_)));
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        assert!(RestoreConfig::from_toml_str("batch_size = 0").is_err());
    }

    #[test]
    fn default_size_penalty_alone_drops_below_threshold() {
        let c = RestoreConfig::default();
        assert!(1.0 - c.size_penalty < c.validity_threshold);
        assert!(1.0 - c.name_penalty >= c.validity_threshold);
        assert!(1.0 - c.timestamp_penalty >= c.validity_threshold);
    }
}
