use crate::error::{StorageError, StorageResult};
use crate::storage::{MAX_SYNC_INTERVAL, validate_store_key};
use anyhow::Context;
use config::Config;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Buffered sync tuning: which slot to persist into and when to flush.
#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
pub struct SyncConfig {
    /// Persistence slot the buffered records are synchronized into.
    /// One running store must own the slot exclusively.
    #[builder(setter(into))]
    pub key: String,
    /// Flush once this many records were stored since the last sync.
    #[serde(default = "default_count_threshold")]
    #[builder(default = "default_count_threshold()")]
    pub count_threshold: usize,
    /// Flush once this much time passed since the last sync, e.g.
    /// `"20s"`. Values above the tokio timer maximum turn the time
    /// trigger off for the instance.
    #[serde(default = "default_sync_interval", with = "humantime_serde")]
    #[builder(default = "default_sync_interval()")]
    pub sync_interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            key: "trax_fixes".to_string(),
            count_threshold: default_count_threshold(),
            sync_interval: default_sync_interval(),
        }
    }
}

impl SyncConfig {
    /// Reject bad thresholds once, before any store is constructed.
    pub fn validate(&self) -> StorageResult<()> {
        validate_store_key(&self.key)?;
        if self.count_threshold == 0 {
            return Err(StorageError::InvalidConfig(
                "count_threshold must be at least 1".to_string(),
            ));
        }
        if self.sync_interval.is_zero() {
            return Err(StorageError::InvalidConfig(
                "sync_interval must be positive".to_string(),
            ));
        }
        if self.sync_interval > MAX_SYNC_INTERVAL {
            tracing::warn!(
                interval = ?self.sync_interval,
                "sync_interval exceeds the timer maximum, time-based syncing is disabled"
            );
        }
        Ok(())
    }
}

/// Connection settings for the telemetry server.
#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
pub struct ApiConfig {
    /// Server base URL, optionally carrying a path prefix, e.g.
    /// `https://api.example.net/v1`.
    #[builder(setter(into))]
    pub base_url: String,
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    #[builder(default = "default_request_timeout()")]
    pub timeout: Duration,
    #[serde(default = "default_connect_timeout", with = "humantime_serde")]
    #[builder(default = "default_connect_timeout()")]
    pub connect_timeout: Duration,
    #[serde(default = "default_user_agent")]
    #[builder(default = "default_user_agent()")]
    pub user_agent: String,
}

impl ApiConfig {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        Url::parse(&self.base_url)
            .with_context(|| format!("invalid base_url: '{}'", self.base_url))?;
        if self.timeout.is_zero() || self.connect_timeout.is_zero() {
            anyhow::bail!("timeouts must be positive");
        }
        Ok(())
    }
}

/// Top-level SDK configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
pub struct TraxConfig {
    pub api: ApiConfig,
    #[serde(default)]
    #[builder(default)]
    pub sync: SyncConfig,
}

impl TraxConfig {
    pub fn load(path: &Path) -> Result<TraxConfig, anyhow::Error> {
        let cfg = Config::builder()
            .add_source(config::File::from(path.to_path_buf()))
            .build()?;

        let parsed: TraxConfig = cfg.try_deserialize()?;
        parsed.validate()?;
        Ok(parsed)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.api.validate()?;
        self.sync.validate()?;
        Ok(())
    }
}

fn default_count_threshold() -> usize {
    1
}

fn default_sync_interval() -> Duration {
    Duration::from_secs(20)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_user_agent() -> String {
    "trax-client".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_sync_defaults() {
        let sync = SyncConfig::default();
        assert_eq!(sync.count_threshold, 1);
        assert_eq!(sync.sync_interval, Duration::from_secs(20));
        assert!(sync.validate().is_ok());
    }

    #[test]
    fn test_builder_fills_defaults() {
        let api = ApiConfigBuilder::default()
            .base_url("https://api.example.net")
            .build()
            .unwrap();
        assert_eq!(api.timeout, Duration::from_secs(10));
        assert_eq!(api.user_agent, "trax-client");
        assert!(api.validate().is_ok());
    }

    #[test]
    fn test_sync_validation_rejects_bad_values() {
        let mut sync = SyncConfig::default();
        sync.count_threshold = 0;
        assert!(matches!(
            sync.validate(),
            Err(StorageError::InvalidConfig(_))
        ));

        let mut sync = SyncConfig::default();
        sync.key = "has spaces".to_string();
        assert!(matches!(
            sync.validate(),
            Err(StorageError::InvalidConfig(_))
        ));

        let mut sync = SyncConfig::default();
        sync.sync_interval = Duration::ZERO;
        assert!(matches!(
            sync.validate(),
            Err(StorageError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_api_validation_rejects_bad_url() {
        let api = ApiConfig {
            base_url: "not a url".to_string(),
            timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
            user_agent: default_user_agent(),
        };
        assert!(api.validate().is_err());
    }

    #[test]
    fn test_load_from_yaml() {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        write!(
            file,
            "api:\n  base_url: https://api.example.net/v1\nsync:\n  key: journey_fixes\n  count_threshold: 20\n  sync_interval: 45s\n"
        )
        .unwrap();

        let cfg = TraxConfig::load(file.path()).unwrap();
        assert_eq!(cfg.api.base_url, "https://api.example.net/v1");
        assert_eq!(cfg.sync.key, "journey_fixes");
        assert_eq!(cfg.sync.count_threshold, 20);
        assert_eq!(cfg.sync.sync_interval, Duration::from_secs(45));
    }

    #[test]
    fn test_load_applies_sync_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        write!(file, "api:\n  base_url: https://api.example.net\n").unwrap();

        let cfg = TraxConfig::load(file.path()).unwrap();
        assert_eq!(cfg.sync.key, "trax_fixes");
        assert_eq!(cfg.sync.count_threshold, 1);
    }
}
