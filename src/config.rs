//! Binding configuration.

use crate::error::{Result, UrlSyncError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Configuration for a [`UrlHashBinding`](crate::UrlHashBinding).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingConfig {
    /// Debounce window for outbound URL writes, in milliseconds.
    /// Default: 200
    pub update_delay_ms: u64,

    /// Query parameter removed from the URL on every outbound cycle.
    pub legacy_query_param: String,

    /// Query parameter carrying a fragment relocated by an identity-provider redirect.
    pub redirect_query_param: String,

    /// Fragment used when the URL has no state (None = `#!{}`).
    pub default_fragment: Option<String>,

    /// Buffer size for tree and navigation notification channels.
    pub channel_capacity: usize,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            update_delay_ms: 200,
            legacy_query_param: "json_url".to_string(),
            redirect_query_param: "redirect_fragment".to_string(),
            default_fragment: None,
            channel_capacity: 16,
        }
    }
}

impl BindingConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: BindingConfig =
            serde_json::from_str(s).map_err(|e| UrlSyncError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            UrlSyncError::InvalidConfig(format!("{}: {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }

    pub fn update_delay(&self) -> Duration {
        Duration::from_millis(self.update_delay_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.channel_capacity == 0 {
            return Err(UrlSyncError::InvalidConfig(
                "channel_capacity must be at least 1".to_string(),
            ));
        }
        if self.legacy_query_param.is_empty() || self.redirect_query_param.is_empty() {
            return Err(UrlSyncError::InvalidConfig(
                "query parameter names must not be empty".to_string(),
            ));
        }
        if let Some(ref fragment) = self.default_fragment {
            if !fragment.starts_with("#!") {
                return Err(UrlSyncError::InvalidConfig(format!(
                    "default_fragment must start with \"#!\", got {:?}",
                    fragment
                )));
            }
        }
        Ok(())
    }
}
