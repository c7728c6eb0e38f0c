use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::constants::store as defaults;
use crate::error::{StoreError, StoreResult};
use crate::granularity::TimeFrame;

#[derive(Clone, Debug, Deserialize)]
pub struct StoreConfig {
    /// API access token
    #[serde(default)]
    pub token: String,
    /// Account id
    #[serde(default)]
    pub account: String,
    /// Use the practice (fxpractice) environment
    #[serde(default)]
    pub practice: bool,
    /// Account refresh period in seconds, also the bound on the first-snapshot wait
    #[serde(default = "default_account_tmout")]
    pub account_tmout: f64,
}

fn default_account_tmout() -> f64 {
    defaults::ACCOUNT_TMOUT_SECS
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            account: String::new(),
            practice: false,
            account_tmout: default_account_tmout(),
        }
    }
}

impl StoreConfig {
    pub fn refresh_interval(&self) -> Duration {
        if self.account_tmout.is_finite() && self.account_tmout > 0.0 {
            Duration::from_secs_f64(self.account_tmout)
        } else {
            Duration::from_secs_f64(defaults::ACCOUNT_TMOUT_SECS)
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct InstrumentConfig {
    pub name: String,
    pub timeframe: TimeFrame,
    #[serde(default = "default_compression")]
    pub compression: u32,
}

fn default_compression() -> u32 {
    1
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub oanda: StoreConfig,
    #[serde(default)]
    pub instruments: Vec<InstrumentConfig>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_report_interval")]
    pub report_interval_secs: u64,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_report_interval() -> u64 {
    30
}

impl AppConfig {
    /// Load from the path in `OANDA_CONFIG`, or `config.yaml`
    pub fn load() -> StoreResult<Self> {
        let path = env::var("OANDA_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| StoreError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> StoreResult<Self> {
        // Strip BOM if present
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let config: AppConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup("OANDA_TOKEN") {
            self.oanda.token = token;
        }
        if let Some(account) = lookup("OANDA_ACCOUNT") {
            self.oanda.account = account;
        }
        if let Some(practice) = lookup("OANDA_PRACTICE") {
            self.oanda.practice = matches!(
                practice.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            );
        }
    }

    #[cfg(test)]
    pub(crate) fn apply_overrides_from(&mut self, vars: &[(&str, &str)]) {
        self.apply_overrides(|key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        });
    }
}
