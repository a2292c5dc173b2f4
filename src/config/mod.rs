mod server;

pub use server::ServerConfig;

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Full service configuration. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub sync: SyncPolicy,
    pub forecast: ForecastPolicy,
    pub upstream: UpstreamConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.forecast.lifetime_threshold_days <= 0.0
            || decimal_setting(self.forecast.lifetime_threshold_days).is_none()
        {
            return Err(Error::Config(
                "forecast.lifetime_threshold_days must be a positive decimal".into(),
            ));
        }
        if self.forecast.stock_risk_multiplier < 0.0
            || decimal_setting(self.forecast.stock_risk_multiplier).is_none()
        {
            return Err(Error::Config(
                "forecast.stock_risk_multiplier must be a non-negative decimal".into(),
            ));
        }
        if self.upstream.page_size == 0 || self.upstream.page_size > 250 {
            return Err(Error::Config(
                "upstream.page_size must be between 1 and 250".into(),
            ));
        }
        if self.upstream.timeout_secs == 0 {
            return Err(Error::Config("upstream.timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncPolicy {
    /// Inventory synced more recently than this is left alone.
    pub freshness_window_hours: i64,
}

impl SyncPolicy {
    #[must_use]
    pub fn freshness_window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.freshness_window_hours)
    }
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            freshness_window_hours: 12,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForecastPolicy {
    /// Titles whose mean lifetime is below this many days need restocking.
    pub lifetime_threshold_days: f64,
    pub stock_risk_multiplier: f64,
}

impl ForecastPolicy {
    #[must_use]
    pub fn lifetime_threshold(&self) -> Decimal {
        decimal_setting(self.lifetime_threshold_days).unwrap_or_default()
    }

    #[must_use]
    pub fn risk_multiplier(&self) -> Decimal {
        decimal_setting(self.stock_risk_multiplier).unwrap_or_default()
    }
}

/// Reads a float setting back as the decimal it was written as, so `0.6`
/// becomes exactly 0.6.
fn decimal_setting(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str(&value.to_string()).ok()
}

impl Default for ForecastPolicy {
    fn default() -> Self {
        Self {
            lifetime_threshold_days: 15.0,
            stock_risk_multiplier: 0.6,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub api_version: String,
    pub timeout_secs: u64,
    pub page_size: u32,
    /// Replaces `https://{shop_domain}` when set.
    pub base_url: Option<String>,
}

impl UpstreamConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_version: "2024-01".to_string(),
            timeout_secs: 30,
            page_size: 50,
            base_url: None,
        }
    }
}
