//! Configuration loading
//!
//! Settings come from an optional `weather.toml` in the working directory,
//! overridden by `WEATHER_*` environment variables.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::FixedOffset;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::constants::{
    DEFAULT_CACHE_DURATION_MS, DEFAULT_LOCATION, DEFAULT_SYNTHETIC_LATENCY_MS,
    DEFAULT_TIMEOUT_SECONDS, DEFAULT_UTC_OFFSET_MINUTES, OPEN_WEATHER_API_BASE,
};
use crate::locations::LocationIndex;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// OpenWeatherMap credential; absent means synthetic-only mode
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_location")]
    pub default_location: String,
    /// Lifetime of cached reports; 0 disables the cache
    #[serde(default = "default_cache_duration_ms")]
    pub cache_duration_ms: u64,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Offset used for day/night and calendar dates
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
    #[serde(default = "default_synthetic_latency_ms")]
    pub synthetic_latency_ms: u64,
}

fn default_api_base_url() -> String {
    OPEN_WEATHER_API_BASE.to_string()
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

fn default_cache_duration_ms() -> u64 {
    DEFAULT_CACHE_DURATION_MS
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_utc_offset_minutes() -> i32 {
    DEFAULT_UTC_OFFSET_MINUTES
}

fn default_synthetic_latency_ms() -> u64 {
    DEFAULT_SYNTHETIC_LATENCY_MS
}

impl Settings {
    /// Load from `weather.toml` (optional) and the environment, then validate
    pub fn load(index: &LocationIndex) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name("weather").required(false))
            .add_source(Environment::with_prefix("WEATHER"))
            .build()
            .context("Failed to build configuration")?;

        Self::from_config(config, index)
    }

    pub fn from_config(config: Config, index: &LocationIndex) -> Result<Self> {
        let mut settings: Settings = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        if settings
            .api_key
            .as_deref()
            .is_some_and(|key| key.trim().is_empty())
        {
            settings.api_key = None;
        }

        settings.validate(index)?;
        Ok(settings)
    }

    pub fn validate(&self, index: &LocationIndex) -> Result<()> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            bail!("Weather API base URL must be a valid HTTP or HTTPS URL");
        }

        if self.timeout_seconds == 0 || self.timeout_seconds > 300 {
            bail!("Weather API timeout must be between 1 and 300 seconds");
        }

        if self.utc_offset_minutes.abs() > 14 * 60 {
            bail!("UTC offset cannot exceed 14 hours");
        }

        index
            .resolve(&self.default_location)
            .with_context(|| format!("Unknown default location '{}'", self.default_location))?;

        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn cache_duration(&self) -> Duration {
        Duration::from_millis(self.cache_duration_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn synthetic_latency(&self) -> Duration {
        Duration::from_millis(self.synthetic_latency_ms)
    }

    pub fn utc_offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .with_context(|| format!("Invalid UTC offset: {} minutes", self.utc_offset_minutes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locations::BANGKOK_METRO;

    fn settings_with(overrides: &[(&str, &str)]) -> Result<Settings> {
        let mut builder = Config::builder();
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }
        Settings::from_config(builder.build()?, &BANGKOK_METRO)
    }

    #[test]
    fn test_defaults() {
        let settings = settings_with(&[]).unwrap();
        assert_eq!(settings.api_base_url, "https://api.openweathermap.org/data/2.5");
        assert_eq!(settings.default_location, "Bangkok");
        assert_eq!(settings.cache_duration(), Duration::from_secs(900));
        assert_eq!(settings.timeout(), Duration::from_secs(10));
        assert_eq!(settings.utc_offset().unwrap().local_minus_utc(), 7 * 3600);
        assert!(!settings.has_api_key());
    }

    #[test]
    fn test_blank_api_key_means_absent() {
        let settings = settings_with(&[("api_key", "  ")]).unwrap();
        assert!(!settings.has_api_key());

        let settings = settings_with(&[("api_key", "abc123def456")]).unwrap();
        assert_eq!(settings.api_key.as_deref(), Some("abc123def456"));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = settings_with(&[("api_base_url", "ftp://example.com")]).unwrap_err();
        assert!(err.to_string().contains("HTTP or HTTPS"));
    }

    #[test]
    fn test_timeout_range() {
        let err = settings_with(&[("timeout_seconds", "500")]).unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn test_unknown_default_location() {
        let err = settings_with(&[("default_location", "Chiang Mai")]).unwrap_err();
        assert!(err.to_string().contains("Unknown default location"));
    }

    #[test]
    fn test_string_overrides_parse_as_numbers() {
        let settings = settings_with(&[("cache_duration_ms", "0"), ("utc_offset_minutes", "-60")])
            .unwrap();
        assert!(settings.cache_duration().is_zero());
        assert_eq!(settings.utc_offset().unwrap().local_minus_utc(), -3600);
    }
}
