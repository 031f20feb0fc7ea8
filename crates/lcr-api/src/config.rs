use chrono::FixedOffset;
use lcr_srs::{IntervalPolicy, STANDARD_INTERVAL_DAYS, STANDARD_SATURATION_DAYS, SrsError};
use serde::Deserialize;
use thiserror::Error;

use crate::timezone;

/// Deployment environment, selects log format and transport security defaults
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration from environment: {0}")]
    Env(#[from] envy::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// API configuration, read from environment variables of the same name in upper case
#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    pub database_url: String,
    pub jwt_secret: String,
    /// Expected `aud` claim; empty disables the audience check
    #[serde(default = "default_jwt_audience")]
    pub jwt_audience: String,
    #[serde(default)]
    pub env: Environment,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_database_max_connections")]
    pub database_max_connections: u32,
    /// Timezone used for "due today" when the client sends none, in minutes east of UTC
    #[serde(default)]
    pub default_utc_offset_minutes: i32,
    #[serde(default = "default_revision_interval_days")]
    pub revision_interval_days: Vec<u32>,
    #[serde(default = "default_revision_saturation_days")]
    pub revision_saturation_days: u32,
    #[serde(default = "default_catalog_base_url")]
    pub catalog_base_url: String,
    #[serde(default = "default_catalog_timeout_secs")]
    pub catalog_timeout_secs: u64,
    #[serde(default = "default_rate_limit_per_second")]
    pub rate_limit_per_second: u64,
    #[serde(default = "default_rate_limit_burst")]
    pub rate_limit_burst: u32,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config: Self = envy::from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Build a config from explicit key/value pairs, keys as environment variable names.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Self = envy::from_iter(pairs)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.len() < 32 {
            return Err(ConfigError::Invalid(
                "JWT_SECRET must be at least 32 characters long".to_string(),
            ));
        }
        self.default_offset()?;
        self.interval_policy()?;
        Ok(())
    }

    pub fn jwt_audience(&self) -> Option<&str> {
        Some(self.jwt_audience.as_str()).filter(|aud| !aud.is_empty())
    }

    pub fn default_offset(&self) -> Result<FixedOffset, ConfigError> {
        timezone::offset_from_minutes(self.default_utc_offset_minutes).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "DEFAULT_UTC_OFFSET_MINUTES out of range: {}",
                self.default_utc_offset_minutes
            ))
        })
    }

    pub fn interval_policy(&self) -> Result<IntervalPolicy, ConfigError> {
        IntervalPolicy::new(
            self.revision_interval_days.clone(),
            self.revision_saturation_days,
        )
        .map_err(|e: SrsError| ConfigError::Invalid(e.to_string()))
    }
}

fn default_jwt_audience() -> String {
    "authenticated".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string()]
}

const fn default_database_max_connections() -> u32 {
    10
}

fn default_revision_interval_days() -> Vec<u32> {
    STANDARD_INTERVAL_DAYS.to_vec()
}

const fn default_revision_saturation_days() -> u32 {
    STANDARD_SATURATION_DAYS
}

fn default_catalog_base_url() -> String {
    "https://leetcode.com".to_string()
}

const fn default_catalog_timeout_secs() -> u64 {
    10
}

const fn default_rate_limit_per_second() -> u64 {
    10
}

const fn default_rate_limit_burst() -> u32 {
    20
}
