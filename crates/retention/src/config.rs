/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

//! Configuration for the retention tool
//!
//! Configuration is assembled from three sources, later ones winning:
//! built-in defaults, an optional TOML file and `BACKUP_RETENTION_*`
//! environment variables.
//!
//! ```toml
//! dry_run = false
//!
//! [policy]
//! short_retention_days = 91
//! monthly_retention_months = 12
//! yearly_retention_years = 5
//!
//! [storage]
//! backend_type = "local"
//! local = { path = "/srv/backups" }
//! ```

use crate::{
    error::{RetentionError, Result},
    policy::RetentionPolicy,
    storage::StorageConfig,
};
use serde::{Deserialize, Serialize};
use std::{path::Path, str::FromStr};
use tracing::{debug, info, warn};

pub const ENV_SHORT_DAYS: &str = "BACKUP_RETENTION_SHORT_DAYS";
pub const ENV_MONTHLY_MONTHS: &str = "BACKUP_RETENTION_MONTHLY_MONTHS";
pub const ENV_YEARLY_YEARS: &str = "BACKUP_RETENTION_YEARLY_YEARS";
pub const ENV_PATH: &str = "BACKUP_RETENTION_PATH";
pub const ENV_DRY_RUN: &str = "BACKUP_RETENTION_DRY_RUN";

/// Main configuration for the retention tool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    pub dry_run: bool,
    pub policy: RetentionPolicy,
    pub storage: StorageConfig,
}

impl RetentionConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Load configuration from a TOML file
pub async fn load_from_file(path: &Path) -> Result<RetentionConfig> {
    info!("Loading configuration from file: {}", path.display());

    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        RetentionError::ConfigError(format!("Cannot read {}: {}", path.display(), e))
    })?;

    RetentionConfig::from_toml(&content)
}

/// Override configuration values from environment variables
pub fn apply_environment(config: RetentionConfig) -> Result<RetentionConfig> {
    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Load defaults or `path`, apply the environment and validate the policy
pub async fn load(path: Option<&Path>) -> Result<RetentionConfig> {
    let config = match path {
        Some(path) => load_from_file(path).await?,
        None => {
            debug!("No configuration file given, using defaults");
            RetentionConfig::default()
        }
    };

    let config = apply_environment(config)?;
    for warning in config.policy.validate() {
        warn!("Policy {}: {}", warning.field, warning.message);
    }

    Ok(config)
}

fn apply_overrides(
    mut config: RetentionConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<RetentionConfig> {
    if let Some(value) = lookup(ENV_SHORT_DAYS) {
        config.policy.short_retention_days = parse_var(ENV_SHORT_DAYS, &value)?;
    }

    if let Some(value) = lookup(ENV_MONTHLY_MONTHS) {
        config.policy.monthly_retention_months = parse_var(ENV_MONTHLY_MONTHS, &value)?;
    }

    if let Some(value) = lookup(ENV_YEARLY_YEARS) {
        config.policy.yearly_retention_years = parse_var(ENV_YEARLY_YEARS, &value)?;
    }

    if let Some(value) = lookup(ENV_PATH) {
        config.storage = StorageConfig::local(value);
    }

    if let Some(value) = lookup(ENV_DRY_RUN) {
        config.dry_run = parse_var(ENV_DRY_RUN, &value)?;
    }

    Ok(config)
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| RetentionError::ConfigError(format!("Invalid {}: {}", key, e)))
}
