use std::{sync::Arc, time::Duration};

use axum::extract::FromRef;
use chrono::FixedOffset;
use lcr_srs::RevisionScheduler;
use sqlx::PgPool;

use crate::{
    ApiConfig,
    catalog::{CatalogClient, LeetCodeCatalog},
    config::Environment,
};

/// Settings needed to verify access tokens
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub audience: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ApiState {
    pub pool: PgPool,
    pub scheduler: Arc<RevisionScheduler>,
    pub catalog: Arc<dyn CatalogClient>,
    pub auth: AuthConfig,
    pub environment: Environment,
    /// Timezone for calendar-day decisions when the client sends none
    pub default_offset: FixedOffset,
}

impl ApiState {
    pub fn new(config: &ApiConfig, pool: PgPool) -> anyhow::Result<Self> {
        let scheduler = RevisionScheduler::new(config.interval_policy()?);

        let catalog = LeetCodeCatalog::new(
            &config.catalog_base_url,
            Duration::from_secs(config.catalog_timeout_secs),
        )?;

        tracing::info!(
            intervals = ?scheduler.policy().table(),
            saturation_days = scheduler.policy().saturation_days(),
            catalog = %config.catalog_base_url,
            "Revision scheduler configured"
        );

        Ok(Self {
            pool,
            scheduler: Arc::new(scheduler),
            catalog: Arc::new(catalog),
            auth: AuthConfig {
                jwt_secret: config.jwt_secret.clone(),
                audience: config.jwt_audience().map(str::to_owned),
            },
            environment: config.env,
            default_offset: config.default_offset()?,
        })
    }
}

impl FromRef<ApiState> for AuthConfig {
    fn from_ref(state: &ApiState) -> Self {
        state.auth.clone()
    }
}
