//! Third-party problem catalog lookups.
//!
//! The catalog is only consulted to pre-fill a new problem (title, difficulty,
//! topics, link). Nothing it returns is stored until the user submits it.

mod leetcode;
mod routes;

use async_trait::async_trait;
use lcr_db::models::Difficulty;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use leetcode::LeetCodeCatalog;
pub use routes::routes;

/// Public metadata of a catalog problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemMetadata {
    /// Problem number shown on the catalog site
    pub frontend_id: u32,
    pub title: String,
    pub slug: String,
    pub difficulty: Difficulty,
    pub topics: Vec<String>,
    pub url: String,
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("catalog returned errors: {0}")]
    Upstream(String),
    #[error("malformed catalog response: {0}")]
    Parse(String),
}

/// Lookup against an external problem catalog
#[async_trait]
pub trait CatalogClient: Send + Sync + std::fmt::Debug {
    /// Find a problem by its frontend number. `Ok(None)` when it does not exist.
    async fn search_by_id(&self, frontend_id: u32) -> Result<Option<ProblemMetadata>, CatalogError>;

    /// Fetch a problem by its title slug. `Ok(None)` when it does not exist.
    async fn fetch_by_slug(&self, slug: &str) -> Result<Option<ProblemMetadata>, CatalogError>;
}
