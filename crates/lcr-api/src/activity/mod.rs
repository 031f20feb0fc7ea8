//! Per-day revision counts for the consistency heatmap.

pub mod routes;

pub use routes::routes;
