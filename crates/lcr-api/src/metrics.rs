//! Prometheus metrics for monitoring API performance and revision activity.

use std::{sync::LazyLock, time::Instant};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use lcr_db::models::Difficulty;
use lcr_srs::RevisionCount;
use metrics::{Gauge, counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use regex::Regex;

use crate::catalog::{CatalogError, ProblemMetadata};

static UUID_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("valid uuid regex")
});
static NUMBER_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\d+(/|$)").expect("valid number regex"));
static SLUG_ROUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/catalog/problems/[^/]+$").expect("valid slug regex"));

/// Initialize Prometheus metrics exporter
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let builder = PrometheusBuilder::new().set_buckets_for_metric(
        Matcher::Full("http_request_duration_seconds".to_string()),
        &[
            0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ],
    )?;

    Ok(builder.install_recorder()?)
}

/// Middleware to record HTTP request metrics
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = normalize_path(req.uri().path());

    let in_flight = InFlight::enter(
        gauge!("http_requests_in_flight", "method" => method.clone(), "path" => path.clone()),
    );
    let response = next.run(req).await;
    drop(in_flight);

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path,
        "status" => status
    )
    .record(duration);

    response
}

/// Holds one unit of an in-flight gauge, released on drop so that requests
/// cancelled mid-handler are still counted out.
struct InFlight(Gauge);

impl InFlight {
    fn enter(gauge: Gauge) -> Self {
        gauge.increment(1.0);
        Self(gauge)
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.decrement(1.0);
    }
}

/// Normalize URL paths to reduce cardinality in metrics
/// Replaces UUIDs, numeric IDs and catalog slugs with placeholders
fn normalize_path(path: &str) -> String {
    if SLUG_ROUTE.is_match(path) {
        return "/catalog/problems/:slug".to_string();
    }

    let normalized = UUID_SEGMENT.replace_all(path, ":id");
    NUMBER_SEGMENT
        .replace_all(&normalized, "/:id$1")
        .into_owned()
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (StatusCode::OK, handle.render())
}

pub fn record_problem_created(difficulty: Difficulty) {
    counter!("problems_created_total", "difficulty" => difficulty.as_str()).increment(1);
}

/// Record a review event, labelled by the count it moved the problem to
///
/// Counts past the interval table share one label to bound cardinality.
pub fn record_revision(revision_count: RevisionCount, saturated_from: usize) {
    let label = match usize::try_from(revision_count.get()) {
        Ok(n) if n < saturated_from => n.to_string(),
        _ => format!("{saturated_from}+"),
    };
    counter!("revisions_total", "revision_count" => label).increment(1);
}

pub fn record_catalog_lookup(
    kind: &'static str,
    result: &Result<Option<ProblemMetadata>, CatalogError>,
) {
    let status = match result {
        Ok(Some(_)) => "found",
        Ok(None) => "missing",
        Err(_) => "error",
    };

    counter!(
        "catalog_lookups_total",
        "kind" => kind,
        "status" => status
    )
    .increment(1);
}
