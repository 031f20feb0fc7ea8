use std::{sync::Arc, time::Duration};

use axum::Router;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

/// How often idle per-client buckets are dropped from the limiter
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Per-client rate limiting, keyed on the TCP peer address
///
/// Client-supplied headers such as `X-Forwarded-For` are ignored, so a caller
/// cannot pick a fresh bucket per request. Behind a reverse proxy every client
/// shares the proxy's bucket.
///
/// `per_second` is the replenish rate and `burst` the bucket size. Rejected
/// requests get `429 Too Many Requests` with `x-ratelimit-*` headers.
/// The server must be started with connect info so peers can be keyed.
pub fn apply_rate_limit<S>(router: Router<S>, per_second: u64, burst: u32) -> anyhow::Result<Router<S>>
where
    S: Clone + Send + Sync + 'static,
{
    let config = GovernorConfigBuilder::default()
        .per_second(per_second)
        .burst_size(burst)
        .key_extractor(PeerIpKeyExtractor)
        .use_headers()
        .finish()
        .ok_or_else(|| {
            anyhow::anyhow!(
                "invalid rate limit: per_second={per_second}, burst={burst} (both must be non-zero)"
            )
        })?;

    let limiter = config.limiter().clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            limiter.retain_recent();
        }
    });

    tracing::info!(per_second, burst, "Rate limiting enabled");

    Ok(router.layer(GovernorLayer::new(Arc::new(config))))
}
