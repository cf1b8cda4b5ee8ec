use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::{Arc, OnceLock};
use tracing::info;

// Declare the static OnceLock to hold the Metrics.
static METRICS_INSTANCE: OnceLock<Arc<Metrics>> = OnceLock::new();

/// Initializes on first use and gets a reference to the process metrics.
pub fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE.get_or_init(|| {
        info!("Initializing Metrics ...");
        Metrics::new()
    })
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Cache metrics
    pub cache_hits: IntCounterVec,
    pub cache_misses: IntCounterVec,
    pub token_refreshes: IntCounterVec,
    pub repository_classifications: IntCounterVec,

    // Issuer metrics
    pub issuance_requests: IntCounterVec,
    pub issuance_failures: IntCounterVec,
    pub issuance_duration: HistogramVec,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("sdmtokenutil".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Cache
            cache_hits: IntCounterVec::new(Opts::new("token_cache_hits_total", "Token cache hits by flow"),&["flow"],).unwrap(),
            cache_misses: IntCounterVec::new(Opts::new("token_cache_misses_total", "Token cache misses by flow"),&["flow"],).unwrap(),
            token_refreshes: IntCounterVec::new(Opts::new("token_refreshes_total", "Cached tokens re-issued after expiry"),&["flow"],).unwrap(),
            repository_classifications: IntCounterVec::new(Opts::new("repository_classifications_total", "Repository classifications by type"),&["repository_type"],).unwrap(),

            // Issuer
            issuance_requests: IntCounterVec::new(Opts::new("issuance_requests_total","Token issuance requests by flow",),&["flow"],).unwrap(),
            issuance_failures: IntCounterVec::new(Opts::new("issuance_failures_total", "Token issuance failures by flow and status"),&["flow", "status"],).unwrap(),
            issuance_duration: HistogramVec::new(HistogramOpts::new("issuance_duration_seconds", "Token issuance duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),&["flow"],).unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.cache_hits.clone())).unwrap();
        reg.register(Box::new(metrics.cache_misses.clone())).unwrap();
        reg.register(Box::new(metrics.token_refreshes.clone())).unwrap();
        reg.register(Box::new(metrics.repository_classifications.clone())).unwrap();
        reg.register(Box::new(metrics.issuance_requests.clone())).unwrap();
        reg.register(Box::new(metrics.issuance_failures.clone())).unwrap();
        reg.register(Box::new(metrics.issuance_duration.clone())).unwrap();

        metrics
    }

    /// Prometheus text exposition of every registered metric.
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
