use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use tracing::info;
use std::sync::Arc;
use tokio::sync::OnceCell;


// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the process-wide `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE.get_or_init(|| async {
        info!("Initializing Metrics ...");
        Metrics::new()}
    ).await
}


#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Token metrics
    pub token_fetch_requests: IntCounter,
    pub token_fetch_failures: IntCounterVec,
    pub token_fetch_duration: Histogram,
    pub token_cache_hits: IntCounter,

    // Delivery metrics
    pub deliveries: IntCounterVec,
    pub delivery_failures: IntCounterVec,

    // Stats metrics
    pub stats_failures: IntCounter,
    pub invocations: IntCounterVec,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("ossfscanner".into()), None).expect("registry");

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Token
            token_fetch_requests: IntCounter::new("token_fetch_requests_total", "Auth endpoint round-trips").expect("metric"),
            token_fetch_failures: IntCounterVec::new(Opts::new("token_fetch_failures_total", "Token fetch failures by reason"), &["reason"]).expect("metric"),
            token_fetch_duration: Histogram::with_opts(HistogramOpts::new("token_fetch_duration_seconds", "Token fetch duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0])).expect("metric"),
            token_cache_hits: IntCounter::new("token_cache_hits_total", "Tokens served from cache").expect("metric"),

            // Delivery
            deliveries: IntCounterVec::new(Opts::new("score_deliveries_total", "Score deliveries by stage"), &["stage"]).expect("metric"),
            delivery_failures: IntCounterVec::new(Opts::new("score_delivery_failures_total", "Score delivery failures by reason"), &["reason"]).expect("metric"),

            // Stats
            stats_failures: IntCounter::new("stats_failures_total", "Repository stats retrieval failures").expect("metric"),
            invocations: IntCounterVec::new(Opts::new("invocations_total", "Handler invocations by outcome"), &["outcome"]).expect("metric"),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.token_fetch_requests.clone())).expect("register");
        reg.register(Box::new(metrics.token_fetch_failures.clone())).expect("register");
        reg.register(Box::new(metrics.token_fetch_duration.clone())).expect("register");
        reg.register(Box::new(metrics.token_cache_hits.clone())).expect("register");
        reg.register(Box::new(metrics.deliveries.clone())).expect("register");
        reg.register(Box::new(metrics.delivery_failures.clone())).expect("register");
        reg.register(Box::new(metrics.stats_failures.clone())).expect("register");
        reg.register(Box::new(metrics.invocations.clone())).expect("register");

        metrics
    }

    /// Prometheus text exposition of everything recorded so far.
    pub fn render(&self) -> String {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if encoder.encode(&self.registry.gather(), &mut buffer).is_err() {
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

#[cfg(test)]
mod test {
    use super::get_metrics;

    #[tokio::test]
    async fn render_contains_registered_metrics() {
        let metrics = get_metrics().await;
        metrics.token_cache_hits.inc();
        let text = metrics.render();
        assert!(text.contains("ossfscanner_token_cache_hits_total"));
    }
}
