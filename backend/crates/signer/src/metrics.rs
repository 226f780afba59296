//! Prometheus Metrics
//!
//! Process-wide registry for the sign path. The registry and the signer's
//! series are both lazy statics, registered on first use. [`init`] forces
//! that at startup; if registration fails every recorder is a no-op.

use axum::http::StatusCode;
use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramTimer, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};

lazy_static! {
    static ref REGISTRY: Registry = Registry::new();
    static ref METRICS: Option<SignerMetrics> = SignerMetrics::registered(&REGISTRY)
        .map_err(|e| tracing::error!(error = %e, "Failed to register signer metrics"))
        .ok();
}

/// Latency buckets in seconds, covering local DB writes through slow RPC reads
const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
];

/// Timed stages of a sign call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Authentication,
    QuotaResolution,
    Signature,
    Persistence,
}

struct SignerMetrics {
    requests: IntCounter,
    missing_session_id: IntCounter,
    responses: IntCounterVec,
    blockchain_errors: IntCounter,
    duplicate_requests: IntCounter,
    authentication: Histogram,
    quota_resolution: Histogram,
    signature: Histogram,
    persistence: Histogram,
}

impl SignerMetrics {
    fn new() -> prometheus::Result<Self> {
        Ok(Self {
            requests: IntCounter::new("signer_requests_total", "Sign requests received")?,
            missing_session_id: IntCounter::new(
                "signer_missing_session_id_total",
                "Sign requests submitted without a session id",
            )?,
            responses: IntCounterVec::new(
                Opts::new("signer_responses_total", "Sign responses by status code"),
                &["status"],
            )?,
            blockchain_errors: IntCounter::new(
                "signer_blockchain_errors_total",
                "Quota or chain-height reads that failed",
            )?,
            duplicate_requests: IntCounter::new(
                "signer_duplicate_requests_total",
                "Sign requests whose fingerprint was already stored",
            )?,
            authentication: histogram(
                "signer_authentication_seconds",
                "Time spent authenticating the caller",
            )?,
            quota_resolution: histogram(
                "signer_quota_resolution_seconds",
                "Time spent reading quota and chain height",
            )?,
            signature: histogram(
                "signer_signature_seconds",
                "Time spent computing the partial signature",
            )?,
            persistence: histogram(
                "signer_persistence_seconds",
                "Time spent storing the request and incrementing the count",
            )?,
        })
    }

    fn registered(registry: &Registry) -> prometheus::Result<Self> {
        let metrics = Self::new()?;
        metrics.register(registry)?;
        Ok(metrics)
    }

    fn register(&self, registry: &Registry) -> prometheus::Result<()> {
        registry.register(Box::new(self.requests.clone()))?;
        registry.register(Box::new(self.missing_session_id.clone()))?;
        registry.register(Box::new(self.responses.clone()))?;
        registry.register(Box::new(self.blockchain_errors.clone()))?;
        registry.register(Box::new(self.duplicate_requests.clone()))?;
        registry.register(Box::new(self.authentication.clone()))?;
        registry.register(Box::new(self.quota_resolution.clone()))?;
        registry.register(Box::new(self.signature.clone()))?;
        registry.register(Box::new(self.persistence.clone()))?;
        Ok(())
    }

    fn histogram(&self, stage: Stage) -> &Histogram {
        match stage {
            Stage::Authentication => &self.authentication,
            Stage::QuotaResolution => &self.quota_resolution,
            Stage::Signature => &self.signature,
            Stage::Persistence => &self.persistence,
        }
    }
}

fn histogram(name: &str, help: &str) -> prometheus::Result<Histogram> {
    Histogram::with_opts(HistogramOpts::new(name, help).buckets(LATENCY_BUCKETS.to_vec()))
}

/// Register signer metrics. Calling it again is a no-op.
pub fn init() -> prometheus::Result<()> {
    match METRICS.as_ref() {
        Some(_) => Ok(()),
        None => Err(prometheus::Error::Msg(
            "signer metrics registration failed".to_string(),
        )),
    }
}

fn with_metrics(f: impl FnOnce(&SignerMetrics)) {
    if let Some(metrics) = METRICS.as_ref() {
        f(metrics);
    }
}

pub fn inc_requests() {
    with_metrics(|m| m.requests.inc());
}

pub fn inc_missing_session_id() {
    with_metrics(|m| m.missing_session_id.inc());
}

pub fn inc_blockchain_errors() {
    with_metrics(|m| m.blockchain_errors.inc());
}

pub fn inc_duplicate_requests() {
    with_metrics(|m| m.duplicate_requests.inc());
}

pub fn record_response(status: StatusCode) {
    with_metrics(|m| {
        m.responses
            .with_label_values(&[status.as_str()])
            .inc();
    });
}

/// Start a latency timer; it observes when dropped
pub fn start_timer(stage: Stage) -> Option<HistogramTimer> {
    METRICS.as_ref().map(|m| m.histogram(stage).start_timer())
}

/// Text exposition of everything in the signer registry
pub fn render() -> prometheus::Result<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&REGISTRY.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

/// Current value of an unlabelled counter, read back from the text exposition
#[cfg(test)]
pub(crate) fn counter_value(name: &str) -> u64 {
    let text = render().unwrap();
    text.lines()
        .find_map(|line| line.strip_prefix(name)?.strip_prefix(' '))
        .and_then(|v| v.trim().parse::<f64>().ok())
        .map(|v| v as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init().unwrap();
        init().unwrap();
    }

    #[test]
    fn test_render_includes_recorded_series() {
        init().unwrap();
        inc_requests();
        record_response(StatusCode::FORBIDDEN);
        drop(start_timer(Stage::Signature));

        let text = render().unwrap();
        assert!(text.contains("signer_requests_total"));
        assert!(text.contains(r#"signer_responses_total{status="403"}"#));
        assert!(text.contains("signer_signature_seconds_bucket"));
    }

    #[test]
    fn test_counter_value_reads_back_increments() {
        init().unwrap();
        let before = counter_value("signer_duplicate_requests_total");
        inc_duplicate_requests();
        assert!(counter_value("signer_duplicate_requests_total") > before);
    }
}
