//! Invocation handler
//!
//! One call to [`Handler::handle`] processes one event: validate the
//! input, collect repository stats, deliver them to the security service.
//! Every failure is logged and reported; none of them panics or aborts
//! the process.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::cache::token_manager::TokenManager;
use crate::config::settings::ServiceConfig;
use crate::errors::ValidationError;
use crate::helpers::http::build_client;
use crate::helpers::time::get_instant;
use crate::observability::metrics::get_metrics;
use crate::sinks::ScoreSink;
use crate::sources::{ClientCredentialsSource, FetchToken};
use crate::stats::{GithubStats, RepositoryStats};

pub mod event;
pub mod validate;

use event::ScanEvent;
use validate::validate_input;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Delivered { http_status: u16, criticality_score: f64 },
    DeliveryFailed { reason: String },
    StatsFailed { reason: String },
}

impl Outcome {
    fn label(&self) -> &'static str {
        match self {
            Outcome::Delivered { .. } => "delivered",
            Outcome::DeliveryFailed { .. } => "delivery_failed",
            Outcome::StatsFailed { .. } => "stats_failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvocationReport {
    pub stage: String,
    pub repository: String,
    pub project_sfid: String,
    pub outcome: Outcome,
    pub duration_ms: u64,
}

pub struct Handler<S = ClientCredentialsSource, R = GithubStats> {
    config: Arc<ServiceConfig>,
    tokens: Arc<TokenManager<S>>,
    stats: R,
    sink: ScoreSink,
}

impl Handler {
    /// Wire the production collaborators from the config.
    pub fn from_config(config: Arc<ServiceConfig>) -> reqwest::Result<Self> {
        let client = build_client(&config.settings)?;
        let tokens = Arc::new(TokenManager::new(
            ClientCredentialsSource::new(client.clone(), config.auth.clone()),
            config.auth.safety_margin_seconds,
        ));
        let stats = GithubStats::new(client.clone(), &config.github);
        let sink = ScoreSink::new(client, &config.settings);
        Ok(Self::new(config, tokens, stats, sink))
    }
}

impl<S: FetchToken, R: RepositoryStats> Handler<S, R> {
    pub fn new(config: Arc<ServiceConfig>, tokens: Arc<TokenManager<S>>, stats: R, sink: ScoreSink) -> Self {
        Self { config, tokens, stats, sink }
    }

    pub fn tokens(&self) -> &Arc<TokenManager<S>> {
        &self.tokens
    }

    /// Process one event. `Err` means the input was incomplete and nothing
    /// was attempted.
    pub async fn handle(&self, event: &Value) -> Result<InvocationReport, ValidationError> {
        let start = get_instant();
        let metrics = get_metrics().await;

        let event = ScanEvent::from_value(event);
        let request = validate_input(&event, &self.config).inspect_err(|_| {
            metrics.invocations.with_label_values(&["invalid"]).inc();
        })?;

        let stage = request.stage.as_str();
        info!(%stage, project_sfid = %request.project_sfid, "processing repository: {}", request.repository);

        let outcome = match self
            .stats
            .repository_stats(&request.repository, &request.github_auth_token)
            .await
        {
            Ok(score) => {
                debug!(%stage, "received data: {}", serde_json::to_string_pretty(&score).unwrap_or_default());
                match self.sink.send(&*self.tokens, stage, &request, &score).await {
                    Ok(status) => Outcome::Delivered {
                        http_status: status.as_u16(),
                        criticality_score: score.criticality_score,
                    },
                    Err(err) => Outcome::DeliveryFailed { reason: err.to_string() },
                }
            }
            Err(err) => {
                metrics.stats_failures.inc();
                error!(
                    project_id = %request.project_id,
                    project_sfid = %request.project_sfid,
                    project_name = request.project_name.as_deref().unwrap_or_default(),
                    "unable to get repository stats for {}: {}",
                    request.repository,
                    err
                );
                Outcome::StatsFailed { reason: err.to_string() }
            }
        };
        metrics.invocations.with_label_values(&[outcome.label()]).inc();

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(%stage, outcome = outcome.label(), "Finished processing - duration: {}ms", duration_ms);

        Ok(InvocationReport {
            stage: request.stage.clone(),
            repository: request.repository.clone(),
            project_sfid: request.project_sfid.clone(),
            outcome,
            duration_ms,
        })
    }
}
