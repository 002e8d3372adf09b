use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::cache::token_manager::TokenManager;
use crate::config::settings::{PayloadEncoding, SettingsConfig};
use crate::config::stage::{EndpointsConfig, Stage};
use crate::errors::DeliveryError;
use crate::handler::event::ScanRequest;
use crate::observability::metrics::get_metrics;
use crate::sources::FetchToken;
use crate::stats::ScoreData;

/// Body of the add-repository-ossf-scores request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScorePayload {
    pub project_id: String,
    pub project_sfid: String,
    pub repository_id: String,
    pub language: String,
    pub created_since: u64,
    pub updated_since: u64,
    pub contributor_count: u64,
    pub org_count: u64,
    pub commit_frequency: f64,
    pub recent_releases_count: u64,
    pub updated_issues_count: u64,
    pub closed_issues_count: u64,
    pub comment_frequency: f64,
    pub dependents_count: u64,
    pub criticality_score: f64,
}

impl ScorePayload {
    pub fn new(request: &ScanRequest, score: &ScoreData) -> Self {
        Self {
            project_id: request.project_id.to_owned(),
            project_sfid: request.project_sfid.to_owned(),
            repository_id: request.repository_id.to_owned(),
            language: score.language.to_owned(),
            created_since: score.created_since,
            updated_since: score.updated_since,
            contributor_count: score.contributor_count,
            org_count: score.org_count,
            commit_frequency: score.commit_frequency,
            recent_releases_count: score.recent_releases_count,
            updated_issues_count: score.updated_issues_count,
            closed_issues_count: score.closed_issues_count,
            comment_frequency: score.comment_frequency,
            dependents_count: score.dependents_count,
            criticality_score: score.criticality_score,
        }
    }
}

/// Delivers scores to the security service of the selected stage.
#[derive(Debug, Clone)]
pub struct ScoreSink {
    client: Client,
    endpoints: EndpointsConfig,
    encoding: PayloadEncoding,
}

impl ScoreSink {
    pub fn new(client: Client, settings: &SettingsConfig) -> Self {
        Self {
            client,
            endpoints: settings.endpoints.clone(),
            encoding: settings.payload_encoding,
        }
    }

    /// POST the scores with a bearer token from `tokens`.
    ///
    /// An unknown stage is rejected before any token is requested. A 401
    /// from the endpoint invalidates the cached token.
    pub async fn send<S: FetchToken>(
        &self,
        tokens: &TokenManager<S>,
        stage: &str,
        request: &ScanRequest,
        score: &ScoreData,
    ) -> Result<StatusCode, DeliveryError> {
        let metrics = get_metrics().await;
        let result = self.deliver(tokens, stage, request, score).await;
        match &result {
            Ok(status) => {
                metrics.deliveries.with_label_values(&[stage]).inc();
                info!(%status, project_sfid = %request.project_sfid, "successfully sent add repository ossf scores data");
            }
            Err(err) => {
                metrics.delivery_failures.with_label_values(&[err.reason()]).inc();
                error!(project_sfid = %request.project_sfid, "unable to send ossf scores: {}", err);
            }
        }
        result
    }

    async fn deliver<S: FetchToken>(
        &self,
        tokens: &TokenManager<S>,
        stage: &str,
        request: &ScanRequest,
        score: &ScoreData,
    ) -> Result<StatusCode, DeliveryError> {
        let stage: Stage = stage.parse()?;
        let url = self.endpoints.scores_url(stage, &request.project_sfid);

        let token = tokens
            .get_access_token()
            .await
            .map_err(DeliveryError::Unauthenticated)?;

        let payload = ScorePayload::new(request, score);
        let request = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("bearer {}", token.value))
            .header(ACCEPT, "application/json");
        let request = match self.encoding {
            PayloadEncoding::Form => request.form(&payload),
            PayloadEncoding::Json => request.json(&payload),
        };

        info!(%stage, url = %url, "sending ossf scores");
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(status);
        }

        if status == StatusCode::UNAUTHORIZED {
            warn!("ossf scores endpoint rejected the access_token, invalidating cache");
            tokens.invalidate().await;
        }
        let body = response.text().await.unwrap_or_default();
        Err(DeliveryError::Status { status, body })
    }
}
