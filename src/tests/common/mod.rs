use std::sync::Arc;
use std::time::Duration;

use httpmock::Method::POST;
use httpmock::{Mock, MockServer};
use reqwest::Client;
use serde_json::json;

use crate::cache::token_manager::TokenManager;
use crate::config::auth::{AuthConfig, SourceValue};
use crate::config::settings::ServiceConfig;
use crate::errors::StatsError;
use crate::sources::ClientCredentialsSource;
use crate::stats::{RepositoryStats, ScoreData};

pub const TOKEN_PATH: &str = "/oauth/token";

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

/// Auth settings pointing at `auth_server`, no environment involved.
pub fn literal_auth(auth_server: &MockServer) -> AuthConfig {
    AuthConfig {
        url: SourceValue::literal(auth_server.url(TOKEN_PATH)),
        client_id: SourceValue::literal("client-id"),
        client_secret: SourceValue::literal("client-secret"),
        audience: SourceValue::literal("https://api-gw.platform.linuxfoundation.org/"),
        safety_margin_seconds: 0,
    }
}

/// Config whose every stage endpoint is `ingest_server`.
pub fn service_config(stage: &str, auth_server: &MockServer, ingest_server: &MockServer) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.settings.stage = SourceValue::literal(stage);
    config.settings.endpoints.dev = ingest_server.base_url();
    config.settings.endpoints.staging = ingest_server.base_url();
    config.settings.endpoints.prod = ingest_server.base_url();
    config.auth = literal_auth(auth_server);
    config
}

pub fn token_manager(auth: AuthConfig) -> Arc<TokenManager> {
    let margin = auth.safety_margin_seconds;
    Arc::new(TokenManager::new(
        ClientCredentialsSource::new(build_reqwest_client(), auth),
        margin,
    ))
}

pub async fn mock_token_endpoint<'a>(server: &'a MockServer, access_token: &str, expires_in: u64) -> Mock<'a> {
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(TOKEN_PATH)
                .header("accept", "application/json")
                .header("content-type", "application/x-www-form-urlencoded")
                .body_includes("grant_type=client_credentials")
                .body_includes("client_id=client-id")
                .body_includes("client_secret=client-secret");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "access_token": access_token,
                    "expires_in": expires_in,
                    "token_type": "Bearer"
                }));
        })
        .await
}

pub fn sample_score() -> ScoreData {
    ScoreData {
        language: "Go".to_owned(),
        created_since: 70,
        updated_since: 0,
        contributor_count: 53,
        org_count: 6,
        commit_frequency: 3.4,
        recent_releases_count: 12,
        updated_issues_count: 41,
        closed_issues_count: 28,
        comment_frequency: 1.2,
        dependents_count: 0,
        criticality_score: 0.41234,
    }
}

/// Stats provider returning a fixed result.
pub struct FixedStats(pub Result<ScoreData, String>);

impl RepositoryStats for FixedStats {
    async fn repository_stats(&self, repository: &str, _auth_token: &str) -> Result<ScoreData, StatsError> {
        self.0
            .clone()
            .map_err(|_| StatsError::InvalidRepository(repository.to_owned()))
    }
}
