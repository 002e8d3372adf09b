//! Error types for every failure a single invocation can run into.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing {0} environment variable")]
    MissingEnv(String),

    #[error("empty value for '{0}'")]
    EmptyValue(String),

    #[error("invalid config format: {0}")]
    InvalidFormat(String),
}

/// Failure to obtain a bearer token from the auth endpoint.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("auth request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("auth endpoint returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed token response: {0}")]
    MalformedResponse(String),
}

impl TokenError {
    /// Short label used for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            TokenError::Config(_) => "config",
            TokenError::Request(_) => "request",
            TokenError::Status { .. } => "status",
            TokenError::MalformedResponse(_) => "malformed",
        }
    }
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("invalid stage value {0} - expecting one of: [dev, staging, prod]")]
    UnknownStage(String),

    #[error("no access token available: {0}")]
    Unauthenticated(#[source] TokenError),

    #[error("ossf scores request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid response from add repository ossf scores endpoint: {status}")]
    Status { status: StatusCode, body: String },
}

impl DeliveryError {
    pub fn reason(&self) -> &'static str {
        match self {
            DeliveryError::UnknownStage(_) => "stage",
            DeliveryError::Unauthenticated(_) => "auth",
            DeliveryError::Request(_) => "request",
            DeliveryError::Status { .. } => "status",
        }
    }
}

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("invalid repository identifier '{0}'")]
    InvalidRepository(String),

    #[error("github request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("github API returned {status} for {url}")]
    Status { status: StatusCode, url: String },
}

/// Every configuration value or event field that was missing at entry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unable to generate criticality score report - missing {}", .missing.join(", "))]
pub struct ValidationError {
    pub missing: Vec<String>,
}
