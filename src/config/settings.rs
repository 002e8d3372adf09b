use serde::Deserialize;

use crate::config::auth::{AuthConfig, SourceValue};
use crate::config::stage::EndpointsConfig;
use crate::utils::constants::{DEFAULT_GITHUB_API_URL, DEFAULT_HTTP_TIMEOUT_MS, ENV_STAGE};

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ServiceConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub github: GithubConfig,
}

/// ================================
/// Global service-wide settings
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct SettingsConfig {
    /// dev, staging or prod; anything else disables delivery
    #[serde(default = "default_stage")]
    pub stage: SourceValue,
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,
    #[serde(default)]
    pub payload_encoding: PayloadEncoding,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    pub logging: Option<LoggingConfig>,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            stage: default_stage(),
            http_timeout_ms: default_http_timeout_ms(),
            payload_encoding: PayloadEncoding::default(),
            endpoints: EndpointsConfig::default(),
            logging: None,
        }
    }
}

/// Body encoding of the scores POST.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PayloadEncoding {
    #[default]
    Form,
    Json,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct GithubConfig {
    #[serde(default = "default_github_api_url")]
    pub api_url: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self { api_url: default_github_api_url() }
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "json".to_string())
            .to_lowercase()
            .as_str()
        {
            "compact" | "text" => LogFormat::Compact,
            _ => LogFormat::Json,
        }
    }
}

fn default_stage() -> SourceValue {
    SourceValue::from_env(ENV_STAGE)
}

fn default_http_timeout_ms() -> u64 {
    DEFAULT_HTTP_TIMEOUT_MS
}

fn default_github_api_url() -> String {
    DEFAULT_GITHUB_API_URL.to_string()
}
