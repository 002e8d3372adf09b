use serde::Deserialize;
use std::env;

use crate::errors::ConfigError;

pub const ENV_AUTH_URL: &str = "AUTH0_PLATFORM_URL";
pub const ENV_CLIENT_ID: &str = "AUTH0_PLATFORM_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "AUTH0_PLATFORM_CLIENT_SECRET";
pub const ENV_AUDIENCE: &str = "AUTH0_PLATFORM_AUDIENCE";

/// A configuration value given inline or read from the environment
/// when it is needed.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum SourceValue {
    Literal { value: String },
    FromEnv { from_env: String },
}

impl SourceValue {
    pub fn literal(value: impl Into<String>) -> Self {
        SourceValue::Literal { value: value.into() }
    }

    pub fn from_env(name: impl Into<String>) -> Self {
        SourceValue::FromEnv { from_env: name.into() }
    }

    /// Resolve to a non-blank string; blank values count as unset.
    pub fn resolve(&self) -> Result<String, ConfigError> {
        let (value, name) = match self {
            SourceValue::Literal { value } => (value.to_owned(), "value"),
            SourceValue::FromEnv { from_env } => (
                env::var(from_env).map_err(|_| ConfigError::MissingEnv(from_env.to_owned()))?,
                from_env.as_str(),
            ),
        };
        if value.trim().is_empty() {
            return Err(ConfigError::EmptyValue(name.to_owned()));
        }
        Ok(value)
    }

    /// Human readable description of what is missing, if anything.
    pub fn describe_missing(&self, field: &str) -> Option<String> {
        match self.resolve() {
            Ok(_) => None,
            Err(ConfigError::MissingEnv(name)) => Some(format!("{} environment variable", name)),
            Err(_) => Some(field.to_owned()),
        }
    }
}

/// OAuth2 client-credentials settings for the platform auth endpoint.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    #[serde(default = "default_url")]
    pub url: SourceValue,
    #[serde(default = "default_client_id")]
    pub client_id: SourceValue,
    #[serde(default = "default_client_secret")]
    pub client_secret: SourceValue,
    #[serde(default = "default_audience")]
    pub audience: SourceValue,
    /// Seconds subtracted from the token expiry when checking validity.
    #[serde(default)]
    pub safety_margin_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            client_id: default_client_id(),
            client_secret: default_client_secret(),
            audience: default_audience(),
            safety_margin_seconds: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub url: String,
    pub client_id: String,
    pub client_secret: String,
    pub audience: String,
}

impl AuthConfig {
    pub fn resolve(&self) -> Result<ClientCredentials, ConfigError> {
        Ok(ClientCredentials {
            url: self.url.resolve()?,
            client_id: self.client_id.resolve()?,
            client_secret: self.client_secret.resolve()?,
            audience: self.audience.resolve()?,
        })
    }

    pub fn missing(&self) -> Vec<String> {
        [
            (&self.url, "auth.url"),
            (&self.client_id, "auth.client_id"),
            (&self.client_secret, "auth.client_secret"),
            (&self.audience, "auth.audience"),
        ]
        .into_iter()
        .filter_map(|(value, field)| value.describe_missing(field))
        .collect()
    }
}

fn default_url() -> SourceValue {
    SourceValue::from_env(ENV_AUTH_URL)
}

fn default_client_id() -> SourceValue {
    SourceValue::from_env(ENV_CLIENT_ID)
}

fn default_client_secret() -> SourceValue {
    SourceValue::from_env(ENV_CLIENT_SECRET)
}

fn default_audience() -> SourceValue {
    SourceValue::from_env(ENV_AUDIENCE)
}
