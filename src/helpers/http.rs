use std::time::Duration;

use reqwest::Client;

use crate::config::settings::SettingsConfig;

static USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client for every outbound call of an invocation.
pub fn build_client(settings: &SettingsConfig) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_millis(settings.http_timeout_ms))
        .build()
}
