use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::cache::token::Token;
use crate::config::auth::AuthConfig;
use crate::errors::TokenError;
use crate::helpers::time::now_utc;
use crate::sources::FetchToken;

static GRANT_TYPE: &str = "client_credentials";

/// OAuth2 client-credentials grant against the platform auth endpoint.
#[derive(Debug, Clone)]
pub struct ClientCredentialsSource {
    client: Client,
    auth: AuthConfig,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

impl ClientCredentialsSource {
    pub fn new(client: Client, auth: AuthConfig) -> Self {
        Self { client, auth }
    }
}

impl FetchToken for ClientCredentialsSource {
    async fn fetch_token(&self) -> Result<Token, TokenError> {
        // resolved per fetch so a missing value fails before any request
        let credentials = self.auth.resolve()?;

        let form = [
            ("grant_type", GRANT_TYPE),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("audience", credentials.audience.as_str()),
        ];

        debug!(url = %credentials.url, "requesting access_token");
        let response = self
            .client
            .post(&credentials.url)
            .header(ACCEPT, "application/json")
            .form(&form[..])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TokenError::Status { status, body });
        }
        parse_token_response(&body)
    }
}

fn parse_token_response(body: &str) -> Result<Token, TokenError> {
    let response: TokenResponse = serde_json::from_str(body)
        .map_err(|e| TokenError::MalformedResponse(e.to_string()))?;

    if response.access_token.is_empty() {
        return Err(TokenError::MalformedResponse("empty access_token".to_owned()));
    }
    Ok(Token::expiring_in(response.access_token, response.expires_in, now_utc()))
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::Utc;

    #[test]
    fn parses_access_token_and_expiry() {
        let before = Utc::now();
        let token = parse_token_response(r#"{"access_token":"tok_abc123","expires_in":3600,"token_type":"Bearer"}"#).unwrap();
        assert_eq!(token.value, "tok_abc123");
        assert!(token.expires_at >= before + chrono::Duration::seconds(3600));
        assert!(token.expires_at <= Utc::now() + chrono::Duration::seconds(3600));
    }

    #[test]
    fn missing_fields_are_malformed() {
        let err = parse_token_response(r#"{"access_token":"tok"}"#).unwrap_err();
        assert!(matches!(err, TokenError::MalformedResponse(_)));

        let err = parse_token_response("not json").unwrap_err();
        assert!(matches!(err, TokenError::MalformedResponse(_)));

        let err = parse_token_response(r#"{"access_token":"","expires_in":10}"#).unwrap_err();
        assert!(matches!(err, TokenError::MalformedResponse(_)));
    }
}
