use chrono::{DateTime, Duration, Utc};

use crate::utils::constants::TOKEN_LOG_PREFIX_LEN;

/// Bearer token together with the instant it stops being valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl Token {
    pub fn new(value: String, expires_at: DateTime<Utc>) -> Self {
        Self { value, expires_at }
    }

    pub fn expiring_in(value: String, expires_in_seconds: u64, now: DateTime<Utc>) -> Self {
        let ttl = to_duration(expires_in_seconds);
        let expires_at = now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self::new(value, expires_at)
    }

    /// Valid while `now + safety_margin < expires_at`.
    pub fn is_valid_at(&self, now: DateTime<Utc>, safety_margin_seconds: u64) -> bool {
        match now.checked_add_signed(to_duration(safety_margin_seconds)) {
            Some(deadline) => deadline < self.expires_at,
            None => false,
        }
    }

    pub fn preview(&self) -> String {
        preview(&self.value)
    }
}

fn to_duration(seconds: u64) -> Duration {
    i64::try_from(seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX)
}

/// First few characters of a secret, safe for logs.
pub fn preview(secret: &str) -> String {
    let head: String = secret.chars().take(TOKEN_LOG_PREFIX_LEN).collect();
    format!("{}...", head)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn validity_uses_strict_comparison() {
        let now = Utc::now();
        let token = Token::expiring_in("tok".into(), 60, now);
        assert!(token.is_valid_at(now, 0));
        assert!(token.is_valid_at(now + Duration::seconds(59), 0));
        assert!(!token.is_valid_at(now + Duration::seconds(60), 0));
        assert!(!token.is_valid_at(now + Duration::seconds(61), 0));
    }

    #[test]
    fn safety_margin_shortens_validity() {
        let now = Utc::now();
        let token = Token::expiring_in("tok".into(), 60, now);
        assert!(token.is_valid_at(now, 30));
        assert!(!token.is_valid_at(now + Duration::seconds(30), 30));
    }

    #[test]
    fn zero_ttl_is_immediately_expired() {
        let now = Utc::now();
        let token = Token::expiring_in("tok".into(), 0, now);
        assert!(!token.is_valid_at(now, 0));
    }

    #[test]
    fn preview_truncates_long_tokens() {
        assert_eq!(preview("tok_abc123456789"), "tok_abc123...");
        assert_eq!(preview("short"), "short...");
    }
}
