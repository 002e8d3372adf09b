//! Shared constants and invariants

pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

pub const ENV_STAGE: &str = "STAGE";

/// Characters of a token that may appear in logs.
pub const TOKEN_LOG_PREFIX_LEN: usize = 10;
