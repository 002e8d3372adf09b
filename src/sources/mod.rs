//! Sources module
//!
//! Token sources the `TokenManager` can refresh from.

use std::future::Future;

use crate::cache::token::Token;
use crate::errors::TokenError;

pub mod oauth2;

pub use oauth2::ClientCredentialsSource;

/// One authentication round-trip producing a fresh token.
pub trait FetchToken {
    fn fetch_token(&self) -> impl Future<Output = Result<Token, TokenError>> + Send;
}
