use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::cache::token::Token;
use crate::errors::TokenError;
use crate::helpers::time::{get_instant, now_utc};
use crate::observability::metrics::get_metrics;
use crate::sources::{ClientCredentialsSource, FetchToken};

/// Single cached bearer token, refreshed from `source` once it expires.
///
/// The slot lock is held across check, fetch and store, so concurrent
/// callers wait for one refresh instead of racing their own.
#[derive(Debug)]
pub struct TokenManager<S = ClientCredentialsSource> {
    source: S,
    safety_margin_seconds: u64,
    slot: Mutex<Option<Token>>,
}

impl<S: FetchToken> TokenManager<S> {
    pub fn new(source: S, safety_margin_seconds: u64) -> Self {
        Self {
            source,
            safety_margin_seconds,
            slot: Mutex::new(None),
        }
    }

    /// Return the cached token while it is valid, otherwise fetch a new one.
    ///
    /// A failed fetch leaves the slot as it was.
    pub async fn get_access_token(&self) -> Result<Token, TokenError> {
        let metrics = get_metrics().await;
        let mut slot = self.slot.lock().await;

        if let Some(token) = slot
            .as_ref()
            .filter(|token| token.is_valid_at(now_utc(), self.safety_margin_seconds))
        {
            debug!("using cached access_token: {}", token.preview());
            metrics.token_cache_hits.inc();
            return Ok(token.clone());
        }

        let start = get_instant();
        metrics.token_fetch_requests.inc();
        let fetched = self.source.fetch_token().await;
        metrics.token_fetch_duration.observe(start.elapsed().as_secs_f64());

        match fetched {
            Ok(token) => {
                info!(
                    expires_at = %token.expires_at,
                    "successfully obtained new access_token: {}",
                    token.preview()
                );
                *slot = Some(token.clone());
                Ok(token)
            }
            Err(err) => {
                error!("could not get auth token, error: {}", err);
                metrics.token_fetch_failures.with_label_values(&[err.reason()]).inc();
                Err(err)
            }
        }
    }

    /// Drop the cached token; the next `get_access_token` always fetches.
    pub async fn invalidate(&self) {
        let mut slot = self.slot.lock().await;
        if slot.take().is_some() {
            debug!("cached access_token invalidated");
        }
    }

    pub async fn cached(&self) -> Option<Token> {
        self.slot.lock().await.clone()
    }
}
