//! # OSSF Scanner Library
//!
//! Computes OSS criticality scores for a repository and forwards them to
//! the security service, authenticating with a cached OAuth2
//! client-credentials token.
//!
//! Modules:
//! - `config`: service configuration, auth credentials and stage endpoints
//! - `cache`: the cached bearer token and its manager
//! - `sources`: OAuth2 client-credentials token source
//! - `stats`: repository stats providers and the criticality score
//! - `sinks`: delivery of scores to the ingestion endpoint
//! - `handler`: event validation and invocation orchestration

pub mod cache;
pub mod config;
pub mod errors;
pub mod handler;
pub mod helpers;
pub mod observability;
pub mod sinks;
pub mod sources;
pub mod stats;
pub mod utils;

#[cfg(test)]
pub mod tests;

pub use crate::cache::token_manager::TokenManager;
pub use crate::config::settings::ServiceConfig;
pub use crate::handler::Handler;
