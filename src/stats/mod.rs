//! Repository statistics consumed by the handler.
//!
//! `RepositoryStats` is the seam to whatever computes the metrics;
//! `GithubStats` is the implementation used by the binary.

use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::errors::StatsError;

pub mod github;
pub mod score;

pub use github::GithubStats;

/// Named metrics of one repository. Absent fields default to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreData {
    pub language: String,
    pub created_since: u64,
    pub updated_since: u64,
    pub contributor_count: u64,
    pub org_count: u64,
    pub commit_frequency: f64,
    pub recent_releases_count: u64,
    pub updated_issues_count: u64,
    pub closed_issues_count: u64,
    pub comment_frequency: f64,
    pub dependents_count: u64,
    pub criticality_score: f64,
}

pub trait RepositoryStats {
    /// `repository` is an identifier such as `github.com/owner/name`;
    /// `auth_token` is the caller-supplied token for the provider.
    fn repository_stats(
        &self,
        repository: &str,
        auth_token: &str,
    ) -> impl Future<Output = Result<ScoreData, StatsError>> + Send;
}

#[cfg(test)]
mod test {
    use super::ScoreData;

    #[test]
    fn missing_metrics_default_to_zero() {
        let data: ScoreData = serde_json::from_str(r#"{"language":"Go","contributor_count":12}"#).unwrap();
        assert_eq!(data.language, "Go");
        assert_eq!(data.contributor_count, 12);
        assert_eq!(data.org_count, 0);
        assert_eq!(data.criticality_score, 0.0);
    }
}
