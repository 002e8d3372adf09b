//! GitHub REST API stats provider
//!
//! Collects the signals of the criticality score for one repository.

use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;
use tracing::{debug, info};

use crate::config::settings::GithubConfig;
use crate::errors::StatsError;
use crate::helpers::time::{days_ago, months_since, now_utc};
use crate::stats::score::{criticality_score, round, CONTRIBUTOR_COUNT};
use crate::stats::{RepositoryStats, ScoreData};

const PER_PAGE: usize = 100;
/// Search results stop at 1000 items.
const MAX_SEARCH_PAGES: u32 = 10;
const TOP_CONTRIBUTOR_COUNT: usize = 15;
const ISSUE_LOOKBACK_DAYS: i64 = 90;
const RELEASE_LOOKBACK_DAYS: i64 = 365;
const COMMIT_ACTIVITY_WEEKS: f64 = 52.0;

#[derive(Debug, Clone)]
pub struct GithubStats {
    client: Client,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct RepoInfo {
    language: Option<String>,
    created_at: DateTime<Utc>,
    pushed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct Contributor {
    login: Option<String>,
}

#[derive(Debug, Deserialize)]
struct User {
    company: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WeeklyCommits {
    total: u64,
}

#[derive(Debug, Deserialize)]
struct Release {
    published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct IssueSearch {
    total_count: u64,
    #[serde(default)]
    items: Vec<IssueItem>,
}

#[derive(Debug, Deserialize)]
struct IssueItem {
    #[serde(default)]
    comments: u64,
}

/// Split `github.com/owner/name` (with or without scheme, `.git` suffix)
/// into owner and name.
pub fn parse_repository(repository: &str) -> Result<(String, String), StatsError> {
    let invalid = || StatsError::InvalidRepository(repository.to_owned());

    let trimmed = repository.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    let path = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    let path = path.strip_prefix("www.").unwrap_or(path);
    let path = path.strip_prefix("github.com/").unwrap_or(path);

    let mut parts = path.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
            Ok((owner.to_owned(), name.to_owned()))
        }
        _ => Err(invalid()),
    }
}

impl GithubStats {
    pub fn new(client: Client, config: &GithubConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_owned(),
        }
    }

    /// GET a JSON document; `None` when GitHub answers 202/204 (stats still
    /// being computed, or nothing to return).
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        auth_token: &str,
    ) -> Result<Option<T>, StatsError> {
        let url = format!("{}{}", self.api_url, path);
        let mut request = self
            .client
            .get(&url)
            .query(query)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if !auth_token.is_empty() {
            request = request.header(AUTHORIZATION, format!("Bearer {}", auth_token));
        }

        let response = request.send().await?;
        match response.status() {
            StatusCode::ACCEPTED | StatusCode::NO_CONTENT => Ok(None),
            status if status.is_success() => Ok(Some(response.json::<T>().await?)),
            status => Err(StatsError::Status { status, url }),
        }
    }

    /// Pages through contributors (anonymous included) until a short page.
    /// Capped at the contributor score threshold.
    async fn contributors(&self, repo_path: &str, auth_token: &str) -> Result<Vec<Contributor>, StatsError> {
        let limit = CONTRIBUTOR_COUNT.1 as usize;
        let mut contributors = Vec::new();
        let mut page = 1u32;
        while contributors.len() < limit {
            let batch: Vec<Contributor> = self
                .get_json(
                    &format!("{}/contributors", repo_path),
                    &[
                        ("anon", "true".to_owned()),
                        ("per_page", PER_PAGE.to_string()),
                        ("page", page.to_string()),
                    ],
                    auth_token,
                )
                .await?
                .unwrap_or_default();
            let last = batch.len() < PER_PAGE;
            contributors.extend(batch);
            if last {
                break;
            }
            page += 1;
        }
        if contributors.len() >= limit {
            debug!("contributor count reached the score threshold of {}", limit);
            contributors.truncate(limit);
        }
        Ok(contributors)
    }

    /// Distinct companies of the top contributors.
    async fn org_count(&self, contributors: &[Contributor], auth_token: &str) -> Result<u64, StatsError> {
        let mut orgs = HashSet::new();
        for login in contributors
            .iter()
            .filter_map(|c| c.login.as_deref())
            .take(TOP_CONTRIBUTOR_COUNT)
        {
            let user: Option<User> = self.get_json(&format!("/users/{}", login), &[], auth_token).await?;
            if let Some(company) = user.and_then(|u| u.company).map(|c| normalize_company(&c)) {
                if !company.is_empty() {
                    orgs.insert(company);
                }
            }
        }
        Ok(orgs.len() as u64)
    }

    async fn commit_frequency(&self, repo_path: &str, auth_token: &str) -> Result<f64, StatsError> {
        let weeks: Vec<WeeklyCommits> = self
            .get_json(&format!("{}/stats/commit_activity", repo_path), &[], auth_token)
            .await?
            .unwrap_or_default();
        let total: u64 = weeks.iter().map(|w| w.total).sum();
        Ok(round(total as f64 / COMMIT_ACTIVITY_WEEKS, 1))
    }

    async fn recent_releases(&self, repo_path: &str, auth_token: &str, now: DateTime<Utc>) -> Result<u64, StatsError> {
        let since = days_ago(now, RELEASE_LOOKBACK_DAYS);
        let releases: Vec<Release> = self
            .get_json(
                &format!("{}/releases", repo_path),
                &[("per_page", PER_PAGE.to_string())],
                auth_token,
            )
            .await?
            .unwrap_or_default();
        Ok(releases
            .iter()
            .filter(|r| r.published_at.is_some_and(|at| at >= since))
            .count() as u64)
    }

    /// Total match count plus the matched items, paged up to the search
    /// API's 1000 item limit.
    async fn search_issues(&self, query: String, auth_token: &str) -> Result<IssueSearch, StatsError> {
        let mut result = IssueSearch { total_count: 0, items: Vec::new() };
        for page in 1..=MAX_SEARCH_PAGES {
            let Some(batch) = self
                .get_json::<IssueSearch>(
                    "/search/issues",
                    &[
                        ("q", query.to_owned()),
                        ("per_page", PER_PAGE.to_string()),
                        ("page", page.to_string()),
                    ],
                    auth_token,
                )
                .await?
            else {
                break;
            };
            result.total_count = batch.total_count;
            let last = batch.items.len() < PER_PAGE;
            result.items.extend(batch.items);
            if last || result.items.len() as u64 >= result.total_count {
                break;
            }
        }
        Ok(result)
    }
}

impl RepositoryStats for GithubStats {
    async fn repository_stats(&self, repository: &str, auth_token: &str) -> Result<ScoreData, StatsError> {
        let (owner, name) = parse_repository(repository)?;
        let full_name = format!("{}/{}", owner, name);
        let repo_path = format!("/repos/{}", full_name);
        let now = now_utc();
        info!("collecting github stats for {}", full_name);

        let info: RepoInfo = self
            .get_json(&repo_path, &[], auth_token)
            .await?
            .ok_or_else(|| StatsError::InvalidRepository(repository.to_owned()))?;

        let contributors = self.contributors(&repo_path, auth_token).await?;
        let org_count = self.org_count(&contributors, auth_token).await?;
        let commit_frequency = self.commit_frequency(&repo_path, auth_token).await?;
        let recent_releases_count = self.recent_releases(&repo_path, auth_token, now).await?;

        let issues_since = days_ago(now, ISSUE_LOOKBACK_DAYS).format("%Y-%m-%d").to_string();
        let updated = self
            .search_issues(format!("repo:{} is:issue updated:>={}", full_name, issues_since), auth_token)
            .await?;
        let closed = self
            .search_issues(format!("repo:{} is:issue closed:>={}", full_name, issues_since), auth_token)
            .await?;

        // averaged over the fetched items; beyond 1000 matches this is a sample
        let comment_frequency = if updated.items.is_empty() {
            0.0
        } else {
            let comments: u64 = updated.items.iter().map(|i| i.comments).sum();
            round(comments as f64 / updated.items.len() as f64, 1)
        };

        let mut data = ScoreData {
            language: info.language.unwrap_or_default(),
            created_since: months_since(info.created_at, now),
            updated_since: info.pushed_at.map(|at| months_since(at, now)).unwrap_or(0),
            contributor_count: contributors.len() as u64,
            org_count,
            commit_frequency,
            recent_releases_count,
            updated_issues_count: updated.total_count,
            closed_issues_count: closed.total_count,
            comment_frequency,
            // not exposed by the REST API
            dependents_count: 0,
            criticality_score: 0.0,
        };
        data.criticality_score = criticality_score(&data);
        debug!(?data, "github stats for {}", full_name);
        Ok(data)
    }
}

fn normalize_company(company: &str) -> String {
    company.trim().trim_start_matches('@').trim().to_lowercase()
}
