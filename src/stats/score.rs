//! Criticality score: a weighted sum of log-scaled signals.

use crate::stats::ScoreData;

/// (weight, threshold) of each signal.
pub const CREATED_SINCE: (f64, f64) = (1.0, 120.0);
pub const UPDATED_SINCE: (f64, f64) = (-1.0, 120.0);
pub const CONTRIBUTOR_COUNT: (f64, f64) = (2.0, 5000.0);
pub const ORG_COUNT: (f64, f64) = (1.0, 10.0);
pub const COMMIT_FREQUENCY: (f64, f64) = (1.0, 1000.0);
pub const RECENT_RELEASES_COUNT: (f64, f64) = (0.5, 26.0);
pub const CLOSED_ISSUES_COUNT: (f64, f64) = (0.5, 5000.0);
pub const UPDATED_ISSUES_COUNT: (f64, f64) = (0.5, 5000.0);
pub const COMMENT_FREQUENCY: (f64, f64) = (1.0, 15.0);
pub const DEPENDENTS_COUNT: (f64, f64) = (2.0, 500000.0);

/// `log(1 + value) / log(1 + max(value, threshold))`, in `[0, 1]`.
pub fn param_score(value: f64, threshold: f64) -> f64 {
    let value = value.max(0.0);
    (1.0 + value).ln() / (1.0 + value.max(threshold)).ln()
}

pub fn criticality_score(data: &ScoreData) -> f64 {
    let signals = [
        (data.created_since as f64, CREATED_SINCE),
        (data.updated_since as f64, UPDATED_SINCE),
        (data.contributor_count as f64, CONTRIBUTOR_COUNT),
        (data.org_count as f64, ORG_COUNT),
        (data.commit_frequency, COMMIT_FREQUENCY),
        (data.recent_releases_count as f64, RECENT_RELEASES_COUNT),
        (data.closed_issues_count as f64, CLOSED_ISSUES_COUNT),
        (data.updated_issues_count as f64, UPDATED_ISSUES_COUNT),
        (data.comment_frequency, COMMENT_FREQUENCY),
        (data.dependents_count as f64, DEPENDENTS_COUNT),
    ];

    let total_weight: f64 = signals.iter().map(|(_, (weight, _))| weight).sum();
    let weighted: f64 = signals
        .iter()
        .map(|(value, (weight, threshold))| weight * param_score(*value, *threshold))
        .sum();

    round(weighted / total_weight, 5)
}

pub fn round(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_repository_scores_zero() {
        assert_eq!(criticality_score(&ScoreData::default()), 0.0);
    }

    #[test]
    fn signal_at_threshold_contributes_its_full_weight() {
        let data = ScoreData { created_since: 120, ..Default::default() };
        // 1 / (1 - 1 + 2 + 1 + 1 + 0.5 + 0.5 + 0.5 + 1 + 2)
        assert_eq!(criticality_score(&data), 0.11765);
    }

    #[test]
    fn values_above_threshold_saturate() {
        assert_eq!(param_score(10.0, 10.0), 1.0);
        assert_eq!(param_score(1000.0, 10.0), 1.0);
        assert!(param_score(5.0, 10.0) < 1.0);
    }

    #[test]
    fn stale_repositories_score_lower() {
        let fresh = ScoreData { created_since: 60, contributor_count: 40, ..Default::default() };
        let stale = ScoreData { updated_since: 36, ..fresh.clone() };
        assert!(criticality_score(&stale) < criticality_score(&fresh));
    }

    #[test]
    fn rounds_to_five_digits() {
        assert_eq!(round(0.123456789, 5), 0.12346);
    }
}
