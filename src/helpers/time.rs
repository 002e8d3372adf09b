use chrono::{DateTime, Duration, Utc};
use tokio::time::Instant;

pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

pub fn get_instant() -> Instant {
    Instant::now()
}

/// Whole 30-day months elapsed between `since` and `now`, never negative.
pub fn months_since(since: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let days = (now - since).num_days();
    if days <= 0 {
        0
    } else {
        (days / 30) as u64
    }
}

pub fn days_ago(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::days(days)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn months_since_counts_whole_months() {
        let now = Utc::now();
        assert_eq!(months_since(now - Duration::days(29), now), 0);
        assert_eq!(months_since(now - Duration::days(61), now), 2);
        assert_eq!(months_since(now + Duration::days(10), now), 0);
    }
}
