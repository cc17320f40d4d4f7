// file: src/pipeline/filter.rs
// description: recency window filtering of fetched records

use crate::models::CandidateRecord;
use chrono::{DateTime, Duration, Utc};

pub fn recency_cutoff(now: DateTime<Utc>, days_back: u32) -> DateTime<Utc> {
    now - Duration::days(i64::from(days_back))
}

/// Keeps records published at or after `cutoff`, preserving feed order.
/// Returns the survivors and the number removed.
pub fn filter_recent(
    records: Vec<CandidateRecord>,
    cutoff: DateTime<Utc>,
) -> (Vec<CandidateRecord>, usize) {
    let before = records.len();
    let kept: Vec<CandidateRecord> = records
        .into_iter()
        .filter(|record| record.published >= cutoff)
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}
