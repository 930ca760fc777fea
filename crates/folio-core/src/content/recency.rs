//! Recency guard for scheduled generation.

use chrono::{DateTime, Utc};

use crate::domain::Post;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Fractional days between `latest.created_at` and `now`.
pub fn days_since(latest: &Post, now: DateTime<Utc>) -> f64 {
    (now - latest.created_at).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Skip when the newest post is strictly younger than `threshold_days`.
pub fn should_skip_generation(
    latest: Option<&Post>,
    now: DateTime<Utc>,
    threshold_days: f64,
) -> bool {
    match latest {
        None => false,
        Some(post) => days_since(post, now) < threshold_days,
    }
}
