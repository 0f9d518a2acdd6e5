use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::upstream::MatchRecord;

/// Oldest accepted match, in whole days before now.
pub const MAX_DAYS_PAST: i64 = 30;
/// Furthest accepted match, in whole days after now.
pub const MAX_DAYS_AHEAD: i64 = 365;

const SECS_PER_DAY: i64 = 86_400;

pub fn is_valid(utc_date: &str) -> bool {
    is_valid_at(utc_date, Utc::now())
}

/// A match is reportable when its kickoff lies within
/// `[-MAX_DAYS_PAST, MAX_DAYS_AHEAD]` whole days of `now`. Days are floored, so
/// a kickoff one hour ago is already day -1.
pub fn is_valid_at(utc_date: &str, now: DateTime<Utc>) -> bool {
    let Some(kickoff) = parse_utc_date(utc_date) else {
        return false;
    };
    let days = (kickoff - now).num_seconds().div_euclid(SECS_PER_DAY);
    (-MAX_DAYS_PAST..=MAX_DAYS_AHEAD).contains(&days)
}

pub fn filter_valid(records: Vec<MatchRecord>) -> Vec<MatchRecord> {
    filter_valid_at(records, Utc::now())
}

pub fn filter_valid_at(records: Vec<MatchRecord>, now: DateTime<Utc>) -> Vec<MatchRecord> {
    records
        .into_iter()
        .filter(|m| is_valid_at(&m.utc_date, now))
        .collect()
}

/// Accepts RFC 3339 (`2024-05-01T19:00:00Z`, offsets too), a naive timestamp
/// taken as UTC, or a bare date at midnight UTC.
pub fn parse_utc_date(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
