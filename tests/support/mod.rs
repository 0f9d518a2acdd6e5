#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use chrono::{Duration as ChronoDuration, SecondsFormat, Utc};

use matchday_desk::catalog::{EntityCatalog, EntityRecord};
use matchday_desk::fetcher::{DataFetcher, FetchCache};
use matchday_desk::upstream::{MatchQuery, MatchRecord, MatchSource, MatchStatus};

/// Upstream double that serves canned lists and counts every call.
#[derive(Default)]
pub struct StubSource {
    pub scheduled: Vec<MatchRecord>,
    pub finished: Vec<MatchRecord>,
    pub fail: bool,
    calls: AtomicUsize,
}

impl StubSource {
    pub fn new(scheduled: Vec<MatchRecord>, finished: Vec<MatchRecord>) -> Self {
        Self {
            scheduled,
            finished,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MatchSource for StubSource {
    fn competition_matches(&self, query: &MatchQuery) -> Result<Vec<MatchRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(anyhow::anyhow!("http 503 Service Unavailable"));
        }
        Ok(match query.status {
            MatchStatus::Scheduled => self.scheduled.clone(),
            MatchStatus::Finished => self.finished.clone(),
            _ => Vec::new(),
        })
    }
}

pub fn days_from_now(days: i64) -> String {
    (Utc::now() + ChronoDuration::days(days)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn scheduled(days: i64, home: &str, away: &str) -> MatchRecord {
    MatchRecord {
        utc_date: days_from_now(days),
        home_team: home.to_string(),
        away_team: away.to_string(),
        competition_name: "Primera Division".to_string(),
        score_home: None,
        score_away: None,
        status: MatchStatus::Scheduled,
    }
}

/// A scheduled match at a fixed kickoff, for tests that drive their own clock.
pub fn scheduled_on(utc_date: &str, home: &str, away: &str) -> MatchRecord {
    MatchRecord {
        utc_date: utc_date.to_string(),
        ..scheduled(0, home, away)
    }
}

pub fn finished(days_ago: i64, home: &str, away: &str, score: (u32, u32)) -> MatchRecord {
    MatchRecord {
        utc_date: days_from_now(-days_ago),
        home_team: home.to_string(),
        away_team: away.to_string(),
        competition_name: "Primera Division".to_string(),
        score_home: Some(score.0),
        score_away: Some(score.1),
        status: MatchStatus::Finished,
    }
}

pub fn liga_catalog() -> EntityCatalog {
    EntityCatalog::new(vec![
        EntityRecord::new("Real Madrid", ["Real Madrid CF", "Madrid"], "PD")
            .with_official_name("Real Madrid CF"),
        EntityRecord::new("Barcelona", ["Barça", "FC Barcelona"], "PD")
            .with_official_name("FC Barcelona"),
    ])
    .with_league("PD", "La Liga, Spanish first division")
}

/// The catalog shipped in `data/catalog.json`.
pub fn bundled_catalog() -> EntityCatalog {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("data");
    path.push("catalog.json");
    let raw = fs::read_to_string(path).expect("bundled catalog readable");
    EntityCatalog::from_json_str(&raw).expect("bundled catalog valid")
}

pub fn fetcher_with(source: Arc<StubSource>, ttl: Duration) -> DataFetcher {
    DataFetcher::new(source, Arc::new(FetchCache::new(ttl)))
}
