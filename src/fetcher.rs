use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, Utc};

use crate::date_window;
use crate::resolver::ResolvedEntity;
use crate::team_names::is_same_team;
use crate::ttl_cache::TtlCache;
use crate::upstream::{MatchQuery, MatchRecord, MatchSource, MatchStatus};

/// Days looked back for finished matches and ahead for scheduled ones.
pub const QUERY_WINDOW_DAYS: i64 = 60;
/// League-wide list size requested while assembling a team snapshot.
pub const LEAGUE_FETCH_LIMIT: usize = 15;
pub const DEFAULT_SIDE_LIMIT: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Upcoming { league: String, limit: usize },
    Recent { league: String, limit: usize },
    Team { name: String, league: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cached {
    Matches(Vec<MatchRecord>),
    Team(TeamSnapshot),
}

pub type FetchCache = TtlCache<CacheKey, Cached>;

/// Wall clock the date windows and validity checks are measured against.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Upcoming and recent matches of one team, both oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamSnapshot {
    pub entity: ResolvedEntity,
    pub upcoming: Vec<MatchRecord>,
    pub recent: Vec<MatchRecord>,
}

impl TeamSnapshot {
    pub fn is_empty(&self) -> bool {
        self.upcoming.is_empty() && self.recent.is_empty()
    }

    /// The name the team is expected to carry in upstream records.
    pub fn team_name(&self) -> &str {
        &self.entity.entity.official_name
    }
}

pub struct DataFetcher {
    source: Arc<dyn MatchSource>,
    cache: Arc<FetchCache>,
    clock: Clock,
}

impl DataFetcher {
    pub fn new(source: Arc<dyn MatchSource>, cache: Arc<FetchCache>) -> Self {
        Self {
            source,
            cache,
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Whether match data comes from the offline generator rather than a live API.
    pub fn is_offline(&self) -> bool {
        self.source.is_offline()
    }

    pub fn cache(&self) -> &Arc<FetchCache> {
        &self.cache
    }

    pub fn fetch_upcoming(&self, league_code: &str, limit: usize) -> Vec<MatchRecord> {
        let key = CacheKey::Upcoming {
            league: league_code.to_string(),
            limit,
        };
        if let Some(Cached::Matches(hit)) = self.cache.get(&key) {
            // Scheduled lists can age out of the window while cached.
            let still_valid = date_window::filter_valid_at(hit, self.now());
            if !still_valid.is_empty() {
                tracing::debug!(league = league_code, limit, "upcoming served from cache");
                return still_valid;
            }
            tracing::debug!(league = league_code, limit, "cached upcoming list aged out");
        }

        let now = self.now();
        let day = now.date_naive();
        let query = MatchQuery {
            league_code: league_code.to_string(),
            date_from: day,
            date_to: day + ChronoDuration::days(QUERY_WINDOW_DAYS),
            status: MatchStatus::Scheduled,
        };
        let Some(fetched) = self.query_upstream(&query) else {
            return Vec::new();
        };
        let mut matches = date_window::filter_valid_at(fetched, now);
        matches.truncate(limit);
        if !matches.is_empty() {
            self.cache.put(key, Cached::Matches(matches.clone()));
        }
        matches
    }

    pub fn fetch_recent(&self, league_code: &str, limit: usize) -> Vec<MatchRecord> {
        let key = CacheKey::Recent {
            league: league_code.to_string(),
            limit,
        };
        if let Some(Cached::Matches(hit)) = self.cache.get(&key) {
            tracing::debug!(league = league_code, limit, "recent served from cache");
            return hit;
        }

        let now = self.now();
        let day = now.date_naive();
        let query = MatchQuery {
            league_code: league_code.to_string(),
            date_from: day - ChronoDuration::days(QUERY_WINDOW_DAYS),
            date_to: day,
            status: MatchStatus::Finished,
        };
        let Some(fetched) = self.query_upstream(&query) else {
            return Vec::new();
        };
        let valid = date_window::filter_valid_at(fetched, now);
        // Upstream lists oldest first; the tail is the most recent.
        let start = valid.len().saturating_sub(limit);
        let matches = valid[start..].to_vec();
        if !matches.is_empty() {
            self.cache.put(key, Cached::Matches(matches.clone()));
        }
        matches
    }

    /// Upcoming and recent matches involving the resolved team, at most
    /// `side_limit` per side. Cached per team for the cache TTL.
    pub fn fetch_team_snapshot(
        &self,
        resolved: &ResolvedEntity,
        side_limit: usize,
    ) -> TeamSnapshot {
        let entity = &resolved.entity;
        let key = CacheKey::Team {
            name: entity.canonical_name.clone(),
            league: entity.league_code.clone(),
        };
        if let Some(Cached::Team(hit)) = self.cache.get(&key) {
            tracing::debug!(team = %entity.canonical_name, "snapshot served from cache");
            return hit;
        }

        let upcoming = self.fetch_upcoming(&entity.league_code, LEAGUE_FETCH_LIMIT);
        let recent = self.fetch_recent(&entity.league_code, LEAGUE_FETCH_LIMIT);
        let snapshot = TeamSnapshot {
            entity: resolved.clone(),
            upcoming: involving(&entity.official_name, upcoming, side_limit),
            recent: involving(&entity.official_name, recent, side_limit),
        };
        tracing::debug!(
            team = %entity.canonical_name,
            upcoming = snapshot.upcoming.len(),
            recent = snapshot.recent.len(),
            "snapshot assembled"
        );
        self.cache.put(key, Cached::Team(snapshot.clone()));
        snapshot
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    fn query_upstream(&self, query: &MatchQuery) -> Option<Vec<MatchRecord>> {
        match self.source.competition_matches(query) {
            Ok(matches) => Some(matches),
            Err(err) => {
                tracing::warn!(
                    league = %query.league_code,
                    status = query.status.as_str(),
                    error = %format!("{err:#}"),
                    "upstream fetch failed"
                );
                None
            }
        }
    }
}

fn involving(team: &str, matches: Vec<MatchRecord>, side_limit: usize) -> Vec<MatchRecord> {
    let mut out = Vec::new();
    for m in matches {
        if out.len() >= side_limit {
            break;
        }
        if is_same_team(team, &m.home_team) || is_same_team(team, &m.away_team) {
            out.push(m);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::involving;
    use crate::upstream::{MatchRecord, MatchStatus};

    fn fixture(home: &str, away: &str) -> MatchRecord {
        MatchRecord {
            utc_date: "2025-01-01T20:00:00Z".to_string(),
            home_team: home.to_string(),
            away_team: away.to_string(),
            competition_name: "Primera Division".to_string(),
            score_home: None,
            score_away: None,
            status: MatchStatus::Scheduled,
        }
    }

    #[test]
    fn involving_keeps_both_sides_and_stops_at_limit() {
        let matches = vec![
            fixture("FC Barcelona", "Sevilla FC"),
            fixture("Getafe CF", "Valencia CF"),
            fixture("Girona FC", "FC Barcelona"),
            fixture("FC Barcelona", "Real Betis"),
        ];
        let kept = involving("Barcelona", matches.clone(), 8);
        assert_eq!(kept.len(), 3);
        assert_eq!(kept[1].home_team, "Girona FC");

        let capped = involving("Barcelona", matches, 2);
        assert_eq!(capped.len(), 2);
        assert_eq!(capped[1].away_team, "FC Barcelona");
    }
}
