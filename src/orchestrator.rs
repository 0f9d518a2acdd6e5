use crate::catalog::EntityCatalog;
use crate::fetcher::{DEFAULT_SIDE_LIMIT, DataFetcher, TeamSnapshot};
use crate::form::{self, Fixture, FormSummary, StatsAggregator, TeamResult};
use crate::resolver::{self, ResolvedEntity, ResolvedLeague, Resolution};
use crate::upstream::MatchRecord;

/// Matches listed per side in a league overview.
pub const LEAGUE_REPORT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct TeamReport {
    pub entity: ResolvedEntity,
    pub snapshot: TeamSnapshot,
    pub summary: FormSummary,
    /// The results `summary` was computed from, oldest first.
    pub results: Vec<TeamResult>,
    pub fixtures: Vec<Fixture>,
    /// Built from generated data rather than a live feed.
    pub offline: bool,
}

/// Latest and next matches of a whole competition.
#[derive(Debug, Clone, PartialEq)]
pub struct LeagueReport {
    pub league: ResolvedLeague,
    pub recent: Vec<MatchRecord>,
    pub upcoming: Vec<MatchRecord>,
    pub offline: bool,
}

impl LeagueReport {
    pub fn is_empty(&self) -> bool {
        self.recent.is_empty() && self.upcoming.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// No catalog team or league was mentioned.
    NotDetected,
    /// A team was mentioned but neither upcoming nor recent matches are available.
    NoData { entity: ResolvedEntity },
    Report(TeamReport),
    /// A league was mentioned; either list may be empty.
    League(LeagueReport),
}

impl Answer {
    pub fn is_detected(&self) -> bool {
        !matches!(self, Self::NotDetected)
    }

    pub fn entity(&self) -> Option<&ResolvedEntity> {
        match self {
            Self::NotDetected | Self::League(_) => None,
            Self::NoData { entity } => Some(entity),
            Self::Report(report) => Some(&report.entity),
        }
    }
}

/// Entry point for chat handlers and dashboard widgets: one free-text query in,
/// one answer out. Never fails; upstream trouble shows up as `NoData` or as an
/// empty league overview.
pub struct QueryOrchestrator {
    catalog: EntityCatalog,
    fetcher: DataFetcher,
    aggregator: StatsAggregator,
    side_limit: usize,
}

impl QueryOrchestrator {
    pub fn new(catalog: EntityCatalog, fetcher: DataFetcher) -> Self {
        Self {
            catalog,
            fetcher,
            aggregator: StatsAggregator::default(),
            side_limit: DEFAULT_SIDE_LIMIT,
        }
    }

    pub fn with_form_window(mut self, window: usize) -> Self {
        self.aggregator = StatsAggregator::new(window);
        self
    }

    pub fn with_side_limit(mut self, side_limit: usize) -> Self {
        self.side_limit = side_limit.max(1);
        self
    }

    pub fn catalog(&self) -> &EntityCatalog {
        &self.catalog
    }

    /// Entries held by the shared cache, stale ones included.
    pub fn cached_entries(&self) -> usize {
        self.fetcher.cache().len()
    }

    pub fn answer(&self, free_text: &str) -> Answer {
        match resolver::resolve(&self.catalog, free_text) {
            Resolution::Team(entity) => self.answer_team(entity),
            Resolution::League(league) => Answer::League(self.league_report(league)),
            Resolution::NotDetected => {
                tracing::debug!("no catalog entity in query");
                Answer::NotDetected
            }
        }
    }

    fn answer_team(&self, entity: ResolvedEntity) -> Answer {
        let snapshot = self.fetcher.fetch_team_snapshot(&entity, self.side_limit);
        if snapshot.is_empty() {
            tracing::info!(team = %entity.entity.canonical_name, "no match data for team");
            return Answer::NoData { entity };
        }

        let summary = self.aggregator.summarize(&snapshot);
        if summary.skipped > 0 {
            tracing::debug!(
                team = %entity.entity.canonical_name,
                skipped = summary.skipped,
                "records skipped while summarizing form"
            );
        }
        let results = self.aggregator.team_results(&snapshot);
        let fixtures = form::fixtures(&snapshot);
        Answer::Report(TeamReport {
            entity,
            snapshot,
            summary,
            results,
            fixtures,
            offline: self.fetcher.is_offline(),
        })
    }

    fn league_report(&self, league: ResolvedLeague) -> LeagueReport {
        let code = league.league.code.clone();
        let report = LeagueReport {
            recent: self.fetcher.fetch_recent(&code, LEAGUE_REPORT_LIMIT),
            upcoming: self.fetcher.fetch_upcoming(&code, LEAGUE_REPORT_LIMIT),
            offline: self.fetcher.is_offline(),
            league,
        };
        tracing::info!(
            league = %code,
            recent = report.recent.len(),
            upcoming = report.upcoming.len(),
            "league overview assembled"
        );
        report
    }
}
