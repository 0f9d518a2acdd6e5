use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::http_client::{FETCH_TIMEOUT, http_client};

pub const DEFAULT_API_URL: &str = "https://api.football-data.org/v4";
const AUTH_HEADER: &str = "X-Auth-Token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchStatus {
    Scheduled,
    Timed,
    InPlay,
    Paused,
    Finished,
    Postponed,
    Suspended,
    Cancelled,
    Awarded,
    Unknown,
}

impl MatchStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "SCHEDULED" => Self::Scheduled,
            "TIMED" => Self::Timed,
            "IN_PLAY" | "LIVE" => Self::InPlay,
            "PAUSED" => Self::Paused,
            "FINISHED" => Self::Finished,
            "POSTPONED" => Self::Postponed,
            "SUSPENDED" => Self::Suspended,
            "CANCELLED" | "CANCELED" => Self::Cancelled,
            "AWARDED" => Self::Awarded,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "SCHEDULED",
            Self::Timed => "TIMED",
            Self::InPlay => "IN_PLAY",
            Self::Paused => "PAUSED",
            Self::Finished => "FINISHED",
            Self::Postponed => "POSTPONED",
            Self::Suspended => "SUSPENDED",
            Self::Cancelled => "CANCELLED",
            Self::Awarded => "AWARDED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// One match as delivered by the upstream API. Never mutated by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub utc_date: String,
    pub home_team: String,
    pub away_team: String,
    pub competition_name: String,
    pub score_home: Option<u32>,
    pub score_away: Option<u32>,
    pub status: MatchStatus,
}

impl MatchRecord {
    pub fn has_full_score(&self) -> bool {
        self.score_home.is_some() && self.score_away.is_some()
    }
}

/// A windowed competition query: `/competitions/{code}/matches`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchQuery {
    pub league_code: String,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub status: MatchStatus,
}

/// Anything that can answer a competition query. The HTTP client is the
/// production implementation; tests and offline runs plug in their own.
pub trait MatchSource: Send + Sync {
    fn competition_matches(&self, query: &MatchQuery) -> Result<Vec<MatchRecord>>;

    /// Generated data, not results from a live feed.
    fn is_offline(&self) -> bool {
        false
    }
}

/// football-data.org style client over the shared blocking reqwest client.
#[derive(Debug, Clone)]
pub struct FootballDataClient {
    base_url: String,
    api_key: Option<String>,
}

impl FootballDataClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn matches_url(&self, league_code: &str) -> String {
        format!(
            "{}/competitions/{}/matches",
            self.base_url.trim_end_matches('/'),
            league_code.trim()
        )
    }
}

impl MatchSource for FootballDataClient {
    fn competition_matches(&self, query: &MatchQuery) -> Result<Vec<MatchRecord>> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(anyhow::anyhow!("no api key configured"));
        };
        let client = http_client()?;
        let url = self.matches_url(&query.league_code);
        let date_from = query.date_from.format("%Y-%m-%d").to_string();
        let date_to = query.date_to.format("%Y-%m-%d").to_string();

        let resp = client
            .get(&url)
            .query(&[
                ("dateFrom", date_from.as_str()),
                ("dateTo", date_to.as_str()),
                ("status", query.status.as_str()),
            ])
            .header(AUTH_HEADER, key)
            .timeout(FETCH_TIMEOUT)
            .send()
            .context("request failed")?;
        let status = resp.status();
        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow::anyhow!("http {status} for {url}"));
        }
        parse_matches_json(&body)
    }
}

#[derive(Debug, Deserialize)]
struct MatchesResponse {
    #[serde(default)]
    matches: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiMatch {
    #[serde(default)]
    utc_date: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    home_team: Option<ApiTeam>,
    #[serde(default)]
    away_team: Option<ApiTeam>,
    #[serde(default)]
    competition: Option<ApiCompetition>,
    #[serde(default)]
    score: Option<ApiScore>,
}

#[derive(Debug, Deserialize)]
struct ApiTeam {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiCompetition {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiScore {
    #[serde(rename = "fullTime", default)]
    full_time: Option<ApiGoals>,
}

#[derive(Debug, Deserialize)]
struct ApiGoals {
    #[serde(default)]
    home: Option<u32>,
    #[serde(default)]
    away: Option<u32>,
}

/// Decodes a `{matches: [...]}` document. Records whose shape cannot be read
/// are dropped one by one; the rest of the list survives.
pub fn parse_matches_json(raw: &str) -> Result<Vec<MatchRecord>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let resp: MatchesResponse = serde_json::from_str(trimmed).context("invalid matches json")?;
    let items = resp.matches.unwrap_or_default();
    let total = items.len();

    let records: Vec<MatchRecord> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<ApiMatch>(item).ok())
        .map(into_record)
        .collect();

    let dropped = total - records.len();
    if dropped > 0 {
        tracing::debug!(dropped, total, "skipped malformed match records");
    }
    Ok(records)
}

fn into_record(m: ApiMatch) -> MatchRecord {
    let (score_home, score_away) = m
        .score
        .and_then(|s| s.full_time)
        .map(|g| (g.home, g.away))
        .unwrap_or((None, None));

    MatchRecord {
        utc_date: m.utc_date.unwrap_or_default(),
        home_team: team_name(m.home_team),
        away_team: team_name(m.away_team),
        competition_name: m.competition.and_then(|c| c.name).unwrap_or_default(),
        score_home,
        score_away,
        status: m
            .status
            .as_deref()
            .map(MatchStatus::parse)
            .unwrap_or(MatchStatus::Unknown),
    }
}

fn team_name(team: Option<ApiTeam>) -> String {
    team.and_then(|t| t.name).unwrap_or_default()
}
