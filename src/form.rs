use crate::fetcher::TeamSnapshot;
use crate::team_names::is_same_team;
use crate::upstream::MatchRecord;

pub const DEFAULT_FORM_WINDOW: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormLabel {
    Excellent,
    Good,
    Irregular,
    Poor,
}

impl FormLabel {
    pub fn from_win_percentage(pct: f64) -> Self {
        if pct >= 70.0 {
            Self::Excellent
        } else if pct >= 50.0 {
            Self::Good
        } else if pct >= 30.0 {
            Self::Irregular
        } else {
            Self::Poor
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent form",
            Self::Good => "Good form",
            Self::Irregular => "Irregular form",
            Self::Poor => "Worrying form",
        }
    }
}

/// Recent form of one team. `label` is `None` when nothing could be counted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormSummary {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub counted: u32,
    /// Records in the window that lacked a score or did not involve the team.
    pub skipped: u32,
    pub win_percentage: f64,
    pub avg_goals_for: f64,
    pub avg_goals_against: f64,
    pub label: Option<FormLabel>,
}

impl FormSummary {
    pub fn has_data(&self) -> bool {
        self.counted > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Venue {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

/// A finished match seen from the team's side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamResult {
    pub utc_date: String,
    pub opponent: String,
    pub venue: Venue,
    pub goals_for: u32,
    pub goals_against: u32,
    pub outcome: Outcome,
}

/// An upcoming match seen from the team's side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub utc_date: String,
    pub opponent: String,
    pub venue: Venue,
}

#[derive(Debug, Clone, Copy)]
pub struct StatsAggregator {
    window: usize,
}

impl Default for StatsAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_FORM_WINDOW)
    }
}

impl StatsAggregator {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn summarize(&self, snapshot: &TeamSnapshot) -> FormSummary {
        let mut out = FormSummary::default();
        let mut goals_for = 0u32;
        let mut goals_against = 0u32;

        for m in self.window_of(&snapshot.recent) {
            let Some(result) = team_result(snapshot.team_name(), m) else {
                out.skipped += 1;
                continue;
            };
            goals_for += result.goals_for;
            goals_against += result.goals_against;
            match result.outcome {
                Outcome::Win => out.wins += 1,
                Outcome::Draw => out.draws += 1,
                Outcome::Loss => out.losses += 1,
            }
            out.counted += 1;
        }

        if out.counted == 0 {
            return out;
        }
        let n = out.counted as f64;
        out.win_percentage = round1(100.0 * out.wins as f64 / n);
        out.avg_goals_for = round1(goals_for as f64 / n);
        out.avg_goals_against = round1(goals_against as f64 / n);
        out.label = Some(FormLabel::from_win_percentage(out.win_percentage));
        out
    }

    /// The counted results of the form window, oldest first.
    pub fn team_results(&self, snapshot: &TeamSnapshot) -> Vec<TeamResult> {
        self.window_of(&snapshot.recent)
            .iter()
            .filter_map(|m| team_result(snapshot.team_name(), m))
            .collect()
    }

    fn window_of<'a>(&self, recent: &'a [MatchRecord]) -> &'a [MatchRecord] {
        let start = recent.len().saturating_sub(self.window);
        &recent[start..]
    }
}

pub fn fixtures(snapshot: &TeamSnapshot) -> Vec<Fixture> {
    snapshot
        .upcoming
        .iter()
        .map(|m| {
            let venue = team_venue(snapshot.team_name(), m).unwrap_or(Venue::Away);
            Fixture {
                utc_date: m.utc_date.clone(),
                opponent: opponent(m, venue).to_string(),
                venue,
            }
        })
        .collect()
}

fn team_venue(team: &str, m: &MatchRecord) -> Option<Venue> {
    if is_same_team(team, &m.home_team) {
        Some(Venue::Home)
    } else if is_same_team(team, &m.away_team) {
        Some(Venue::Away)
    } else {
        None
    }
}

fn opponent(m: &MatchRecord, venue: Venue) -> &str {
    match venue {
        Venue::Home => &m.away_team,
        Venue::Away => &m.home_team,
    }
}

fn team_result(team: &str, m: &MatchRecord) -> Option<TeamResult> {
    let venue = team_venue(team, m)?;
    let (home, away) = (m.score_home?, m.score_away?);
    let (goals_for, goals_against) = match venue {
        Venue::Home => (home, away),
        Venue::Away => (away, home),
    };
    let outcome = if goals_for > goals_against {
        Outcome::Win
    } else if goals_for < goals_against {
        Outcome::Loss
    } else {
        Outcome::Draw
    };
    Some(TeamResult {
        utc_date: m.utc_date.clone(),
        opponent: opponent(m, venue).to_string(),
        venue,
        goals_for,
        goals_against,
        outcome,
    })
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
