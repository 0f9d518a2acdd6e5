use crate::catalog::EntityCatalog;
use crate::date_window::parse_utc_date;
use crate::form::{Outcome, Venue};
use crate::orchestrator::{Answer, LeagueReport, TeamReport};
use crate::upstream::MatchRecord;

const MAX_FIXTURES_SHOWN: usize = 4;
const MAX_LEAGUE_MATCHES_SHOWN: usize = 5;
const NOT_DETECTED_REPLY: &str = "I could not find a known team or league in that message. \
     Try a club or competition name, e.g. \"Real Madrid next matches\".";
const OFFLINE_NOTICE: &str = "[offline sample data, not live results]\n";

/// Plain-text reply for a chat message or a dashboard text panel.
pub fn render_answer(answer: &Answer, catalog: &EntityCatalog) -> String {
    match answer {
        Answer::NotDetected => NOT_DETECTED_REPLY.to_string(),
        Answer::NoData { entity } => format!(
            "No recent information found for {} right now. Try again later.",
            entity.entity.official_name
        ),
        Answer::Report(report) => render_report(report, catalog),
        Answer::League(report) => render_league(report),
    }
}

pub fn render_report(report: &TeamReport, catalog: &EntityCatalog) -> String {
    let entity = &report.entity.entity;
    let league = catalog
        .league_name(&entity.league_code)
        .unwrap_or("Unknown league");

    let mut out = String::new();
    if report.offline {
        out.push_str(OFFLINE_NOTICE);
    }
    out.push_str(&format!("{}\nLeague: {league}\n\n", entity.official_name));

    if report.fixtures.is_empty() {
        out.push_str("Upcoming matches: none scheduled in the coming days.\n\n");
    } else {
        out.push_str("Upcoming matches:\n");
        for (i, f) in report.fixtures.iter().take(MAX_FIXTURES_SHOWN).enumerate() {
            out.push_str(&format!(
                "{}. {} {} vs {}\n",
                i + 1,
                kickoff_label(&f.utc_date),
                venue_marker(f.venue),
                f.opponent
            ));
        }
        out.push('\n');
    }

    if report.results.is_empty() {
        out.push_str("Recent results: none available.\n");
        return out;
    }
    out.push_str("Recent results:\n");
    for r in &report.results {
        out.push_str(&format!(
            "{} {} vs {} {}-{}\n",
            outcome_marker(r.outcome),
            venue_marker(r.venue),
            r.opponent,
            r.goals_for,
            r.goals_against
        ));
    }

    let s = &report.summary;
    if let Some(label) = s.label {
        out.push_str("\nRecent stats:\n");
        out.push_str(&format!(
            "- Form: {}W-{}D-{}L ({:.1}% wins)\n",
            s.wins, s.draws, s.losses, s.win_percentage
        ));
        out.push_str(&format!("- Scored: {:.1} per match\n", s.avg_goals_for));
        out.push_str(&format!("- Conceded: {:.1} per match\n", s.avg_goals_against));
        out.push_str(&format!("- Status: {}\n", label.describe()));
    }
    out
}

/// League overview: latest results with scores, then the next fixtures.
pub fn render_league(report: &LeagueReport) -> String {
    let mut out = String::new();
    if report.offline {
        out.push_str(OFFLINE_NOTICE);
    }
    out.push_str(&format!("{}\n\n", report.league.league.name()));
    push_match_list(&mut out, "Recent matches", &report.recent, true);
    out.push('\n');
    push_match_list(&mut out, "Upcoming matches", &report.upcoming, false);
    out
}

fn push_match_list(out: &mut String, title: &str, matches: &[MatchRecord], with_score: bool) {
    if matches.is_empty() {
        out.push_str(&format!("{title}: none found.\n"));
        return;
    }
    out.push_str(&format!("{title}:\n"));
    for (i, m) in matches.iter().take(MAX_LEAGUE_MATCHES_SHOWN).enumerate() {
        let line = match (with_score, m.score_home, m.score_away) {
            (true, Some(home), Some(away)) => {
                format!("{} {home}-{away} {}", m.home_team, m.away_team)
            }
            _ => format!("{} vs {}", m.home_team, m.away_team),
        };
        out.push_str(&format!("{}. {line}\n", i + 1));
        let when = kickoff_label(&m.utc_date);
        if m.competition_name.is_empty() {
            out.push_str(&format!("   {when}\n"));
        } else {
            out.push_str(&format!("   {when} | {}\n", m.competition_name));
        }
    }
}

fn kickoff_label(utc_date: &str) -> String {
    parse_utc_date(utc_date)
        .map(|dt| dt.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|| "Date TBC".to_string())
}

fn venue_marker(venue: Venue) -> &'static str {
    match venue {
        Venue::Home => "(H)",
        Venue::Away => "(A)",
    }
}

fn outcome_marker(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Win => "W",
        Outcome::Draw => "D",
        Outcome::Loss => "L",
    }
}
