mod support;

use std::sync::Arc;
use std::time::Duration;

use matchday_desk::form::FormLabel;
use matchday_desk::orchestrator::{Answer, QueryOrchestrator};
use matchday_desk::report::render_answer;

use support::{StubSource, bundled_catalog, fetcher_with, finished, liga_catalog, scheduled};

const TTL: Duration = Duration::from_secs(1800);

fn barcelona_source() -> StubSource {
    StubSource::new(
        vec![
            scheduled(3, "FC Barcelona", "Sevilla FC"),
            scheduled(5, "Real Madrid CF", "Girona FC"),
            scheduled(10, "Valencia CF", "FC Barcelona"),
        ],
        vec![
            finished(20, "FC Barcelona", "Getafe CF", (2, 0)),
            finished(17, "Real Betis", "FC Barcelona", (1, 3)),
            finished(15, "Real Madrid CF", "Sevilla FC", (1, 1)),
            finished(14, "FC Barcelona", "Girona FC", (1, 1)),
            finished(10, "Athletic Club", "FC Barcelona", (2, 0)),
            finished(7, "FC Barcelona", "Valencia CF", (4, 2)),
            finished(3, "Villarreal CF", "FC Barcelona", (0, 1)),
        ],
    )
}

#[test]
fn barcelona_query_end_to_end() {
    let source = Arc::new(barcelona_source());
    let orchestrator = QueryOrchestrator::new(liga_catalog(), fetcher_with(source, TTL));

    let Answer::Report(report) = orchestrator.answer("Barcelona próximos partidos") else {
        panic!("expected a report");
    };
    assert_eq!(report.entity.entity.canonical_name, "Barcelona");
    assert_eq!(report.snapshot.upcoming.len(), 2);
    assert_eq!(report.snapshot.recent.len(), 6);
    assert_eq!(report.summary.wins, 4);
    assert_eq!(report.summary.draws, 1);
    assert_eq!(report.summary.losses, 1);
    assert!((report.summary.win_percentage - 66.7).abs() < 1e-9);
    assert_eq!(report.summary.label, Some(FormLabel::Good));
    assert_eq!(report.summary.skipped, 0);
    assert_eq!(report.results.len(), 6);
    assert_eq!(report.fixtures.len(), 2);
    assert!(!report.offline);
}

#[test]
fn unknown_text_is_not_detected_and_never_hits_upstream() {
    let source = Arc::new(barcelona_source());
    let orchestrator = QueryOrchestrator::new(liga_catalog(), fetcher_with(Arc::clone(&source), TTL));
    assert_eq!(orchestrator.answer("hola"), Answer::NotDetected);
    assert_eq!(source.calls(), 0);
}

#[test]
fn upstream_outage_is_reported_as_no_data() {
    let source = Arc::new(StubSource::failing());
    let orchestrator = QueryOrchestrator::new(liga_catalog(), fetcher_with(Arc::clone(&source), TTL));

    let answer = orchestrator.answer("¿cómo llega el Real Madrid?");
    let Answer::NoData { entity } = &answer else {
        panic!("expected NoData, got {answer:?}");
    };
    assert_eq!(entity.entity.canonical_name, "Real Madrid");
    // The empty snapshot itself is remembered for the TTL.
    assert_eq!(orchestrator.cached_entries(), 1);
    orchestrator.answer("real madrid");
    assert_eq!(source.calls(), 2);
}

#[test]
fn narrower_form_window_changes_the_summary() {
    let source = Arc::new(barcelona_source());
    let orchestrator =
        QueryOrchestrator::new(liga_catalog(), fetcher_with(source, TTL)).with_form_window(2);
    let Answer::Report(report) = orchestrator.answer("fc barcelona") else {
        panic!("expected a report");
    };
    assert_eq!(report.summary.counted, 2);
    assert_eq!(report.summary.wins, 2);
    // Listed results come from the same window as the stats.
    assert_eq!(report.results.len(), 2);
    assert_eq!(report.results[1].opponent, "Villarreal CF");
    assert_eq!(report.summary.label, Some(FormLabel::Excellent));
}

#[test]
fn rendered_report_lists_fixtures_results_and_form() {
    let source = Arc::new(barcelona_source());
    let catalog = liga_catalog();
    let orchestrator = QueryOrchestrator::new(catalog.clone(), fetcher_with(source, TTL));
    let answer = orchestrator.answer("barça");

    let text = render_answer(&answer, &catalog);
    assert!(text.starts_with("FC Barcelona\nLeague: La Liga\n"));
    assert!(text.contains("(H) vs Sevilla FC"));
    assert!(text.contains("(A) vs Valencia CF"));
    assert!(text.contains("W (A) vs Villarreal CF 1-0"));
    assert!(text.contains("- Form: 4W-1D-1L (66.7% wins)"));
    assert!(text.contains("- Status: Good form"));
}

#[test]
fn manchester_city_report_ignores_united_matches() {
    let source = Arc::new(StubSource::new(
        vec![scheduled(4, "Manchester United FC", "Arsenal FC")],
        vec![
            finished(9, "Manchester United FC", "Liverpool FC", (0, 2)),
            finished(6, "Manchester City FC", "Arsenal FC", (3, 1)),
            finished(2, "Arsenal FC", "Manchester United FC", (2, 0)),
        ],
    ));
    let orchestrator = QueryOrchestrator::new(bundled_catalog(), fetcher_with(source, TTL));

    let Answer::Report(report) = orchestrator.answer("how is manchester city doing") else {
        panic!("expected a report");
    };
    assert_eq!(report.entity.entity.canonical_name, "Manchester City");
    assert!(report.snapshot.upcoming.is_empty());
    assert_eq!(report.snapshot.recent.len(), 1);
    assert_eq!((report.summary.wins, report.summary.losses), (1, 0));
}

#[test]
fn league_question_lists_latest_and_next_matches() {
    let source = Arc::new(barcelona_source());
    let catalog = liga_catalog();
    let orchestrator = QueryOrchestrator::new(catalog.clone(), fetcher_with(Arc::clone(&source), TTL));

    let answer = orchestrator.answer("¿cómo va la liga?");
    let Answer::League(report) = &answer else {
        panic!("expected a league overview, got {answer:?}");
    };
    assert_eq!(report.league.league.code, "PD");
    assert_eq!(report.recent.len(), 5);
    assert_eq!(report.recent[4].home_team, "Villarreal CF");
    assert_eq!(report.upcoming.len(), 3);
    assert_eq!(source.calls(), 2);
    assert_eq!(answer.entity(), None);

    let text = render_answer(&answer, &catalog);
    assert!(text.starts_with("La Liga\n"));
    assert!(text.contains("Villarreal CF 0-1 FC Barcelona"));
    assert!(text.contains("| Primera Division"));
}

#[test]
fn league_question_during_outage_renders_empty_lists() {
    let source = Arc::new(StubSource::failing());
    let catalog = bundled_catalog();
    let orchestrator = QueryOrchestrator::new(catalog.clone(), fetcher_with(source, TTL));

    let answer = orchestrator.answer("premier league table");
    let Answer::League(report) = &answer else {
        panic!("expected a league overview, got {answer:?}");
    };
    assert_eq!(report.league.league.code, "PL");
    assert!(report.is_empty());
    let text = render_answer(&answer, &catalog);
    assert!(text.contains("Recent matches: none found."));
    assert!(text.contains("Upcoming matches: none found."));
}
