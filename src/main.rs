use anyhow::Result;
use tracing_subscriber::EnvFilter;

use matchday_desk::config::Settings;
use matchday_desk::report::render_answer;

fn main() -> Result<()> {
    let settings = Settings::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let query = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if query.trim().is_empty() {
        eprintln!("usage: matchday_desk <question about a team or league>");
        std::process::exit(2);
    }

    let orchestrator = settings.build_orchestrator()?;
    tracing::info!(
        teams = orchestrator.catalog().len(),
        leagues = orchestrator.catalog().league_count(),
        source = ?settings.source,
        "query desk ready"
    );

    let answer = orchestrator.answer(&query);
    println!("{}", render_answer(&answer, orchestrator.catalog()));
    tracing::debug!(cached = orchestrator.cached_entries(), "done");
    Ok(())
}
