use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::catalog::EntityCatalog;
use crate::fake_source::FakeMatchSource;
use crate::fetcher::{DEFAULT_SIDE_LIMIT, DataFetcher, FetchCache, LEAGUE_FETCH_LIMIT};
use crate::form::DEFAULT_FORM_WINDOW;
use crate::orchestrator::QueryOrchestrator;
use crate::ttl_cache::DEFAULT_TTL_SECS;
use crate::upstream::{DEFAULT_API_URL, FootballDataClient, MatchSource};

const DEFAULT_CATALOG_PATH: &str = "data/catalog.json";
const FAKE_SOURCE_SEED: u64 = 0x5EED_F00D;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    FootballData,
    Fake,
}

impl FromStr for SourceKind {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "football-data" | "footballdata" | "api" => Ok(Self::FootballData),
            "fake" | "offline" => Ok(Self::Fake),
            other => Err(anyhow::anyhow!("unknown UPSTREAM_SOURCE '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub api_key: Option<String>,
    pub catalog_path: PathBuf,
    pub cache_ttl: Duration,
    pub form_window: usize,
    pub side_limit: usize,
    pub source: SourceKind,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            cache_ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            form_window: DEFAULT_FORM_WINDOW,
            side_limit: DEFAULT_SIDE_LIMIT,
            source: SourceKind::FootballData,
        }
    }
}

impl Settings {
    /// Reads `.env.local`, then `.env`, then the process environment.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let source = match get("UPSTREAM_SOURCE") {
            Some(raw) => raw.parse::<SourceKind>()?,
            None => defaults.source,
        };
        let ttl_secs = parse_or(get("CACHE_TTL_SECS"), DEFAULT_TTL_SECS).max(1);

        Ok(Self {
            api_url: get("FOOTBALL_API_URL").unwrap_or(defaults.api_url),
            api_key: get("FOOTBALL_API_KEY").map(|k| k.trim().to_string()),
            catalog_path: get("CATALOG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.catalog_path),
            cache_ttl: Duration::from_secs(ttl_secs),
            form_window: parse_or(get("FORM_WINDOW"), DEFAULT_FORM_WINDOW).clamp(1, 20),
            side_limit: parse_or(get("SNAPSHOT_SIDE_LIMIT"), DEFAULT_SIDE_LIMIT)
                .clamp(1, LEAGUE_FETCH_LIMIT),
            source,
        })
    }

    pub fn build_orchestrator(&self) -> Result<QueryOrchestrator> {
        let catalog = EntityCatalog::load(&self.catalog_path).context("load entity catalog")?;
        if catalog.is_empty() {
            return Err(anyhow::anyhow!(
                "catalog {} lists no teams",
                self.catalog_path.display()
            ));
        }
        Ok(self.build_with_catalog(catalog))
    }

    pub fn build_with_catalog(&self, catalog: EntityCatalog) -> QueryOrchestrator {
        let source: Arc<dyn MatchSource> = match self.source {
            SourceKind::FootballData => {
                if self.api_key.is_none() {
                    tracing::warn!("FOOTBALL_API_KEY is not set; live lookups will report no data");
                }
                Arc::new(FootballDataClient::new(
                    self.api_url.clone(),
                    self.api_key.clone(),
                ))
            }
            SourceKind::Fake => Arc::new(FakeMatchSource::from_catalog(&catalog, FAKE_SOURCE_SEED)),
        };
        let cache = Arc::new(FetchCache::new(self.cache_ttl));
        QueryOrchestrator::new(catalog, DataFetcher::new(source, cache))
            .with_form_window(self.form_window)
            .with_side_limit(self.side_limit)
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}
