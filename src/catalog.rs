use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

/// A team known to the system. Loaded once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRecord {
    pub canonical_name: String,
    pub aliases: Vec<String>,
    /// Name the upstream API is expected to use; defaults to the canonical name.
    pub official_name: String,
    pub league_code: String,
}

impl EntityRecord {
    pub fn new<I, S>(canonical_name: &str, aliases: I, league_code: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for alias in aliases {
            let alias = alias.into().trim().to_string();
            if !alias.is_empty() && !unique.iter().any(|a| a.eq_ignore_ascii_case(&alias)) {
                unique.push(alias);
            }
        }
        Self {
            canonical_name: canonical_name.trim().to_string(),
            aliases: unique,
            official_name: canonical_name.trim().to_string(),
            league_code: league_code.trim().to_string(),
        }
    }

    pub fn with_official_name(mut self, official_name: &str) -> Self {
        let trimmed = official_name.trim();
        if !trimmed.is_empty() {
            self.official_name = trimmed.to_string();
        }
        self
    }

    /// Canonical name followed by the aliases, lower-cased.
    pub fn candidate_names(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(self.canonical_name.as_str())
            .chain(self.aliases.iter().map(String::as_str))
            .map(str::to_lowercase)
    }
}

/// A competition the upstream API knows by `code`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueRecord {
    pub code: String,
    /// Free-form context, e.g. "La Liga, Spanish first division".
    pub description: String,
    /// Extra names users call the league by, besides its display name.
    pub aliases: Vec<String>,
}

impl LeagueRecord {
    fn new(code: &str, description: &str) -> Self {
        Self {
            code: code.trim().to_string(),
            description: description.trim().to_string(),
            aliases: Vec::new(),
        }
    }

    /// Display name: the description up to its first comma, else the code.
    pub fn name(&self) -> &str {
        let head = self.description.split(',').next().unwrap_or_default().trim();
        if head.is_empty() { &self.code } else { head }
    }

    /// Display name followed by the aliases, lower-cased. Bare codes are left
    /// out: two letters match inside too many ordinary words.
    pub fn candidate_names(&self) -> impl Iterator<Item = String> + '_ {
        let name = (self.name() != self.code).then(|| self.name());
        name.into_iter()
            .chain(self.aliases.iter().map(String::as_str))
            .map(str::to_lowercase)
    }

    fn push_alias(&mut self, alias: &str) {
        let alias = alias.trim();
        if alias.is_empty()
            || alias.eq_ignore_ascii_case(self.name())
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(alias))
        {
            return;
        }
        self.aliases.push(alias.to_string());
    }
}

#[derive(Debug, Clone, Default)]
pub struct EntityCatalog {
    entries: Vec<EntityRecord>,
    leagues: Vec<LeagueRecord>,
}

impl EntityCatalog {
    pub fn new(entries: Vec<EntityRecord>) -> Self {
        Self {
            entries,
            leagues: Vec::new(),
        }
    }

    /// Adds a league, or replaces the description of a known one.
    pub fn with_league(mut self, code: &str, description: &str) -> Self {
        match self.league_mut(code) {
            Some(league) => league.description = description.trim().to_string(),
            None => self.leagues.push(LeagueRecord::new(code, description)),
        }
        self
    }

    pub fn with_league_alias(mut self, alias: &str, code: &str) -> Self {
        self.add_league_alias(alias, code);
        self
    }

    fn add_league_alias(&mut self, alias: &str, code: &str) {
        if self.league_mut(code).is_none() {
            self.leagues.push(LeagueRecord::new(code, alias));
        }
        if let Some(league) = self.league_mut(code) {
            league.push_alias(alias);
        }
    }

    fn league_mut(&mut self, code: &str) -> Option<&mut LeagueRecord> {
        let code = code.trim();
        self.leagues.iter_mut().find(|l| l.code == code)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read catalog {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("decode catalog {}", path.display()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let doc: CatalogDocument = serde_json::from_str(raw).context("invalid catalog json")?;
        let mut entries = Vec::with_capacity(doc.equipos_ligas.len());
        for (canonical, value) in doc.equipos_ligas {
            let raw_entry: RawEntry = serde_json::from_value(value)
                .with_context(|| format!("catalog entry '{canonical}'"))?;
            if raw_entry.liga.trim().is_empty() {
                return Err(anyhow::anyhow!("catalog entry '{canonical}' has an empty liga"));
            }
            let aliases = raw_entry.alias.map(AliasField::into_vec).unwrap_or_default();
            let mut record = EntityRecord::new(&canonical, aliases, &raw_entry.liga);
            if let Some(official) = raw_entry.nombre_oficial.as_deref() {
                record = record.with_official_name(official);
            }
            entries.push(record);
        }

        let mut catalog = Self::new(entries);
        for (code, value) in doc.league_context {
            let description = value
                .as_str()
                .with_context(|| format!("league_context '{code}' is not a string"))?;
            catalog = catalog.with_league(&code, description);
        }
        for (alias, value) in doc.leagues {
            let code = value
                .as_str()
                .with_context(|| format!("league alias '{alias}' has no code"))?;
            catalog.add_league_alias(&alias, code);
        }
        Ok(catalog)
    }

    /// Exact, case-insensitive lookup on the canonical name.
    pub fn lookup(&self, name: &str) -> Option<&EntityRecord> {
        let wanted = name.trim().to_lowercase();
        self.entries
            .iter()
            .find(|e| e.canonical_name.to_lowercase() == wanted)
    }

    /// Entries in configuration order.
    pub fn entries(&self) -> &[EntityRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn league_count(&self) -> usize {
        self.leagues.len()
    }

    /// Leagues in configuration order.
    pub fn leagues(&self) -> &[LeagueRecord] {
        &self.leagues
    }

    pub fn league(&self, code: &str) -> Option<&LeagueRecord> {
        let code = code.trim();
        self.leagues.iter().find(|l| l.code == code)
    }

    /// Short display name of a league: the description up to its first comma.
    pub fn league_name(&self, code: &str) -> Option<&str> {
        let league = self.league(code)?;
        let name = league.name();
        if name == league.code { None } else { Some(name) }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    equipos_ligas: Map<String, Value>,
    #[serde(default)]
    league_context: Map<String, Value>,
    /// User-facing league name to league code.
    #[serde(default)]
    leagues: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    alias: Option<AliasField>,
    liga: String,
    #[serde(default)]
    nombre_oficial: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AliasField {
    One(String),
    Many(Vec<String>),
}

impl AliasField {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(alias) => vec![alias],
            Self::Many(aliases) => aliases,
        }
    }
}
