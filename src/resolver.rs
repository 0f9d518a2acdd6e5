use crate::catalog::{EntityCatalog, EntityRecord, LeagueRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntity {
    pub entity: EntityRecord,
    /// The lower-cased catalog name that was found in the input.
    pub matched_alias_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLeague {
    pub league: LeagueRecord,
    pub matched_alias_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Team(ResolvedEntity),
    League(ResolvedLeague),
    NotDetected,
}

impl Resolution {
    pub fn is_detected(&self) -> bool {
        !matches!(self, Self::NotDetected)
    }

    /// The resolved team, if the text named one.
    pub fn into_entity(self) -> Option<ResolvedEntity> {
        match self {
            Self::Team(entity) => Some(entity),
            Self::League(_) | Self::NotDetected => None,
        }
    }
}

enum Hit<'a> {
    Team(&'a EntityRecord),
    League(&'a LeagueRecord),
}

/// Finds the catalog team or league mentioned in a free-text message by plain
/// substring containment of its names and aliases.
///
/// When several names occur in the text the longest one wins, so "real madrid"
/// beats "madrid"; equal lengths go to teams before leagues, then to the entry
/// listed first in the catalog.
pub fn resolve(catalog: &EntityCatalog, free_text: &str) -> Resolution {
    let text = free_text.trim().to_lowercase();
    if text.is_empty() {
        return Resolution::NotDetected;
    }

    let mut best: Option<(Hit<'_>, String)> = None;
    for entry in catalog.entries() {
        for candidate in entry.candidate_names() {
            if mentions(&text, &candidate, &best) {
                best = Some((Hit::Team(entry), candidate));
            }
        }
    }
    for league in catalog.leagues() {
        for candidate in league.candidate_names() {
            if mentions(&text, &candidate, &best) {
                best = Some((Hit::League(league), candidate));
            }
        }
    }

    match best {
        Some((Hit::Team(entry), matched)) => {
            tracing::debug!(entity = %entry.canonical_name, matched = %matched, "resolved team");
            Resolution::Team(ResolvedEntity {
                entity: entry.clone(),
                matched_alias_text: matched,
            })
        }
        Some((Hit::League(league), matched)) => {
            tracing::debug!(league = %league.code, matched = %matched, "resolved league");
            Resolution::League(ResolvedLeague {
                league: league.clone(),
                matched_alias_text: matched,
            })
        }
        None => Resolution::NotDetected,
    }
}

/// `candidate` occurs in `text` and is strictly longer than the current best.
fn mentions(text: &str, candidate: &str, best: &Option<(Hit<'_>, String)>) -> bool {
    if candidate.is_empty() || !text.contains(candidate) {
        return false;
    }
    best.as_ref()
        .map(|(_, current)| candidate.chars().count() > current.chars().count())
        .unwrap_or(true)
}
