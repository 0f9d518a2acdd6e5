use std::collections::HashSet;

/// Tokens that carry no identity on their own ("Real Madrid CF", "Club Brugge").
const GENERIC_TOKENS: [&str; 9] = [
    "fc", "cf", "sc", "ac", "ss", "club", "de", "united", "city",
];

/// Generic tokens that still tell two clubs of one city apart.
const QUALIFIER_TOKENS: [&str; 2] = ["united", "city"];

const MIN_OVERLAP: f64 = 0.6;

pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Whether two team names refer to the same club.
///
/// Equal after normalization, or sharing at least 60% of the distinctive tokens
/// of the shorter name once generic tokens are removed. Names whose qualifiers
/// disagree ("United" against "City") never match.
pub fn is_same_team(a: &str, b: &str) -> bool {
    let a = normalize(a);
    let b = normalize(b);
    if a == b {
        return true;
    }
    if qualifiers_conflict(&a, &b) {
        return false;
    }
    let ta = distinctive_tokens(&a);
    let tb = distinctive_tokens(&b);
    if ta.is_empty() || tb.is_empty() {
        return false;
    }
    let shared = ta.intersection(&tb).count();
    let smaller = ta.len().min(tb.len());
    (shared as f64) / (smaller as f64) >= MIN_OVERLAP
}

fn distinctive_tokens(name: &str) -> HashSet<&str> {
    name.split_whitespace()
        .filter(|t| !GENERIC_TOKENS.contains(t))
        .collect()
}

fn qualifiers_conflict(a: &str, b: &str) -> bool {
    let qa = qualifiers(a);
    let qb = qualifiers(b);
    !qa.is_empty() && !qb.is_empty() && qa.is_disjoint(&qb)
}

fn qualifiers(name: &str) -> HashSet<&str> {
    name.split_whitespace()
        .filter(|t| QUALIFIER_TOKENS.contains(t))
        .collect()
}
