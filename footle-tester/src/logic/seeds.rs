use anyhow::{Result, bail};
use footle_game::schedule::fnv1a64;
use std::collections::HashSet;

const DEFAULT_SEED: u64 = 1337;

/// A resolved `--seeds` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    /// The word a seed was hashed from, if it was not numeric.
    pub label: Option<String>,
}

impl SeedInfo {
    #[must_use]
    pub const fn from_numeric(seed: u64) -> Self {
        Self { seed, label: None }
    }

    #[must_use]
    pub fn from_word(word: &str) -> Self {
        Self {
            seed: fnv1a64(word.to_lowercase().as_bytes()),
            label: Some(word.to_string()),
        }
    }
}

/// Resolve CLI seed tokens. Integers are taken as-is (negative values by
/// magnitude), alphanumeric words are hashed. Duplicates keep the first
/// occurrence; an empty list yields the default seed.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut seen = HashSet::new();
    let mut resolved = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }
        let info = if let Ok(value) = token.parse::<i64>() {
            SeedInfo::from_numeric(value.unsigned_abs())
        } else if let Ok(value) = token.parse::<u64>() {
            SeedInfo::from_numeric(value)
        } else if token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            SeedInfo::from_word(token)
        } else {
            bail!("Unrecognized seed token: {token}");
        };
        if seen.insert(info.seed) {
            resolved.push(info);
        }
    }

    if resolved.is_empty() {
        resolved.push(SeedInfo::from_numeric(DEFAULT_SEED));
    }
    Ok(resolved)
}
