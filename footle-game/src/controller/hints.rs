use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::HintCfg;
use crate::footballer::GameMode;
use crate::record::SilhouetteHints;

/// Silhouette clues unlocked by wrong guesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hint {
    Country,
    Club,
}

impl Hint {
    pub const ALL: [Self; 2] = [Self::Country, Self::Club];

    #[must_use]
    pub const fn threshold(self, cfg: &HintCfg) -> u32 {
        match self {
            Self::Country => cfg.country_after,
            Self::Club => cfg.club_after,
        }
    }

    #[must_use]
    pub const fn is_revealed(self, flags: &SilhouetteHints) -> bool {
        match self {
            Self::Country => flags.country_revealed,
            Self::Club => flags.club_revealed,
        }
    }

    pub const fn mark(self, flags: &mut SilhouetteHints) {
        match self {
            Self::Country => flags.country_revealed = true,
            Self::Club => flags.club_revealed = true,
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "country" | "nationality" => Some(Self::Country),
            "club" => Some(Self::Club),
            _ => None,
        }
    }
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Country => "country",
            Self::Club => "club",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum HintStatus {
    Locked { remaining: u32 },
    Available,
    Revealed,
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum HintError {
    #[error("{hint} hint unlocks after {remaining} more wrong guesses")]
    Locked { hint: Hint, remaining: u32 },
    #[error("{mode} has no {hint} hint")]
    Unsupported { mode: GameMode, hint: Hint },
}

/// Status of `hint` given the stored flags and the wrong-guess count.
/// A solved session unlocks every hint.
#[must_use]
pub fn hint_status(
    hint: Hint,
    flags: &SilhouetteHints,
    cfg: &HintCfg,
    wrong_guesses: u32,
    solved: bool,
) -> HintStatus {
    if hint.is_revealed(flags) {
        return HintStatus::Revealed;
    }
    let threshold = hint.threshold(cfg);
    if solved || wrong_guesses >= threshold {
        HintStatus::Available
    } else {
        HintStatus::Locked {
            remaining: threshold - wrong_guesses,
        }
    }
}
