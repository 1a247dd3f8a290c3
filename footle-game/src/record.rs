//! Persisted per-mode session records.
//!
//! Only guessed ids and hint flags are stored; guess rows are rebuilt by
//! replaying the ids through the evaluator.
use serde::{Deserialize, Serialize};

use crate::footballer::{FootballerId, GameMode};

/// Silhouette hint flags. Once set they stay set until the daily purge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SilhouetteHints {
    pub country_revealed: bool,
    pub club_revealed: bool,
}

/// Session state for one mode, shaped per mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionRecord {
    Classic {
        guesses: Vec<FootballerId>,
    },
    Pixel {
        guesses: Vec<FootballerId>,
    },
    Silhouette {
        guesses: Vec<FootballerId>,
        hints: SilhouetteHints,
    },
}

/// Stored JSON shape: `{"guesses": [..], "countryRevealed": .., "clubRevealed": ..}`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StoredSession {
    #[serde(default)]
    guesses: Vec<FootballerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    country_revealed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    club_revealed: Option<bool>,
}

impl SessionRecord {
    /// Empty record for a playable mode.
    #[must_use]
    pub fn new(mode: GameMode) -> Option<Self> {
        match mode {
            GameMode::Classic => Some(Self::Classic {
                guesses: Vec::new(),
            }),
            GameMode::Pixel => Some(Self::Pixel {
                guesses: Vec::new(),
            }),
            GameMode::Silhouette => Some(Self::Silhouette {
                guesses: Vec::new(),
                hints: SilhouetteHints::default(),
            }),
            GameMode::Emoji => None,
        }
    }

    pub(crate) fn from_stored(mode: GameMode, stored: StoredSession) -> Option<Self> {
        let mut record = Self::new(mode)?;
        let mut seen = Vec::with_capacity(stored.guesses.len());
        for id in stored.guesses {
            if !seen.contains(&id) {
                seen.push(id);
            }
        }
        *record.guesses_mut() = seen;
        if let Self::Silhouette { hints, .. } = &mut record {
            hints.country_revealed = stored.country_revealed.unwrap_or(false);
            hints.club_revealed = stored.club_revealed.unwrap_or(false);
        }
        Some(record)
    }

    pub(crate) fn to_stored(&self) -> StoredSession {
        let hints = self.hints();
        StoredSession {
            guesses: self.guesses().to_vec(),
            country_revealed: hints.map(|h| h.country_revealed),
            club_revealed: hints.map(|h| h.club_revealed),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> GameMode {
        match self {
            Self::Classic { .. } => GameMode::Classic,
            Self::Pixel { .. } => GameMode::Pixel,
            Self::Silhouette { .. } => GameMode::Silhouette,
        }
    }

    /// Guessed ids, oldest first.
    #[must_use]
    pub fn guesses(&self) -> &[FootballerId] {
        match self {
            Self::Classic { guesses } | Self::Pixel { guesses } | Self::Silhouette { guesses, .. } => {
                guesses
            }
        }
    }

    fn guesses_mut(&mut self) -> &mut Vec<FootballerId> {
        match self {
            Self::Classic { guesses } | Self::Pixel { guesses } | Self::Silhouette { guesses, .. } => {
                guesses
            }
        }
    }

    #[must_use]
    pub fn contains(&self, id: FootballerId) -> bool {
        self.guesses().contains(&id)
    }

    /// Append `id` unless already recorded. Returns whether it was added.
    pub fn push_guess(&mut self, id: FootballerId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.guesses_mut().push(id);
        true
    }

    #[must_use]
    pub const fn hints(&self) -> Option<&SilhouetteHints> {
        match self {
            Self::Silhouette { hints, .. } => Some(hints),
            Self::Classic { .. } | Self::Pixel { .. } => None,
        }
    }

    pub const fn hints_mut(&mut self) -> Option<&mut SilhouetteHints> {
        match self {
            Self::Silhouette { hints, .. } => Some(hints),
            Self::Classic { .. } | Self::Pixel { .. } => None,
        }
    }
}
