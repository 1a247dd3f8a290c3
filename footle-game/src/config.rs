//! Tunable gameplay configuration.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::DEFAULT_STORAGE_PREFIX;
use crate::footballer::GameMode;

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f32,
        max: f32,
        value: f32,
    },
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("hint thresholds out of order (country after {country}, club after {club})")]
    HintOrder { country: u32, club: u32 },
    #[error("invalid config JSON: {0}")]
    Json(String),
}

/// Progressive image reveal: initial clarity and the increment per wrong guess.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevealCfg {
    pub start: f32,
    pub step: f32,
}

impl RevealCfg {
    fn validate(&self, prefix: &'static str) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.start) {
            return Err(ConfigError::RangeViolation {
                field: prefix,
                min: 0.0,
                max: 1.0,
                value: self.start,
            });
        }
        if self.step <= 0.0 || self.step > 1.0 {
            return Err(ConfigError::RangeViolation {
                field: prefix,
                min: 0.0,
                max: 1.0,
                value: self.step,
            });
        }
        Ok(())
    }
}

/// Wrong guesses required before each Silhouette hint can be revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintCfg {
    pub country_after: u32,
    pub club_after: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootleConfig {
    #[serde(default = "FootleConfig::default_storage_prefix")]
    pub storage_prefix: String,
    #[serde(default = "FootleConfig::default_search_limit")]
    pub search_limit: usize,
    #[serde(default = "FootleConfig::default_pixel")]
    pub pixel: RevealCfg,
    #[serde(default = "FootleConfig::default_silhouette")]
    pub silhouette: RevealCfg,
    #[serde(default = "FootleConfig::default_hints")]
    pub hints: HintCfg,
    #[serde(default = "FootleConfig::default_share_url")]
    pub share_url: String,
}

impl FootleConfig {
    fn default_storage_prefix() -> String {
        DEFAULT_STORAGE_PREFIX.to_string()
    }

    const fn default_search_limit() -> usize {
        25
    }

    const fn default_pixel() -> RevealCfg {
        RevealCfg {
            start: 0.1,
            step: 0.2,
        }
    }

    const fn default_silhouette() -> RevealCfg {
        RevealCfg {
            start: 0.4,
            step: 0.08,
        }
    }

    const fn default_hints() -> HintCfg {
        HintCfg {
            country_after: 3,
            club_after: 6,
        }
    }

    fn default_share_url() -> String {
        "https://footle.xyz".to_string()
    }

    #[must_use]
    pub fn default_config() -> Self {
        Self {
            storage_prefix: Self::default_storage_prefix(),
            search_limit: Self::default_search_limit(),
            pixel: Self::default_pixel(),
            silhouette: Self::default_silhouette(),
            hints: Self::default_hints(),
            share_url: Self::default_share_url(),
        }
    }

    /// Parse and validate a JSON config; missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Json(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_prefix.trim().is_empty() {
            return Err(ConfigError::Empty {
                field: "storage_prefix",
            });
        }
        if self.search_limit == 0 {
            return Err(ConfigError::Empty {
                field: "search_limit",
            });
        }
        self.pixel.validate("pixel")?;
        self.silhouette.validate("silhouette")?;
        if self.hints.club_after < self.hints.country_after {
            return Err(ConfigError::HintOrder {
                country: self.hints.country_after,
                club: self.hints.club_after,
            });
        }
        Ok(())
    }

    /// Reveal settings for the image modes; `None` for Classic.
    #[must_use]
    pub const fn reveal_for(&self, mode: GameMode) -> Option<RevealCfg> {
        match mode {
            GameMode::Pixel => Some(self.pixel),
            GameMode::Silhouette => Some(self.silhouette),
            GameMode::Classic | GameMode::Emoji => None,
        }
    }
}

impl Default for FootleConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let cfg = FootleConfig::default_config();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.search_limit, 25);
        assert_eq!(cfg.reveal_for(GameMode::Classic), None);
        assert_eq!(cfg.reveal_for(GameMode::Pixel).map(|r| r.step), Some(0.2));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = FootleConfig::from_json(r#"{ "search_limit": 10 }"#).unwrap();
        assert_eq!(cfg.search_limit, 10);
        assert_eq!(cfg.storage_prefix, "footle");
        assert_eq!(cfg.hints.club_after, 6);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = FootleConfig::from_json(r#"{ "pixel": { "start": 0.1, "step": 0.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::RangeViolation { field: "pixel", .. }));

        let err = FootleConfig::from_json(
            r#"{ "hints": { "country_after": 5, "club_after": 2 } }"#,
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::HintOrder { country: 5, club: 2 });

        assert!(matches!(
            FootleConfig::from_json("{ nope"),
            Err(ConfigError::Json(_))
        ));
    }
}
