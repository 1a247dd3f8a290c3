//! Footballer records, game modes and the daily challenge mapping.
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::{
    DATE_STAMP_FORMAT, DATE_STAMP_LEN, MODE_ID_CLASSIC, MODE_ID_EMOJI, MODE_ID_PIXEL,
    MODE_ID_SILHOUETTE,
};

/// Catalog identifier of a footballer.
pub type FootballerId = u32;

/// Immutable catalog entry supplied by the data provider.
///
/// `nationality`, `club`, `avatar` and `shield` are image references (flag,
/// logo, portrait, card) and are compared as opaque strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footballer {
    pub id: FootballerId,
    pub fullname: String,
    #[serde(default)]
    pub avatar: String,
    pub position: String,
    pub nationality: String,
    pub club: String,
    pub league: String,
    pub rating: i32,
    #[serde(deserialize_with = "deserialize_birthdate")]
    pub birthdate: NaiveDate,
    #[serde(default)]
    pub shield: String,
}

impl Footballer {
    /// Age in whole calendar years as of `today`: `today.year - birth year`.
    ///
    /// Birthdays within the year are ignored on purpose; the value must match
    /// what every other client computes for the same day.
    #[must_use]
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        today.year() - self.birthdate.year()
    }

    /// Reduced view stored on guess rows and returned by search.
    #[must_use]
    pub fn summary(&self) -> FootballerRef {
        FootballerRef {
            id: self.id,
            fullname: self.fullname.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

/// Identity and display fields of a footballer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FootballerRef {
    pub id: FootballerId,
    pub fullname: String,
    pub avatar: String,
}

/// Accepts `YYYY-MM-DD` as well as full ISO timestamps such as
/// `1987-06-24T00:00:00+00:00`.
fn deserialize_birthdate<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date_prefix(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid birthdate '{raw}', expected YYYY-MM-DD"))
    })
}

/// Parse the leading `YYYY-MM-DD` portion of a date or timestamp string.
#[must_use]
pub fn parse_date_prefix(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let head = trimmed.get(..DATE_STAMP_LEN)?;
    NaiveDate::parse_from_str(head, DATE_STAMP_FORMAT).ok()
}

/// UTC calendar day stamp (`YYYY-MM-DD`) for an instant.
#[must_use]
pub fn date_stamp(now: DateTime<Utc>) -> String {
    now.date_naive().format(DATE_STAMP_FORMAT).to_string()
}

/// Game variants. Each has its own daily target and session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Classic,
    Pixel,
    Silhouette,
    /// Reserved provider id; not playable.
    Emoji,
}

impl GameMode {
    /// Modes that can currently be played, in display order.
    pub const PLAYABLE: [Self; 3] = [Self::Classic, Self::Pixel, Self::Silhouette];

    /// Every mode with a reserved storage namespace.
    pub const ALL: [Self; 4] = [Self::Classic, Self::Pixel, Self::Silhouette, Self::Emoji];

    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            MODE_ID_CLASSIC => Some(Self::Classic),
            MODE_ID_PIXEL => Some(Self::Pixel),
            MODE_ID_SILHOUETTE => Some(Self::Silhouette),
            MODE_ID_EMOJI => Some(Self::Emoji),
            _ => None,
        }
    }

    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Classic => MODE_ID_CLASSIC,
            Self::Pixel => MODE_ID_PIXEL,
            Self::Silhouette => MODE_ID_SILHOUETTE,
            Self::Emoji => MODE_ID_EMOJI,
        }
    }

    /// Storage and routing key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Pixel => "pixel",
            Self::Silhouette => "silhouette",
            Self::Emoji => "emoji",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Classic => "Classic",
            Self::Pixel => "Pixel",
            Self::Silhouette => "Silhouette",
            Self::Emoji => "Emoji",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.key().eq_ignore_ascii_case(key.trim()))
    }

    #[must_use]
    pub const fn is_playable(self) -> bool {
        !matches!(self, Self::Emoji)
    }

    /// Whether guesses receive attribute-level feedback.
    #[must_use]
    pub const fn shows_feedback(self) -> bool {
        matches!(self, Self::Classic)
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One provider row of today's challenge list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyChallenge {
    pub mode_id: u8,
    pub footballer_id: FootballerId,
}

/// Today's target id per mode, as cached under `dailyChallenges`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyChallenges(BTreeMap<GameMode, FootballerId>);

impl DailyChallenges {
    /// Map provider rows to modes, ignoring unknown mode ids.
    ///
    /// A later row for the same mode wins.
    #[must_use]
    pub fn from_rows(rows: &[DailyChallenge]) -> Self {
        let mut map = BTreeMap::new();
        for row in rows {
            match GameMode::from_id(row.mode_id) {
                Some(mode) => {
                    map.insert(mode, row.footballer_id);
                }
                None => log::warn!("ignoring daily challenge for unknown mode id {}", row.mode_id),
            }
        }
        Self(map)
    }

    #[must_use]
    pub fn target(&self, mode: GameMode) -> Option<FootballerId> {
        self.0.get(&mode).copied()
    }

    pub fn insert(&mut self, mode: GameMode, id: FootballerId) {
        self.0.insert(mode, id);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GameMode, FootballerId)> + '_ {
        self.0.iter().map(|(mode, id)| (*mode, *id))
    }

    /// Provider rows equivalent to this mapping.
    #[must_use]
    pub fn to_rows(&self) -> Vec<DailyChallenge> {
        self.iter()
            .map(|(mode, footballer_id)| DailyChallenge {
                mode_id: mode.id(),
                footballer_id,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_json(birthdate: &str) -> String {
        format!(
            r#"{{
                "id": 7,
                "fullname": "Lionel Messi",
                "avatar": "https://img/7.png",
                "position": "RW",
                "nationality": "https://flags/ar.png",
                "club": "https://logos/miami.png",
                "league": "MLS",
                "rating": 90,
                "birthdate": "{birthdate}",
                "shield": "https://cards/7.png"
            }}"#
        )
    }

    #[test]
    fn birthdate_accepts_date_and_timestamp() {
        let a: Footballer = serde_json::from_str(&sample_json("1987-06-24")).unwrap();
        let b: Footballer = serde_json::from_str(&sample_json("1987-06-24T00:00:00+00:00")).unwrap();
        assert_eq!(a.birthdate, b.birthdate);
        assert!(serde_json::from_str::<Footballer>(&sample_json("24/06/1987")).is_err());
    }

    #[test]
    fn age_ignores_birthday_within_year() {
        let f: Footballer = serde_json::from_str(&sample_json("1987-06-24")).unwrap();
        let jan = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let dec = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(f.age_on(jan), 38);
        assert_eq!(f.age_on(dec), 38);
    }

    #[test]
    fn date_stamp_uses_utc_day() {
        let late = Utc.with_ymd_and_hms(2025, 3, 9, 23, 59, 59).unwrap();
        assert_eq!(date_stamp(late), "2025-03-09");
    }

    #[test]
    fn mode_ids_follow_provider_convention() {
        assert_eq!(GameMode::from_id(1), Some(GameMode::Classic));
        assert_eq!(GameMode::from_id(2), Some(GameMode::Pixel));
        assert_eq!(GameMode::from_id(3), Some(GameMode::Silhouette));
        assert_eq!(GameMode::from_id(4), Some(GameMode::Emoji));
        assert_eq!(GameMode::from_id(9), None);
        assert!(!GameMode::Emoji.is_playable());
        assert_eq!(GameMode::from_key("Pixel"), Some(GameMode::Pixel));
    }

    #[test]
    fn challenges_map_rows_and_serialize_by_mode_key() {
        let rows = [
            DailyChallenge { mode_id: 1, footballer_id: 10 },
            DailyChallenge { mode_id: 3, footballer_id: 30 },
            DailyChallenge { mode_id: 42, footballer_id: 99 },
        ];
        let challenges = DailyChallenges::from_rows(&rows);
        assert_eq!(challenges.len(), 2);
        assert_eq!(challenges.target(GameMode::Silhouette), Some(30));
        assert_eq!(challenges.target(GameMode::Pixel), None);

        let json = serde_json::to_string(&challenges).unwrap();
        assert_eq!(json, r#"{"classic":10,"silhouette":30}"#);
        let back: DailyChallenges = serde_json::from_str(&json).unwrap();
        assert_eq!(back, challenges);
    }
}
