//! Guess evaluation: per-attribute feedback for a guessed footballer against
//! the day's target.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::footballer::{Footballer, FootballerRef};

/// Compared columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Position,
    Nationality,
    Club,
    League,
    Rating,
    Age,
}

impl Attribute {
    pub const ALL: [Self; 6] = [
        Self::Position,
        Self::Nationality,
        Self::Club,
        Self::League,
        Self::Rating,
        Self::Age,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Nationality => "nationality",
            Self::Club => "club",
            Self::League => "league",
            Self::Rating => "rating",
            Self::Age => "age",
        }
    }

    /// Numeric attributes get a close tier and a directional arrow.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Rating | Self::Age)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchColor {
    Match,
    /// Numeric value off by exactly one.
    Close,
    Miss,
}

impl MatchColor {
    /// Square used in shared result grids.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Match => "🟩",
            Self::Close => "🟧",
            Self::Miss => "🟥",
        }
    }
}

/// Direction from the guessed value toward the target value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arrow {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(i32),
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellResult {
    pub attribute: Attribute,
    pub value: CellValue,
    pub color: MatchColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrow: Option<Arrow>,
}

/// One evaluated guess. Rows are derived data and never edited.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuessRow {
    pub footballer: FootballerRef,
    pub cells: [CellResult; 6],
}

impl GuessRow {
    #[must_use]
    pub fn cell(&self, attribute: Attribute) -> &CellResult {
        // cells are built from Attribute::ALL, so the index always matches
        let idx = Attribute::ALL
            .iter()
            .position(|a| *a == attribute)
            .unwrap_or_default();
        &self.cells[idx]
    }

    #[must_use]
    pub fn colors(&self) -> [MatchColor; 6] {
        self.cells.clone().map(|cell| cell.color)
    }

    #[must_use]
    pub fn is_all_match(&self) -> bool {
        self.cells.iter().all(|cell| cell.color == MatchColor::Match)
    }
}

fn guessed_values(guess: &Footballer, today: NaiveDate) -> [CellValue; 6] {
    [
        CellValue::Text(guess.position.clone()),
        CellValue::Text(guess.nationality.clone()),
        CellValue::Text(guess.club.clone()),
        CellValue::Text(guess.league.clone()),
        CellValue::Number(guess.rating),
        CellValue::Number(guess.age_on(today)),
    ]
}

fn categorical(attribute: Attribute, guess: &str, target: &str) -> CellResult {
    CellResult {
        attribute,
        value: CellValue::Text(guess.to_string()),
        color: if guess == target {
            MatchColor::Match
        } else {
            MatchColor::Miss
        },
        arrow: None,
    }
}

fn numeric(attribute: Attribute, guess: i32, target: i32) -> CellResult {
    let diff = i64::from(guess) - i64::from(target);
    let color = match diff.abs() {
        0 => MatchColor::Match,
        1 => MatchColor::Close,
        _ => MatchColor::Miss,
    };
    let arrow = match diff.signum() {
        -1 => Some(Arrow::Up),
        1 => Some(Arrow::Down),
        _ => None,
    };
    CellResult {
        attribute,
        value: CellValue::Number(guess),
        color,
        arrow,
    }
}

/// Full attribute feedback for Classic mode.
///
/// Age is recomputed from both birthdates for `today` on every call.
#[must_use]
pub fn evaluate(guess: &Footballer, target: &Footballer, today: NaiveDate) -> GuessRow {
    GuessRow {
        footballer: guess.summary(),
        cells: [
            categorical(Attribute::Position, &guess.position, &target.position),
            categorical(Attribute::Nationality, &guess.nationality, &target.nationality),
            categorical(Attribute::Club, &guess.club, &target.club),
            categorical(Attribute::League, &guess.league, &target.league),
            numeric(Attribute::Rating, guess.rating, target.rating),
            numeric(Attribute::Age, guess.age_on(today), target.age_on(today)),
        ],
    }
}

/// Row for the image modes: guessed values shown, every cell a miss.
#[must_use]
pub fn evaluate_masked(guess: &Footballer, today: NaiveDate) -> GuessRow {
    let values = guessed_values(guess, today);
    let mut attrs = Attribute::ALL.into_iter();
    GuessRow {
        footballer: guess.summary(),
        cells: values.map(|value| CellResult {
            attribute: attrs.next().unwrap_or(Attribute::Position),
            value,
            color: MatchColor::Miss,
            arrow: None,
        }),
    }
}

/// Classic win: all six attributes match on `today`.
#[must_use]
pub fn is_classic_win(guess: &Footballer, target: &Footballer, today: NaiveDate) -> bool {
    evaluate(guess, target, today).is_all_match()
}
