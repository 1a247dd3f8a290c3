//! Footle Game Engine
//!
//! Platform-agnostic core of the Footle daily footballer guessing game.
//! This crate provides guess evaluation, daily state lifecycle and mode
//! controllers without UI or platform-specific dependencies.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod controller;
pub mod daily;
pub mod feedback;
pub mod footballer;
pub mod numbers;
pub mod provider;
pub mod record;
pub mod schedule;
pub mod share;
pub mod storage;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogProvider, ChallengeSource};
pub use config::{ConfigError, FootleConfig, HintCfg, RevealCfg};
pub use controller::{
    ControllerState, GuessError, GuessOutcome, Hint, HintError, HintStatus, LoadTicket,
    ModeController, MountOutcome, RevealMeter, mount, replay,
};
pub use daily::{DailySession, Progress, ProgressStatus, RefreshOutcome};
pub use feedback::{
    Arrow, Attribute, CellResult, CellValue, GuessRow, MatchColor, evaluate, evaluate_masked,
    is_classic_win,
};
pub use footballer::{
    DailyChallenge, DailyChallenges, Footballer, FootballerId, FootballerRef, GameMode, date_stamp,
};
pub use provider::FootballerProvider;
pub use record::{SessionRecord, SilhouetteHints};
pub use schedule::daily_challenges_for;
pub use share::share_text;
pub use storage::{GameStore, KeyValueStore, MemoryStore, StorageError, StorageKeys};
