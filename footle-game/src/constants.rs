//! Fixed identifiers shared by the persistence layout and provider contract.
//!
//! Tunable gameplay values (reveal steps, hint thresholds, search cap) live in
//! [`crate::config::FootleConfig`]; everything here is part of a stored or
//! wire format and must not change without a migration.

// Storage layout -------------------------------------------------------------
pub const DEFAULT_STORAGE_PREFIX: &str = "footle";
pub(crate) const KEY_LAST_DATE: &str = "lastDate";
pub(crate) const KEY_DAILY_CHALLENGES: &str = "dailyChallenges";
pub(crate) const KEY_PROGRESS: &str = "progress";
pub(crate) const KEY_SESSION_SUFFIX: &str = "session";
pub(crate) const KEY_SEPARATOR: char = ':';

// Provider mode ids ------------------------------------------------------------
pub(crate) const MODE_ID_CLASSIC: u8 = 1;
pub(crate) const MODE_ID_PIXEL: u8 = 2;
pub(crate) const MODE_ID_SILHOUETTE: u8 = 3;
pub(crate) const MODE_ID_EMOJI: u8 = 4;

// Date stamps ------------------------------------------------------------------
pub(crate) const DATE_STAMP_FORMAT: &str = "%Y-%m-%d";
pub(crate) const DATE_STAMP_LEN: usize = 10;

// Daily schedule ---------------------------------------------------------------
pub(crate) const SCHEDULE_DOMAIN: &[u8] = b"FOOTLE-";
