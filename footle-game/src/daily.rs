//! Daily Session Manager: rollover, cached challenges and per-mode progress.
//!
//! A [`DailySession`] is opened once at application start and handed to the
//! mode controllers by reference. It owns the persisted store, the day marker
//! and the progress map; controllers only reach storage through it.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::footballer::{DailyChallenge, DailyChallenges, FootballerId, GameMode, date_stamp};
use crate::numbers::percent_of;
use crate::provider::FootballerProvider;
use crate::record::{SessionRecord, StoredSession};
use crate::storage::{GameStore, KeyValueStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProgressStatus {
    #[default]
    NotStarted,
    #[serde(rename = "playing")]
    InProgress,
    Solved,
}

impl ProgressStatus {
    #[must_use]
    pub const fn is_solved(self) -> bool {
        matches!(self, Self::Solved)
    }
}

/// Status per mode. Modes without an entry have not been started.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Progress(BTreeMap<GameMode, ProgressStatus>);

impl Progress {
    #[must_use]
    pub fn status(&self, mode: GameMode) -> ProgressStatus {
        self.0.get(&mode).copied().unwrap_or_default()
    }

    /// Copy of this map with `mode` set to `status`.
    #[must_use]
    pub fn with(&self, mode: GameMode, status: ProgressStatus) -> Self {
        let mut next = self.0.clone();
        if status == ProgressStatus::NotStarted {
            next.remove(&mode);
        } else {
            next.insert(mode, status);
        }
        Self(next)
    }

    /// Solved playable modes.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        GameMode::PLAYABLE
            .iter()
            .filter(|mode| self.status(**mode).is_solved())
            .count()
    }

    #[must_use]
    pub fn percent(&self) -> u8 {
        percent_of(self.completed_count(), GameMode::PLAYABLE.len())
    }
}

/// Result of a challenge refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed,
    /// Refresh failed or came back empty; the cached mapping stays.
    KeptCached,
    /// Refresh failed and nothing was cached.
    Unavailable,
}

impl fmt::Display for RefreshOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Refreshed => "refreshed",
            Self::KeptCached => "kept cached",
            Self::Unavailable => "unavailable",
        })
    }
}

#[derive(Debug, Clone)]
pub struct DailySession<S> {
    store: GameStore<S>,
    today: NaiveDate,
    challenges: DailyChallenges,
    progress: Progress,
    purged_on_open: bool,
}

impl<S: KeyValueStore> DailySession<S> {
    /// Open the session for `now`: roll over if the day changed, then load
    /// persisted progress and the cached challenge mapping.
    #[must_use]
    pub fn open(store: GameStore<S>, now: DateTime<Utc>) -> Self {
        let mut session = Self {
            store,
            today: now.date_naive(),
            challenges: DailyChallenges::default(),
            progress: Progress::default(),
            purged_on_open: false,
        };
        session.purged_on_open = session.reset_if_new_day(now);
        session.load_persisted();
        session
    }

    fn load_persisted(&mut self) {
        let keys = self.store.keys();
        self.progress = self.store.read(&keys.progress()).unwrap_or_default();
        self.challenges = self
            .store
            .read(&keys.daily_challenges())
            .unwrap_or_default();
    }

    /// Purge daily data when `now` falls on a different UTC day than the
    /// stored marker. Returns whether a purge happened.
    pub fn reset_if_new_day(&mut self, now: DateTime<Utc>) -> bool {
        let stamp = date_stamp(now);
        self.today = now.date_naive();
        if self.store.last_date().as_deref() == Some(stamp.as_str()) {
            return false;
        }
        let removed = self.store.purge_daily();
        self.store.set_last_date(&stamp);
        self.challenges = DailyChallenges::default();
        self.progress = Progress::default();
        log::info!("new day {stamp}: purged {removed} stored entries");
        true
    }

    #[must_use]
    pub const fn today(&self) -> NaiveDate {
        self.today
    }

    /// Whether opening this session rolled the day over.
    #[must_use]
    pub const fn purged_on_open(&self) -> bool {
        self.purged_on_open
    }

    #[must_use]
    pub const fn challenges(&self) -> &DailyChallenges {
        &self.challenges
    }

    /// Target for `mode`; `None` means loading or unavailable.
    #[must_use]
    pub fn target_id(&self, mode: GameMode) -> Option<FootballerId> {
        self.challenges.target(mode)
    }

    /// First phase of a refresh: the mapping to serve until the fetch lands.
    #[must_use]
    pub const fn begin_refresh(&self) -> &DailyChallenges {
        &self.challenges
    }

    /// Second phase of a refresh: swap in a successful, non-empty result.
    /// Failures leave the cached mapping untouched.
    pub fn finish_refresh<E: fmt::Display>(
        &mut self,
        result: Result<Vec<DailyChallenge>, E>,
    ) -> RefreshOutcome {
        let fallback = if self.challenges.is_empty() {
            RefreshOutcome::Unavailable
        } else {
            RefreshOutcome::KeptCached
        };
        let rows = match result {
            Ok(rows) => rows,
            Err(err) => {
                log::warn!("daily challenge refresh failed: {err}");
                return fallback;
            }
        };
        let fresh = DailyChallenges::from_rows(&rows);
        if fresh.is_empty() {
            log::warn!("daily challenge refresh returned no usable rows");
            return fallback;
        }
        self.store
            .write(&self.store.keys().daily_challenges(), &fresh);
        log::info!("daily challenges refreshed for {} modes", fresh.len());
        self.challenges = fresh;
        RefreshOutcome::Refreshed
    }

    /// Fetch today's mapping from `provider` and apply it.
    pub async fn refresh_challenges<P: FootballerProvider + ?Sized>(
        &mut self,
        provider: &P,
    ) -> RefreshOutcome {
        let result = provider.daily_challenges().await;
        self.finish_refresh(result)
    }

    #[must_use]
    pub const fn progress(&self) -> &Progress {
        &self.progress
    }

    #[must_use]
    pub fn status(&self, mode: GameMode) -> ProgressStatus {
        self.progress.status(mode)
    }

    /// Set one mode's status. The new map is persisted before it becomes
    /// visible through [`Self::progress`].
    pub fn set_progress(&mut self, mode: GameMode, status: ProgressStatus) -> &Progress {
        self.update_progress(|current| current.with(mode, status))
    }

    /// Replace the progress map with `f(current)`, persisting first.
    pub fn update_progress(&mut self, f: impl FnOnce(&Progress) -> Progress) -> &Progress {
        let next = f(&self.progress);
        if next != self.progress {
            self.store.write(&self.store.keys().progress(), &next);
            self.progress = next;
        }
        &self.progress
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.progress.completed_count()
    }

    #[must_use]
    pub fn completion_percent(&self) -> u8 {
        self.progress.percent()
    }

    /// Today's record for `mode`, empty when nothing usable is stored.
    #[must_use]
    pub fn load_record(&self, mode: GameMode) -> Option<SessionRecord> {
        let stored: StoredSession = self
            .store
            .read(&self.store.keys().session(mode))
            .unwrap_or_default();
        SessionRecord::from_stored(mode, stored)
    }

    pub fn save_record(&self, record: &SessionRecord) {
        self.store.write(
            &self.store.keys().session(record.mode()),
            &record.to_stored(),
        );
    }

    /// Wipe every application key, including preferences and the day marker,
    /// then stamp today again. Returns how many keys were removed.
    pub fn emergency_reset(&mut self, now: DateTime<Utc>) -> usize {
        let removed = self.store.clear_all();
        self.today = now.date_naive();
        self.store.set_last_date(&date_stamp(now));
        self.challenges = DailyChallenges::default();
        self.progress = Progress::default();
        log::warn!("emergency reset removed {removed} stored entries");
        removed
    }

    #[must_use]
    pub const fn store(&self) -> &GameStore<S> {
        &self.store
    }

    #[must_use]
    pub fn into_store(self) -> GameStore<S> {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;
    use futures::executor::block_on;
    use std::convert::Infallible;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn open(raw: &MemoryStore, now: DateTime<Utc>) -> DailySession<MemoryStore> {
        DailySession::open(GameStore::new(raw.clone(), "footle"), now)
    }

    fn rows() -> Vec<DailyChallenge> {
        vec![
            DailyChallenge { mode_id: 1, footballer_id: 11 },
            DailyChallenge { mode_id: 2, footballer_id: 22 },
            DailyChallenge { mode_id: 3, footballer_id: 33 },
            DailyChallenge { mode_id: 4, footballer_id: 44 },
        ]
    }

    #[test]
    fn first_open_purges_and_stamps() {
        let raw = MemoryStore::new();
        raw.set_item("footle:classic:session", r#"{"guesses":[1]}"#).unwrap();
        raw.set_item("footle:prefs:theme", "\"dark\"").unwrap();
        let session = open(&raw, at(2025, 5, 1, 9));
        assert!(session.purged_on_open());
        assert_eq!(raw.get_item("footle:lastDate").as_deref(), Some("2025-05-01"));
        assert!(raw.get_item("footle:classic:session").is_none());
        assert!(raw.get_item("footle:prefs:theme").is_some());

        let store = session.into_store();
        assert_eq!(store.last_date().as_deref(), Some("2025-05-01"));
    }

    #[test]
    fn reset_is_a_noop_later_the_same_day() {
        let raw = MemoryStore::new();
        let mut session = open(&raw, at(2025, 5, 1, 0));
        session.set_progress(GameMode::Classic, ProgressStatus::Solved);
        assert!(!session.reset_if_new_day(at(2025, 5, 1, 23)));
        assert_eq!(session.status(GameMode::Classic), ProgressStatus::Solved);

        let reopened = open(&raw, at(2025, 5, 1, 18));
        assert!(!reopened.purged_on_open());
        assert_eq!(reopened.status(GameMode::Classic), ProgressStatus::Solved);

        let tomorrow = open(&raw, at(2025, 5, 2, 0));
        assert!(tomorrow.purged_on_open());
        assert_eq!(tomorrow.status(GameMode::Classic), ProgressStatus::NotStarted);
        assert!(raw.get_item("footle:progress").is_none());
    }

    #[test]
    fn refresh_swaps_on_success_and_keeps_cache_on_failure() {
        let raw = MemoryStore::new();
        let mut session = open(&raw, at(2025, 5, 1, 8));
        assert!(session.begin_refresh().is_empty());
        assert_eq!(
            session.finish_refresh::<String>(Err("offline".into())),
            RefreshOutcome::Unavailable
        );
        assert_eq!(session.target_id(GameMode::Classic), None);

        assert_eq!(
            session.finish_refresh::<String>(Ok(rows())),
            RefreshOutcome::Refreshed
        );
        assert_eq!(session.target_id(GameMode::Silhouette), Some(33));
        assert_eq!(session.target_id(GameMode::Emoji), Some(44));

        assert_eq!(
            session.finish_refresh::<String>(Err("timeout".into())),
            RefreshOutcome::KeptCached
        );
        assert_eq!(
            session.finish_refresh::<String>(Ok(Vec::new())),
            RefreshOutcome::KeptCached
        );
        assert_eq!(session.target_id(GameMode::Pixel), Some(22));

        let reopened = open(&raw, at(2025, 5, 1, 20));
        assert_eq!(reopened.begin_refresh().target(GameMode::Classic), Some(11));
    }

    #[test]
    fn async_refresh_uses_provider_rows() {
        struct Fixed;

        #[async_trait::async_trait(?Send)]
        impl FootballerProvider for Fixed {
            type Error = Infallible;

            async fn daily_challenges(&self) -> Result<Vec<DailyChallenge>, Self::Error> {
                Ok(rows())
            }

            async fn footballer_by_id(
                &self,
                _id: FootballerId,
            ) -> Result<Option<crate::footballer::Footballer>, Self::Error> {
                Ok(None)
            }

            async fn search(
                &self,
                _query: &str,
            ) -> Result<Vec<crate::footballer::Footballer>, Self::Error> {
                Ok(Vec::new())
            }
        }

        let raw = MemoryStore::new();
        let mut session = open(&raw, at(2025, 5, 1, 8));
        assert_eq!(block_on(session.refresh_challenges(&Fixed)), RefreshOutcome::Refreshed);
        assert_eq!(session.target_id(GameMode::Classic), Some(11));
    }

    #[test]
    fn progress_is_persisted_before_it_is_visible() {
        let raw = MemoryStore::new();
        let mut session = open(&raw, at(2025, 5, 1, 8));
        session.set_progress(GameMode::Pixel, ProgressStatus::InProgress);
        assert_eq!(
            raw.get_item("footle:progress").as_deref(),
            Some(r#"{"pixel":"playing"}"#)
        );
        session.set_progress(GameMode::Pixel, ProgressStatus::Solved);
        session.set_progress(GameMode::Classic, ProgressStatus::Solved);
        assert_eq!(session.completed_count(), 2);
        assert_eq!(session.completion_percent(), 67);

        raw.set_refuse_writes(true);
        session.set_progress(GameMode::Silhouette, ProgressStatus::Solved);
        assert_eq!(session.completion_percent(), 100);
        assert_eq!(open(&raw, at(2025, 5, 1, 9)).completed_count(), 2);
    }

    #[test]
    fn corrupt_progress_reads_as_fresh() {
        let raw = MemoryStore::new();
        raw.set_item("footle:lastDate", "2025-05-01").unwrap();
        raw.set_item("footle:progress", "[[[").unwrap();
        raw.set_item("footle:dailyChallenges", "42").unwrap();
        let session = open(&raw, at(2025, 5, 1, 8));
        assert_eq!(session.completed_count(), 0);
        assert!(session.challenges().is_empty());
    }

    #[test]
    fn records_round_trip_through_the_store() {
        let raw = MemoryStore::new();
        let session = open(&raw, at(2025, 5, 1, 8));
        let mut record = session.load_record(GameMode::Silhouette).unwrap();
        assert!(record.guesses().is_empty());
        record.push_guess(5);
        if let Some(hints) = record.hints_mut() {
            hints.club_revealed = true;
        }
        session.save_record(&record);
        assert_eq!(session.load_record(GameMode::Silhouette), Some(record));
        assert!(session.load_record(GameMode::Emoji).is_none());
    }

    #[test]
    fn emergency_reset_clears_everything_owned() {
        let raw = MemoryStore::new();
        raw.set_item("footle:prefs:theme", "\"dark\"").unwrap();
        raw.set_item("elsewhere", "1").unwrap();
        let mut session = open(&raw, at(2025, 5, 1, 8));
        session.finish_refresh::<String>(Ok(rows()));
        session.set_progress(GameMode::Classic, ProgressStatus::Solved);

        assert_eq!(session.emergency_reset(at(2025, 5, 1, 9)), 4);
        assert_eq!(session.completed_count(), 0);
        assert!(session.challenges().is_empty());
        assert_eq!(raw.keys(), vec!["elsewhere", "footle:lastDate"]);
    }
}
