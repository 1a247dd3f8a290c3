//! Mode Controllers: one state machine per game mode.
//!
//! A controller moves from `LoadingTarget` to `AwaitingGuess` once the day's
//! target resolves, and to `Solved` when a guess meets the mode's win
//! condition. History is rebuilt from persisted ids on every mount.
mod hints;
mod mount;
mod reveal;

pub use hints::{Hint, HintError, HintStatus, hint_status};
pub use mount::{MountOutcome, mount};
pub use reveal::RevealMeter;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{FootleConfig, HintCfg, RevealCfg};
use crate::daily::{DailySession, ProgressStatus};
use crate::feedback::{GuessRow, evaluate, evaluate_masked};
use crate::footballer::{Footballer, FootballerId, GameMode};
use crate::numbers::usize_to_u32;
use crate::record::SessionRecord;
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ControllerState {
    LoadingTarget,
    AwaitingGuess,
    Solved,
}

/// Identifies one load of a controller. Completions carrying an outdated
/// ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    mode: GameMode,
    generation: u64,
}

impl LoadTicket {
    #[must_use]
    pub const fn mode(&self) -> GameMode {
        self.mode
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum GuessError {
    #[error("no target loaded for {0}")]
    TargetNotLoaded(GameMode),
    #[error("{0} is already solved today")]
    AlreadySolved(GameMode),
    #[error("footballer {0} was already guessed")]
    Duplicate(FootballerId),
    #[error("view for {0} is no longer active")]
    StaleView(GameMode),
}

/// Result of one accepted guess.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuessOutcome {
    pub row: GuessRow,
    pub solved: bool,
    pub state: ControllerState,
    /// Clarity after this guess, for the image modes.
    pub reveal: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct ModeController {
    mode: GameMode,
    hint_cfg: HintCfg,
    reveal_cfg: Option<RevealCfg>,
    state: ControllerState,
    generation: u64,
    target: Option<Footballer>,
    record: SessionRecord,
    rows: Vec<GuessRow>,
    reveal: Option<RevealMeter>,
}

impl ModeController {
    /// Controller for a playable mode; `None` for reserved modes.
    #[must_use]
    pub fn new(mode: GameMode, cfg: &FootleConfig) -> Option<Self> {
        let record = SessionRecord::new(mode)?;
        let reveal_cfg = cfg.reveal_for(mode);
        Some(Self {
            mode,
            hint_cfg: cfg.hints,
            reveal_cfg,
            state: ControllerState::LoadingTarget,
            generation: 0,
            target: None,
            record,
            rows: Vec::new(),
            reveal: reveal_cfg.map(RevealMeter::new),
        })
    }

    #[must_use]
    pub const fn mode(&self) -> GameMode {
        self.mode
    }

    #[must_use]
    pub const fn state(&self) -> ControllerState {
        self.state
    }

    #[must_use]
    pub const fn target(&self) -> Option<&Footballer> {
        self.target.as_ref()
    }

    #[must_use]
    pub const fn record(&self) -> &SessionRecord {
        &self.record
    }

    /// Guess history, most recent first.
    #[must_use]
    pub fn rows(&self) -> &[GuessRow] {
        &self.rows
    }

    #[must_use]
    pub const fn reveal(&self) -> Option<&RevealMeter> {
        self.reveal.as_ref()
    }

    #[must_use]
    pub const fn is_solved(&self) -> bool {
        matches!(self.state, ControllerState::Solved)
    }

    /// Guesses that did not solve the puzzle.
    #[must_use]
    pub fn wrong_guesses(&self) -> u32 {
        let total = usize_to_u32(self.rows.len());
        if self.is_solved() {
            total.saturating_sub(1)
        } else {
            total
        }
    }

    /// Start a new load and invalidate every earlier ticket.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation = self.generation.wrapping_add(1);
        self.state = ControllerState::LoadingTarget;
        self.target = None;
        self.rows.clear();
        self.reset_reveal(0);
        LoadTicket {
            mode: self.mode,
            generation: self.generation,
        }
    }

    #[must_use]
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.mode == self.mode && ticket.generation == self.generation
    }

    /// Tear the view down; in-flight loads become stale.
    pub fn unmount(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.state = ControllerState::LoadingTarget;
        self.target = None;
        self.rows.clear();
    }

    fn check(&self, ticket: LoadTicket) -> Result<(), GuessError> {
        if self.is_current(ticket) {
            Ok(())
        } else {
            log::debug!("dropping stale {} load", self.mode);
            Err(GuessError::StaleView(self.mode))
        }
    }

    /// The day's target resolved.
    ///
    /// # Errors
    ///
    /// Returns [`GuessError::StaleView`] if the ticket is outdated; nothing
    /// is changed in that case.
    pub fn apply_target(&mut self, ticket: LoadTicket, target: Footballer) -> Result<(), GuessError> {
        self.check(ticket)?;
        self.target = Some(target);
        self.state = ControllerState::AwaitingGuess;
        Ok(())
    }

    /// Rebuild history from a persisted record and the footballers it names.
    ///
    /// Ids that could not be resolved are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`GuessError::StaleView`] for an outdated ticket and
    /// [`GuessError::TargetNotLoaded`] if no target was applied first.
    pub fn apply_replay(
        &mut self,
        ticket: LoadTicket,
        record: SessionRecord,
        guessed: &[Footballer],
        today: NaiveDate,
    ) -> Result<ControllerState, GuessError> {
        self.check(ticket)?;
        let target = self
            .target
            .as_ref()
            .ok_or(GuessError::TargetNotLoaded(self.mode))?;
        let (rows, solved) = replay(self.mode, target, &record, guessed, today);
        let wrong = usize_to_u32(rows.len()).saturating_sub(u32::from(solved));
        self.rows = rows;
        self.record = record;
        self.reset_reveal(wrong);
        self.state = if solved {
            ControllerState::Solved
        } else {
            ControllerState::AwaitingGuess
        };
        Ok(self.state)
    }

    fn reset_reveal(&mut self, wrong: u32) {
        self.reveal = self.reveal_cfg.map(|cfg| RevealMeter::after(cfg, wrong));
    }

    /// Evaluate and record a guess. The session record and progress are
    /// written before this returns.
    ///
    /// # Errors
    ///
    /// Rejects guesses while loading, after a solve, and for ids already
    /// guessed today.
    pub fn submit_guess<S: KeyValueStore>(
        &mut self,
        guess: &Footballer,
        daily: &mut DailySession<S>,
        today: NaiveDate,
    ) -> Result<GuessOutcome, GuessError> {
        let target = match self.state {
            ControllerState::LoadingTarget => return Err(GuessError::TargetNotLoaded(self.mode)),
            ControllerState::Solved => return Err(GuessError::AlreadySolved(self.mode)),
            ControllerState::AwaitingGuess => self
                .target
                .as_ref()
                .ok_or(GuessError::TargetNotLoaded(self.mode))?,
        };
        if self.record.contains(guess.id) {
            return Err(GuessError::Duplicate(guess.id));
        }

        let (row, solved) = judge(self.mode, guess, target, today);
        log::debug!(
            "{} guess {} ({}) solved={solved}",
            self.mode,
            guess.id,
            guess.fullname
        );

        self.record.push_guess(guess.id);
        daily.save_record(&self.record);
        if solved {
            daily.set_progress(self.mode, ProgressStatus::Solved);
            self.state = ControllerState::Solved;
        } else {
            if let Some(meter) = self.reveal.as_mut() {
                meter.advance();
            }
            if daily.status(self.mode) == ProgressStatus::NotStarted {
                daily.set_progress(self.mode, ProgressStatus::InProgress);
            }
        }
        self.rows.insert(0, row.clone());

        Ok(GuessOutcome {
            row,
            solved,
            state: self.state,
            reveal: self.reveal.as_ref().map(RevealMeter::value),
        })
    }

    /// Status of a Silhouette hint.
    ///
    /// # Errors
    ///
    /// Returns [`HintError::Unsupported`] for modes without hints.
    pub fn hint_status(&self, hint: Hint) -> Result<HintStatus, HintError> {
        let flags = self.record.hints().ok_or(HintError::Unsupported {
            mode: self.mode,
            hint,
        })?;
        Ok(hint_status(
            hint,
            flags,
            &self.hint_cfg,
            self.wrong_guesses(),
            self.is_solved(),
        ))
    }

    /// Reveal a Silhouette hint and persist the flag. Revealing twice is a
    /// no-op; returns whether the flag changed.
    ///
    /// # Errors
    ///
    /// Returns [`HintError::Locked`] before the threshold is reached and
    /// [`HintError::Unsupported`] for modes without hints.
    pub fn reveal_hint<S: KeyValueStore>(
        &mut self,
        hint: Hint,
        daily: &DailySession<S>,
    ) -> Result<bool, HintError> {
        match self.hint_status(hint)? {
            HintStatus::Revealed => Ok(false),
            HintStatus::Locked { remaining } => Err(HintError::Locked { hint, remaining }),
            HintStatus::Available => {
                if let Some(flags) = self.record.hints_mut() {
                    hint.mark(flags);
                }
                daily.save_record(&self.record);
                log::debug!("{hint} hint revealed");
                Ok(true)
            }
        }
    }
}

fn judge(mode: GameMode, guess: &Footballer, target: &Footballer, today: NaiveDate) -> (GuessRow, bool) {
    if mode.shows_feedback() {
        let row = evaluate(guess, target, today);
        let solved = row.is_all_match();
        (row, solved)
    } else {
        (evaluate_masked(guess, today), guess.id == target.id)
    }
}

/// Rows for a persisted guess sequence, most recent first, and whether any
/// of them solved the puzzle. Evaluation stops at the first solving guess.
#[must_use]
pub fn replay(
    mode: GameMode,
    target: &Footballer,
    record: &SessionRecord,
    guessed: &[Footballer],
    today: NaiveDate,
) -> (Vec<GuessRow>, bool) {
    let mut rows = Vec::with_capacity(record.guesses().len());
    let mut solved = false;
    for id in record.guesses() {
        let Some(guess) = guessed.iter().find(|f| f.id == *id) else {
            log::warn!("{mode}: stored guess {id} could not be resolved");
            continue;
        };
        let (row, won) = judge(mode, guess, target, today);
        rows.insert(0, row);
        if won {
            solved = true;
            break;
        }
    }
    (rows, solved)
}
