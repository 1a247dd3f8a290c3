use anyhow::{Context, Result, anyhow, ensure};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use footle_game::{
    CatalogProvider, ChallengeSource, DailySession, Footballer, FootballerId, GameMode, GameStore,
    GuessOutcome, GuessRow, MemoryStore, ModeController, MountOutcome, RefreshOutcome, mount,
};
use futures::executor::block_on;
use std::cell::RefCell;

use crate::logic::assets::TesterAssets;
use crate::logic::policy::{GuessPolicy, GuessView, PolicyDecision};

/// Identity of one simulated run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationConfig {
    pub date: NaiveDate,
    /// Salt for the day's schedule; varies the targets between runs.
    pub seed: u64,
}

impl SimulationConfig {
    #[must_use]
    pub const fn new(date: NaiveDate, seed: u64) -> Self {
        Self { date, seed }
    }

    /// A moment on the simulated day, `hours` after midnight UTC.
    #[must_use]
    pub fn at(&self, hours: u32) -> DateTime<Utc> {
        let time = NaiveTime::from_hms_opt(hours.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
        self.date.and_time(time).and_utc()
    }
}

/// One guess as played by a policy.
#[derive(Debug, Clone)]
pub struct DecisionRecord {
    pub guess: FootballerId,
    pub policy_name: &'static str,
    pub rationale: Option<String>,
}

/// What a [`SimulationSession::play`] loop did.
#[derive(Debug, Clone, Default)]
pub struct PlaySummary {
    pub decisions: Vec<DecisionRecord>,
    pub solved: bool,
}

impl PlaySummary {
    #[must_use]
    pub fn guesses(&self) -> usize {
        self.decisions.len()
    }

    /// The last few decisions, newest first, for failure messages.
    #[must_use]
    pub fn describe_tail(&self, count: usize) -> String {
        if self.decisions.is_empty() {
            return "no guesses recorded".to_string();
        }
        self.decisions
            .iter()
            .rev()
            .take(count)
            .map(|d| {
                format!(
                    "{} [{}] {}",
                    d.guess,
                    d.policy_name,
                    d.rationale.as_deref().unwrap_or("-")
                )
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// A simulated browser profile: one store, one provider, one open day.
pub struct SimulationSession {
    raw: MemoryStore,
    provider: CatalogProvider,
    prefix: String,
    daily: RefCell<DailySession<MemoryStore>>,
}

impl SimulationSession {
    /// Open the day at 08:00 UTC on a fresh store and fetch its challenges.
    pub fn start(assets: &TesterAssets, config: SimulationConfig) -> Result<Self> {
        let raw = MemoryStore::new();
        let provider = CatalogProvider::new(
            assets.catalog.clone(),
            ChallengeSource::Scheduled {
                date: config.date,
                salt: config.seed,
            },
            assets.config.search_limit,
        );
        let prefix = assets.config.storage_prefix.clone();
        let daily = DailySession::open(GameStore::new(raw.clone(), &prefix), config.at(8));
        let session = Self {
            raw,
            provider,
            prefix,
            daily: RefCell::new(daily),
        };
        let outcome = block_on(session.daily.borrow_mut().refresh_challenges(&session.provider));
        ensure!(
            outcome == RefreshOutcome::Refreshed,
            "challenge refresh reported {outcome}"
        );
        Ok(session)
    }

    #[must_use]
    pub const fn raw(&self) -> &MemoryStore {
        &self.raw
    }

    #[must_use]
    pub const fn daily(&self) -> &RefCell<DailySession<MemoryStore>> {
        &self.daily
    }

    /// Replace the open session with one opened at `now` over the same store,
    /// as a page reload would.
    pub fn reload(&mut self, now: DateTime<Utc>) {
        let daily = DailySession::open(GameStore::new(self.raw.clone(), &self.prefix), now);
        self.daily = RefCell::new(daily);
    }

    pub fn target(&self, mode: GameMode) -> Result<Footballer> {
        let id = self
            .daily
            .borrow()
            .target_id(mode)
            .with_context(|| format!("no {mode} target scheduled"))?;
        self.provider
            .catalog()
            .get(id)
            .cloned()
            .with_context(|| format!("{mode} target {id} missing from catalog"))
    }

    /// A mounted controller for `mode`.
    pub fn mount(&self, assets: &TesterAssets, mode: GameMode) -> Result<RefCell<ModeController>> {
        let cell = RefCell::new(
            ModeController::new(mode, &assets.config)
                .ok_or_else(|| anyhow!("{mode} is not playable"))?,
        );
        let today = self.daily.borrow().today();
        match block_on(mount(&cell, &self.daily, &self.provider, today)) {
            MountOutcome::Ready(_) => Ok(cell),
            other => Err(anyhow!("{mode} mount ended with {other:?}")),
        }
    }

    /// Let `policy` guess until solved, out of candidates, or `max_guesses`.
    /// `observe` sees the controller after every accepted guess.
    pub fn play(
        &self,
        cell: &RefCell<ModeController>,
        policy: &mut dyn GuessPolicy,
        avoid_target: bool,
        max_guesses: usize,
        mut observe: impl FnMut(&ModeController, &GuessOutcome) -> Result<()>,
    ) -> Result<PlaySummary> {
        let mode = cell.borrow().mode();
        let avoid = if avoid_target {
            Some(self.target(mode)?.id)
        } else {
            None
        };
        let today = self.daily.borrow().today();
        let mut summary = PlaySummary::default();

        while summary.guesses() < max_guesses && !cell.borrow().is_solved() {
            let decision = {
                let controller = cell.borrow();
                let rows: Vec<GuessRow> = controller.rows().to_vec();
                let view = GuessView {
                    catalog: self.provider.catalog(),
                    rows: &rows,
                    guessed: controller.record().guesses(),
                    today,
                    avoid,
                };
                policy.pick(&view)
            };
            let Some(PolicyDecision { id, rationale }) = decision else {
                break;
            };
            let guess = self
                .provider
                .catalog()
                .get(id)
                .cloned()
                .with_context(|| format!("policy picked unknown id {id}"))?;
            let outcome = cell
                .borrow_mut()
                .submit_guess(&guess, &mut *self.daily.borrow_mut(), today)
                .with_context(|| format!("{mode}: guess {id} rejected"))?;
            observe(&cell.borrow(), &outcome)?;
            log::debug!(
                "{mode}: {} guessed {} ({})",
                policy.name(),
                guess.fullname,
                rationale.as_deref().unwrap_or("-")
            );
            summary.solved = outcome.solved;
            summary.decisions.push(DecisionRecord {
                guess: id,
                policy_name: policy.name(),
                rationale,
            });
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::policy::GuessStrategy;

    fn config() -> SimulationConfig {
        SimulationConfig::new(NaiveDate::from_ymd_opt(2025, 8, 9).unwrap(), 1337)
    }

    #[test]
    fn start_schedules_every_playable_mode() {
        let assets = TesterAssets::load_default().unwrap();
        let session = SimulationSession::start(&assets, config()).unwrap();
        for mode in GameMode::PLAYABLE {
            assert!(session.target(mode).is_ok());
        }
        assert!(session.target(GameMode::Emoji).is_err());
        assert_eq!(config().at(30).to_rfc3339(), "2025-08-09T23:00:00+00:00");
    }

    #[test]
    fn sequential_play_solves_pixel_within_catalog() {
        let assets = TesterAssets::load_default().unwrap();
        let session = SimulationSession::start(&assets, config()).unwrap();
        let cell = session.mount(&assets, GameMode::Pixel).unwrap();
        let mut policy = GuessStrategy::Sequential.create_policy(0);
        let mut seen = 0;
        let summary = session
            .play(&cell, policy.as_mut(), false, 64, |_, _| {
                seen += 1;
                Ok(())
            })
            .unwrap();
        assert!(summary.solved);
        assert_eq!(seen, summary.guesses());
        assert!(summary.describe_tail(2).contains("[Sequential]"));
        assert_eq!(
            summary.decisions.last().map(|d| d.guess),
            Some(session.target(GameMode::Pixel).unwrap().id)
        );
    }

    #[test]
    fn avoiding_the_target_never_solves() {
        let assets = TesterAssets::load_default().unwrap();
        let session = SimulationSession::start(&assets, config()).unwrap();
        let cell = session.mount(&assets, GameMode::Pixel).unwrap();
        let mut policy = GuessStrategy::Random.create_policy(5);
        let summary = session
            .play(&cell, policy.as_mut(), true, 64, |_, _| Ok(()))
            .unwrap();
        assert!(!summary.solved);
        assert_eq!(summary.guesses(), assets.catalog.len() - 1);
    }
}
