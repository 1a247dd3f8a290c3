//! Named logic scenarios runnable from the command line.
use anyhow::{Result, ensure};
use chrono::Days;
use footle_game::{
    ControllerState, GameMode, Hint, HintStatus, KeyValueStore, ProgressStatus, SessionRecord,
    date_stamp, replay, share_text,
};

use crate::logic::assets::TesterAssets;
use crate::logic::policy::GuessStrategy;
use crate::logic::simulation::{SimulationConfig, SimulationSession};

pub type ScenarioFn = fn(&TesterAssets, SimulationConfig) -> Result<()>;

#[derive(Clone, Copy)]
pub struct TestScenario {
    pub key: &'static str,
    pub description: &'static str,
    pub run: ScenarioFn,
}

impl std::fmt::Debug for TestScenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestScenario")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

const SCENARIOS: [TestScenario; 7] = [
    TestScenario {
        key: "smoke",
        description: "Open a day, refresh challenges and mount every mode",
        run: smoke,
    },
    TestScenario {
        key: "classic-solver",
        description: "Consistency-filtering player solves Classic",
        run: classic_solver,
    },
    TestScenario {
        key: "pixel-reveal",
        description: "Pixel clarity grows monotonically and caps at full",
        run: pixel_reveal,
    },
    TestScenario {
        key: "silhouette-hints",
        description: "Silhouette hints unlock at their wrong-guess thresholds",
        run: silhouette_hints,
    },
    TestScenario {
        key: "daily-rollover",
        description: "Daily keys purge once per UTC day and the marker survives",
        run: daily_rollover,
    },
    TestScenario {
        key: "replay-determinism",
        description: "Rows rebuilt on reload equal the rows shown while playing",
        run: replay_determinism,
    },
    TestScenario {
        key: "search-cap",
        description: "Search is capped and case-insensitive",
        run: search_cap,
    },
];

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    SCENARIOS.iter().map(|s| (s.key, s.description)).collect()
}

#[must_use]
pub fn all_scenario_keys() -> Vec<String> {
    SCENARIOS.iter().map(|s| s.key.to_string()).collect()
}

#[must_use]
pub fn get_scenario(key: &str) -> Option<TestScenario> {
    let key = key.trim().to_ascii_lowercase();
    SCENARIOS.iter().find(|s| s.key == key).copied()
}

fn smoke(assets: &TesterAssets, config: SimulationConfig) -> Result<()> {
    let session = SimulationSession::start(assets, config)?;
    for mode in GameMode::PLAYABLE {
        let cell = session.mount(assets, mode)?;
        ensure!(
            cell.borrow().state() == ControllerState::AwaitingGuess,
            "{mode} should await a guess after mounting"
        );
        ensure!(cell.borrow().rows().is_empty(), "{mode} starts without rows");
        let mut policy = GuessStrategy::Sequential.create_policy(config.seed);
        let summary = session.play(&cell, policy.as_mut(), true, 1, |_, _| Ok(()))?;
        ensure!(
            cell.borrow().record().guesses().len() == summary.guesses(),
            "{mode} record missed a guess"
        );
        ensure!(
            session.daily().borrow().status(mode) == ProgressStatus::InProgress,
            "{mode} should be in progress after a wrong guess"
        );
    }
    let daily = session.daily().borrow();
    ensure!(daily.completion_percent() == 0, "nothing solved yet");
    ensure!(
        daily.store().last_date() == Some(date_stamp(config.at(8))),
        "day marker should be stamped on open"
    );
    Ok(())
}

fn classic_solver(assets: &TesterAssets, config: SimulationConfig) -> Result<()> {
    let session = SimulationSession::start(assets, config)?;
    let cell = session.mount(assets, GameMode::Classic)?;
    let mut policy = GuessStrategy::Consistent.create_policy(config.seed);
    let summary = session.play(
        &cell,
        policy.as_mut(),
        false,
        assets.catalog.len(),
        |_, _| Ok(()),
    )?;
    ensure!(
        summary.solved,
        "Classic unsolved after {} guesses: {}",
        summary.guesses(),
        summary.describe_tail(3)
    );
    ensure!(
        session.daily().borrow().status(GameMode::Classic) == ProgressStatus::Solved,
        "Classic progress should read solved"
    );
    let controller = cell.borrow();
    ensure!(
        controller.rows().first().is_some_and(footle_game::GuessRow::is_all_match),
        "winning row should be all green"
    );
    let text = share_text(
        GameMode::Classic,
        controller.rows(),
        true,
        &assets.config.share_url,
    );
    let header = format!("Footle Classic solved in {} tries", summary.guesses());
    ensure!(text.starts_with(&header), "unexpected share header: {text}");
    Ok(())
}

fn pixel_reveal(assets: &TesterAssets, config: SimulationConfig) -> Result<()> {
    let session = SimulationSession::start(assets, config)?;
    let cell = session.mount(assets, GameMode::Pixel)?;
    let start = cell
        .borrow()
        .reveal()
        .map(footle_game::RevealMeter::value)
        .unwrap_or_default();
    ensure!(
        (start - assets.config.pixel.start).abs() < f32::EPSILON,
        "Pixel should open at its configured clarity, got {start}"
    );

    let mut last = start;
    let mut policy = GuessStrategy::Random.create_policy(config.seed);
    session.play(&cell, policy.as_mut(), true, 12, |_, outcome| {
        let value = outcome.reveal.unwrap_or_default();
        ensure!(value >= last, "clarity dropped from {last} to {value}");
        ensure!(value <= 1.0, "clarity {value} exceeds full");
        last = value;
        Ok(())
    })?;
    ensure!(
        (last - 1.0).abs() < f32::EPSILON,
        "twelve wrong guesses should reach full clarity, got {last}"
    );
    Ok(())
}

fn silhouette_hints(assets: &TesterAssets, config: SimulationConfig) -> Result<()> {
    let session = SimulationSession::start(assets, config)?;
    let cell = session.mount(assets, GameMode::Silhouette)?;
    let hints = assets.config.hints;
    let mut policy = GuessStrategy::Random.create_policy(config.seed);

    session.play(
        &cell,
        policy.as_mut(),
        true,
        usize::try_from(hints.club_after).unwrap_or(usize::MAX),
        |controller, _| {
            let wrong = controller.wrong_guesses();
            for hint in Hint::ALL {
                let threshold = hint.threshold(&hints);
                let status = controller.hint_status(hint)?;
                let expected = if wrong >= threshold {
                    HintStatus::Available
                } else {
                    HintStatus::Locked {
                        remaining: threshold - wrong,
                    }
                };
                ensure!(
                    status == expected,
                    "{hint} after {wrong} wrong guesses: {status:?}, expected {expected:?}"
                );
            }
            Ok(())
        },
    )?;

    let daily = session.daily().borrow();
    let mut controller = cell.borrow_mut();
    ensure!(
        controller.reveal_hint(Hint::Country, &*daily)?,
        "country hint should reveal"
    );
    ensure!(
        !controller.reveal_hint(Hint::Country, &*daily)?,
        "revealing twice must be a no-op"
    );
    let stored = daily.load_record(GameMode::Silhouette);
    let flags = stored.as_ref().and_then(SessionRecord::hints).copied();
    ensure!(
        flags.is_some_and(|f| f.country_revealed && !f.club_revealed),
        "hint flags not persisted: {flags:?}"
    );
    Ok(())
}

fn daily_rollover(assets: &TesterAssets, config: SimulationConfig) -> Result<()> {
    let mut session = SimulationSession::start(assets, config)?;
    let cell = session.mount(assets, GameMode::Classic)?;
    let mut policy = GuessStrategy::Random.create_policy(config.seed);
    session.play(&cell, policy.as_mut(), true, 2, |_, _| Ok(()))?;
    drop(cell);

    let prefix = &assets.config.storage_prefix;
    let classic_key = format!("{prefix}:{}:session", GameMode::Classic.key());
    session.reload(config.at(23));
    ensure!(
        !session.daily().borrow().purged_on_open(),
        "same-day reload must not purge"
    );
    ensure!(
        session.raw().get_item(&classic_key).is_some(),
        "same-day reload lost the Classic record"
    );
    ensure!(
        session.daily().borrow().status(GameMode::Classic) == ProgressStatus::InProgress,
        "same-day reload lost progress"
    );

    let next = config
        .at(0)
        .checked_add_days(Days::new(1))
        .ok_or_else(|| anyhow::anyhow!("date overflow"))?;
    session.reload(next);
    ensure!(
        session.daily().borrow().purged_on_open(),
        "first open of a new day must purge"
    );
    ensure!(
        session.raw().get_item(&classic_key).is_none(),
        "stale Classic record survived the rollover"
    );
    ensure!(
        session.raw().get_item(&format!("{prefix}:lastDate")) == Some(date_stamp(next)),
        "day marker should move to the new day"
    );

    session.reload(next);
    ensure!(
        !session.daily().borrow().purged_on_open(),
        "second open of the new day must not purge again"
    );
    Ok(())
}

fn replay_determinism(assets: &TesterAssets, config: SimulationConfig) -> Result<()> {
    let mut session = SimulationSession::start(assets, config)?;
    for mode in GameMode::PLAYABLE {
        let cell = session.mount(assets, mode)?;
        let mut policy = GuessStrategy::Random.create_policy(config.seed ^ u64::from(mode.id()));
        session.play(&cell, policy.as_mut(), false, 8, |_, _| Ok(()))?;
        let shown = cell.borrow().rows().to_vec();
        let solved = cell.borrow().is_solved();

        session.reload(config.at(12));
        let remounted = session.mount(assets, mode)?;
        ensure!(
            remounted.borrow().rows() == shown.as_slice(),
            "{mode} rows differ after reload"
        );
        ensure!(
            remounted.borrow().is_solved() == solved,
            "{mode} solved flag differs after reload"
        );

        let target = session.target(mode)?;
        let daily = session.daily().borrow();
        let record = daily
            .load_record(mode)
            .ok_or_else(|| anyhow::anyhow!("{mode} record missing"))?;
        let guessed: Vec<_> = record
            .guesses()
            .iter()
            .filter_map(|id| assets.catalog.get(*id).cloned())
            .collect();
        let (rows, replay_solved) = replay(mode, &target, &record, &guessed, daily.today());
        ensure!(
            rows == shown && replay_solved == solved,
            "{mode} pure replay disagrees with the controller"
        );
    }
    Ok(())
}

fn search_cap(assets: &TesterAssets, _config: SimulationConfig) -> Result<()> {
    let limit = assets.config.search_limit;
    let catalog = &assets.catalog;
    for query in ["a", "e", "an"] {
        let hits = catalog.search(query, limit);
        let expected = catalog
            .footballers()
            .iter()
            .filter(|f| f.fullname.to_lowercase().contains(query))
            .count()
            .min(limit);
        ensure!(
            hits.len() == expected,
            "'{query}' returned {} hits, expected {expected}",
            hits.len()
        );
        let shouted = catalog.search(&format!("  {}  ", query.to_uppercase()), limit);
        ensure!(hits == shouted, "search for '{query}' is case or space sensitive");
    }
    ensure!(catalog.search("   ", limit).is_empty(), "blank query must return nothing");
    ensure!(
        catalog.search("a", 1).len() <= 1,
        "limit of one must be honoured"
    );
    Ok(())
}
