//! Application facade exposed to the page.
//!
//! [`AppCore`] holds the daily session, one controller per playable mode and
//! the data provider. It is generic over storage and provider so it runs
//! natively in tests; [`FootleApp`] binds it to `localStorage`, HTTP and JS.
use chrono::{DateTime, Utc};
use footle_game::{
    ControllerState, DailySession, FootballerProvider, FootballerRef, FootleConfig, GameMode,
    GameStore, GuessError, GuessOutcome, GuessRow, Hint, HintError, HintStatus, KeyValueStore,
    ModeController, MountOutcome, ProgressStatus, RefreshOutcome, mount, share_text,
};
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::config::CONFIG;
use crate::paths::data_base;
use crate::provider::HttpProvider;
use crate::storage::LocalStore;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("unknown or unplayable mode '{0}'")]
    UnknownMode(String),
    #[error("unknown hint '{0}'")]
    UnknownHint(String),
    #[error("footballer {0} not found")]
    UnknownFootballer(u32),
    #[error("data provider failed: {0}")]
    Provider(String),
    #[error(transparent)]
    Guess(#[from] GuessError),
    #[error(transparent)]
    Hint(#[from] HintError),
}

/// Daily progress as shown by the progress bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressView {
    pub modes: BTreeMap<GameMode, ProgressStatus>,
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HintView {
    pub hint: Hint,
    pub status: HintStatus,
}

pub struct AppCore<S, P> {
    cfg: FootleConfig,
    daily: RefCell<DailySession<S>>,
    controllers: BTreeMap<GameMode, RefCell<ModeController>>,
    provider: P,
}

impl<S, P> AppCore<S, P>
where
    S: KeyValueStore,
    P: FootballerProvider,
{
    /// Open today's session over `store`. Rolls the day over if needed.
    #[must_use]
    pub fn new(store: S, provider: P, cfg: FootleConfig, now: DateTime<Utc>) -> Self {
        let daily = DailySession::open(GameStore::new(store, &cfg.storage_prefix), now);
        let controllers = GameMode::PLAYABLE
            .into_iter()
            .filter_map(|mode| ModeController::new(mode, &cfg).map(|c| (mode, RefCell::new(c))))
            .collect();
        Self {
            cfg,
            daily: RefCell::new(daily),
            controllers,
            provider,
        }
    }

    pub const fn daily(&self) -> &RefCell<DailySession<S>> {
        &self.daily
    }

    fn controller(&self, mode: GameMode) -> Result<&RefCell<ModeController>, AppError> {
        self.controllers
            .get(&mode)
            .ok_or_else(|| AppError::UnknownMode(mode.key().to_string()))
    }

    /// Refresh today's mapping; the cached one keeps serving meanwhile.
    #[allow(clippy::future_not_send)]
    pub async fn refresh(&self) -> RefreshOutcome {
        let cached = self.daily.borrow().begin_refresh().len();
        log::debug!("refreshing daily challenges ({cached} cached)");
        let result = self.provider.daily_challenges().await;
        self.daily.borrow_mut().finish_refresh(result)
    }

    /// Load `mode`'s target and history.
    ///
    /// # Errors
    ///
    /// Returns an error for modes without a controller.
    #[allow(clippy::future_not_send)]
    pub async fn mount(&self, mode: GameMode) -> Result<MountOutcome, AppError> {
        let cell = self.controller(mode)?;
        let today = self.daily.borrow().today();
        Ok(mount(cell, &self.daily, &self.provider, today).await)
    }

    pub fn unmount(&self, mode: GameMode) {
        if let Ok(cell) = self.controller(mode) {
            cell.borrow_mut().unmount();
        }
    }

    /// Look up `id` and submit it as a guess for `mode`.
    ///
    /// # Errors
    ///
    /// Returns an error if the footballer cannot be resolved or the controller
    /// rejects the guess.
    #[allow(clippy::future_not_send)]
    pub async fn submit_guess(&self, mode: GameMode, id: u32) -> Result<GuessOutcome, AppError> {
        let cell = self.controller(mode)?;
        let guess = self
            .provider
            .footballer_by_id(id)
            .await
            .map_err(|err| AppError::Provider(err.to_string()))?
            .ok_or(AppError::UnknownFootballer(id))?;
        let mut daily = self.daily.borrow_mut();
        let today = daily.today();
        Ok(cell.borrow_mut().submit_guess(&guess, &mut *daily, today)?)
    }

    /// Search by name. With a mode, ids already guessed in it are left out.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider search fails.
    #[allow(clippy::future_not_send)]
    pub async fn search(
        &self,
        query: &str,
        mode: Option<GameMode>,
    ) -> Result<Vec<FootballerRef>, AppError> {
        let hits = self
            .provider
            .search(query)
            .await
            .map_err(|err| AppError::Provider(err.to_string()))?;
        let guessed: Vec<u32> = match mode.map(|m| self.controller(m)).transpose()? {
            Some(cell) => cell.borrow().record().guesses().to_vec(),
            None => Vec::new(),
        };
        Ok(hits
            .iter()
            .filter(|f| !guessed.contains(&f.id))
            .take(self.cfg.search_limit)
            .map(footle_game::Footballer::summary)
            .collect())
    }

    /// Guess history for `mode`, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error for modes without a controller.
    pub fn rows(&self, mode: GameMode) -> Result<Vec<GuessRow>, AppError> {
        Ok(self.controller(mode)?.borrow().rows().to_vec())
    }

    /// # Errors
    ///
    /// Returns an error for modes without a controller.
    pub fn state(&self, mode: GameMode) -> Result<ControllerState, AppError> {
        Ok(self.controller(mode)?.borrow().state())
    }

    /// Image clarity for `mode`; `None` for Classic.
    ///
    /// # Errors
    ///
    /// Returns an error for modes without a controller.
    pub fn reveal(&self, mode: GameMode) -> Result<Option<f32>, AppError> {
        Ok(self
            .controller(mode)?
            .borrow()
            .reveal()
            .map(footle_game::RevealMeter::value))
    }

    /// Status of every hint `mode` offers.
    ///
    /// # Errors
    ///
    /// Returns an error for modes without a controller.
    pub fn hints(&self, mode: GameMode) -> Result<Vec<HintView>, AppError> {
        let controller = self.controller(mode)?.borrow();
        Ok(Hint::ALL
            .into_iter()
            .filter_map(|hint| {
                controller
                    .hint_status(hint)
                    .ok()
                    .map(|status| HintView { hint, status })
            })
            .collect())
    }

    /// # Errors
    ///
    /// Returns an error if the hint is locked or not offered by `mode`.
    pub fn reveal_hint(&self, mode: GameMode, hint: Hint) -> Result<bool, AppError> {
        let daily = self.daily.borrow();
        Ok(self.controller(mode)?.borrow_mut().reveal_hint(hint, &*daily)?)
    }

    #[must_use]
    pub fn progress(&self) -> ProgressView {
        let daily = self.daily.borrow();
        ProgressView {
            modes: GameMode::PLAYABLE
                .into_iter()
                .map(|mode| (mode, daily.status(mode)))
                .collect(),
            completed: daily.completed_count(),
            total: GameMode::PLAYABLE.len(),
            percent: daily.completion_percent(),
        }
    }

    /// Share text for `mode`; `None` before the first guess.
    ///
    /// # Errors
    ///
    /// Returns an error for modes without a controller.
    pub fn share(&self, mode: GameMode) -> Result<Option<String>, AppError> {
        let controller = self.controller(mode)?.borrow();
        if controller.rows().is_empty() {
            return Ok(None);
        }
        Ok(Some(share_text(
            mode,
            controller.rows(),
            controller.is_solved(),
            &self.cfg.share_url,
        )))
    }

    /// Clear every stored key and unmount all modes.
    pub fn emergency_reset(&self, now: DateTime<Utc>) -> usize {
        for cell in self.controllers.values() {
            cell.borrow_mut().unmount();
        }
        self.daily.borrow_mut().emergency_reset(now)
    }
}

fn parse_mode(key: &str) -> Result<GameMode, JsValue> {
    GameMode::from_key(key)
        .filter(|mode| mode.is_playable())
        .ok_or_else(|| js_error(&AppError::UnknownMode(key.to_string())))
}

fn js_error(err: &AppError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(Into::into)
}

type WebCore = AppCore<LocalStore, HttpProvider>;

/// Browser entry point. Methods that touch the network return promises.
#[wasm_bindgen]
pub struct FootleApp {
    core: Rc<WebCore>,
}

#[wasm_bindgen]
impl FootleApp {
    /// Open today's session from `localStorage` with the bundled config.
    #[must_use]
    pub fn open() -> Self {
        let cfg = CONFIG.clone();
        let provider = HttpProvider::new(&data_base(), cfg.search_limit);
        Self {
            core: Rc::new(AppCore::new(LocalStore, provider, cfg, Utc::now())),
        }
    }

    /// Resolves to the refresh outcome as a string.
    pub fn refresh(&self) -> js_sys::Promise {
        let core = Rc::clone(&self.core);
        future_to_promise(async move {
            let outcome = core.refresh().await;
            Ok(JsValue::from_str(&outcome.to_string()))
        })
    }

    /// Resolves to the controller state once loaded, or `null` while the
    /// target is unavailable.
    pub fn mount(&self, mode: String) -> js_sys::Promise {
        let core = Rc::clone(&self.core);
        future_to_promise(async move {
            let mode = parse_mode(&mode)?;
            match core.mount(mode).await.map_err(|err| js_error(&err))? {
                MountOutcome::Ready(state) => to_js(&state),
                MountOutcome::Unavailable | MountOutcome::Superseded => Ok(JsValue::NULL),
            }
        })
    }

    pub fn unmount(&self, mode: String) -> Result<(), JsValue> {
        self.core.unmount(parse_mode(&mode)?);
        Ok(())
    }

    /// Resolves to `{ row, solved, state, reveal }`.
    #[wasm_bindgen(js_name = submitGuess)]
    pub fn submit_guess(&self, mode: String, id: u32) -> js_sys::Promise {
        let core = Rc::clone(&self.core);
        future_to_promise(async move {
            let mode = parse_mode(&mode)?;
            let outcome = core
                .submit_guess(mode, id)
                .await
                .map_err(|err| js_error(&err))?;
            to_js(&outcome)
        })
    }

    /// Resolves to a list of `{ id, fullname, avatar }`.
    pub fn search(&self, query: String, mode: Option<String>) -> js_sys::Promise {
        let core = Rc::clone(&self.core);
        future_to_promise(async move {
            let mode = mode.as_deref().map(parse_mode).transpose()?;
            let hits = core
                .search(&query, mode)
                .await
                .map_err(|err| js_error(&err))?;
            to_js(&hits)
        })
    }

    pub fn rows(&self, mode: String) -> Result<JsValue, JsValue> {
        let rows = self
            .core
            .rows(parse_mode(&mode)?)
            .map_err(|err| js_error(&err))?;
        to_js(&rows)
    }

    pub fn reveal(&self, mode: String) -> Result<Option<f32>, JsValue> {
        self.core
            .reveal(parse_mode(&mode)?)
            .map_err(|err| js_error(&err))
    }

    pub fn hints(&self, mode: String) -> Result<JsValue, JsValue> {
        let hints = self
            .core
            .hints(parse_mode(&mode)?)
            .map_err(|err| js_error(&err))?;
        to_js(&hints)
    }

    #[wasm_bindgen(js_name = revealHint)]
    pub fn reveal_hint(&self, mode: String, hint: String) -> Result<bool, JsValue> {
        let mode = parse_mode(&mode)?;
        let hint = Hint::from_key(&hint).ok_or_else(|| js_error(&AppError::UnknownHint(hint)))?;
        self.core
            .reveal_hint(mode, hint)
            .map_err(|err| js_error(&err))
    }

    pub fn progress(&self) -> Result<JsValue, JsValue> {
        to_js(&self.core.progress())
    }

    pub fn share(&self, mode: String) -> Result<Option<String>, JsValue> {
        self.core
            .share(parse_mode(&mode)?)
            .map_err(|err| js_error(&err))
    }

    /// Returns how many stored keys were removed.
    #[wasm_bindgen(js_name = emergencyReset)]
    pub fn emergency_reset(&self) -> usize {
        self.core.emergency_reset(Utc::now())
    }
}
