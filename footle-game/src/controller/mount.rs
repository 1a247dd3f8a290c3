use chrono::NaiveDate;
use std::cell::RefCell;

use super::{ControllerState, ModeController};
use crate::daily::{DailySession, ProgressStatus};
use crate::footballer::Footballer;
use crate::provider::FootballerProvider;
use crate::storage::KeyValueStore;

/// How a mount ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    Ready(ControllerState),
    /// No target for today yet, or the provider could not supply it. The
    /// controller stays in `LoadingTarget`.
    Unavailable,
    /// A newer load or an unmount happened while this one was awaiting.
    Superseded,
}

/// Load today's target and stored history into `cell`.
///
/// No borrow of `cell` or `daily` is held across an await, so guesses and
/// unmounts can interleave; each resumption re-checks its ticket.
pub async fn mount<S, P>(
    cell: &RefCell<ModeController>,
    daily: &RefCell<DailySession<S>>,
    provider: &P,
    today: NaiveDate,
) -> MountOutcome
where
    S: KeyValueStore,
    P: FootballerProvider + ?Sized,
{
    let ticket = cell.borrow_mut().begin_load();
    let mode = ticket.mode();

    let Some(target_id) = daily.borrow().target_id(mode) else {
        log::info!("{mode}: no target for today yet");
        return MountOutcome::Unavailable;
    };
    let target = match provider.footballer_by_id(target_id).await {
        Ok(Some(target)) => target,
        Ok(None) => {
            log::warn!("{mode}: target {target_id} is not in the catalog");
            return MountOutcome::Unavailable;
        }
        Err(err) => {
            log::warn!("{mode}: target lookup failed: {err}");
            return MountOutcome::Unavailable;
        }
    };
    if !cell.borrow().is_current(ticket) {
        return MountOutcome::Superseded;
    }

    let Some(record) = daily.borrow().load_record(mode) else {
        return MountOutcome::Unavailable;
    };
    let mut guessed: Vec<Footballer> = Vec::with_capacity(record.guesses().len());
    for id in record.guesses() {
        match provider.footballer_by_id(*id).await {
            Ok(Some(footballer)) => guessed.push(footballer),
            Ok(None) => log::warn!("{mode}: stored guess {id} is not in the catalog"),
            Err(err) => log::warn!("{mode}: lookup of stored guess {id} failed: {err}"),
        }
        if !cell.borrow().is_current(ticket) {
            return MountOutcome::Superseded;
        }
    }

    // Target and history land together so no guess can slip in between.
    let state = {
        let mut controller = cell.borrow_mut();
        if controller.apply_target(ticket, target).is_err() {
            return MountOutcome::Superseded;
        }
        match controller.apply_replay(ticket, record, &guessed, today) {
            Ok(state) => state,
            Err(_) => return MountOutcome::Superseded,
        }
    };

    if state == ControllerState::Solved {
        let mut daily = daily.borrow_mut();
        if !daily.status(mode).is_solved() {
            daily.set_progress(mode, ProgressStatus::Solved);
        }
    }
    log::debug!("{mode}: mounted in state {state:?}");
    MountOutcome::Ready(state)
}
