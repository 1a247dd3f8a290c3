//! Deterministic daily target selection for offline catalogs.
//!
//! The same date, catalog and salt always produce the same challenge list, so
//! the tester and offline builds agree without a backend.
use chrono::NaiveDate;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;

use crate::catalog::Catalog;
use crate::constants::{DATE_STAMP_FORMAT, SCHEDULE_DOMAIN};
use crate::footballer::{DailyChallenges, GameMode};

/// 64-bit FNV-1a.
#[must_use]
pub fn fnv1a64(bytes: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;
    let mut hash = FNV_OFFSET;
    for b in bytes {
        hash = (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Domain-separated seed for a calendar day.
#[must_use]
pub fn day_seed(date: NaiveDate, salt: u64) -> u64 {
    let stamp = date.format(DATE_STAMP_FORMAT).to_string();
    let mut buf = Vec::with_capacity(SCHEDULE_DOMAIN.len() + stamp.len() + 8);
    buf.extend_from_slice(SCHEDULE_DOMAIN);
    buf.extend_from_slice(stamp.as_bytes());
    buf.extend_from_slice(&salt.to_le_bytes());
    fnv1a64(&buf)
}

/// Pick a distinct footballer for every playable mode.
///
/// Catalogs with fewer entries than playable modes leave the trailing modes
/// without a target.
#[must_use]
pub fn daily_challenges_for(date: NaiveDate, catalog: &Catalog, salt: u64) -> DailyChallenges {
    let mut rng = ChaCha20Rng::seed_from_u64(day_seed(date, salt));
    let picks: Vec<_> = catalog
        .footballers()
        .choose_multiple(&mut rng, GameMode::PLAYABLE.len())
        .map(|f| f.id)
        .collect();
    let mut challenges = DailyChallenges::default();
    for (mode, id) in GameMode::PLAYABLE.into_iter().zip(picks) {
        challenges.insert(mode, id);
    }
    challenges
}
