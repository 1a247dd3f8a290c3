use serde::{Deserialize, Serialize};

use crate::config::RevealCfg;
use crate::numbers::clamp_unit_f32;

/// Image clarity for the Pixel and Silhouette modes.
///
/// The value is derived from the wrong-guess count rather than accumulated,
/// so a replayed session lands on exactly the same value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevealMeter {
    start: f32,
    step: f32,
    wrong_guesses: u32,
}

impl RevealMeter {
    #[must_use]
    pub const fn new(cfg: RevealCfg) -> Self {
        Self::after(cfg, 0)
    }

    #[must_use]
    pub const fn after(cfg: RevealCfg, wrong_guesses: u32) -> Self {
        Self {
            start: cfg.start,
            step: cfg.step,
            wrong_guesses,
        }
    }

    /// Current clarity in `[0, 1]`.
    #[must_use]
    pub fn value(&self) -> f32 {
        let raw = f64::from(self.step).mul_add(f64::from(self.wrong_guesses), f64::from(self.start));
        clamp_unit_f32(raw)
    }

    pub const fn advance(&mut self) {
        self.wrong_guesses = self.wrong_guesses.saturating_add(1);
    }

    #[must_use]
    pub const fn wrong_guesses(&self) -> u32 {
        self.wrong_guesses
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.value() >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIXEL: RevealCfg = RevealCfg {
        start: 0.1,
        step: 0.2,
    };

    #[test]
    fn grows_per_wrong_guess_and_caps() {
        let mut meter = RevealMeter::new(PIXEL);
        assert!((meter.value() - 0.1).abs() < 1e-6);
        meter.advance();
        assert!((meter.value() - 0.3).abs() < 1e-6);
        let mut last = meter.value();
        for _ in 0..10 {
            meter.advance();
            assert!(meter.value() >= last);
            last = meter.value();
        }
        assert!((meter.value() - 1.0).abs() < f32::EPSILON);
        assert!(meter.is_full());
    }

    #[test]
    fn replayed_meter_matches_incremental() {
        let mut stepped = RevealMeter::new(RevealCfg {
            start: 0.4,
            step: 0.08,
        });
        for _ in 0..5 {
            stepped.advance();
        }
        let replayed = RevealMeter::after(
            RevealCfg {
                start: 0.4,
                step: 0.08,
            },
            5,
        );
        assert_eq!(stepped, replayed);
        assert!((replayed.value() - 0.8).abs() < 1e-6);
    }
}
