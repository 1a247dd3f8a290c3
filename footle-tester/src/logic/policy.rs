use std::fmt;

use chrono::NaiveDate;
use footle_game::{Catalog, Footballer, FootballerId, GuessRow, evaluate};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;

/// What a policy may look at before picking its next guess.
#[derive(Debug, Clone, Copy)]
pub struct GuessView<'a> {
    pub catalog: &'a Catalog,
    /// Rows shown so far, most recent first.
    pub rows: &'a [GuessRow],
    pub guessed: &'a [FootballerId],
    pub today: NaiveDate,
    /// Never pick this id; scenarios use it to force wrong guesses.
    pub avoid: Option<FootballerId>,
}

impl GuessView<'_> {
    fn open_candidates(&self) -> Vec<&Footballer> {
        self.catalog
            .footballers()
            .iter()
            .filter(|f| !self.guessed.contains(&f.id) && Some(f.id) != self.avoid)
            .collect()
    }
}

/// Guess chosen by a [`GuessPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDecision {
    pub id: FootballerId,
    pub rationale: Option<String>,
}

impl PolicyDecision {
    #[must_use]
    pub const fn new(id: FootballerId, rationale: Option<String>) -> Self {
        Self { id, rationale }
    }
}

/// Automated player. `None` means every candidate has been tried.
pub trait GuessPolicy {
    fn name(&self) -> &'static str;

    fn pick(&mut self, view: &GuessView<'_>) -> Option<PolicyDecision>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GuessStrategy {
    /// Catalog order.
    Sequential,
    /// Uniform over untried footballers.
    Random,
    /// Only footballers that would have produced every row seen so far.
    Consistent,
}

impl GuessStrategy {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sequential => "Sequential",
            Self::Random => "Random",
            Self::Consistent => "Consistent",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn GuessPolicy + Send> {
        match self {
            Self::Sequential => Box::new(SequentialPolicy),
            Self::Random => Box::new(RandomPolicy::new(seed)),
            Self::Consistent => Box::new(ConsistentPolicy::new(seed)),
        }
    }
}

impl fmt::Display for GuessStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct SequentialPolicy;

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

struct ConsistentPolicy {
    rng: ChaCha20Rng,
}

impl ConsistentPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl GuessPolicy for SequentialPolicy {
    fn name(&self) -> &'static str {
        "Sequential"
    }

    fn pick(&mut self, view: &GuessView<'_>) -> Option<PolicyDecision> {
        let next = view.open_candidates().first()?.id;
        Some(PolicyDecision::new(next, None))
    }
}

impl GuessPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn pick(&mut self, view: &GuessView<'_>) -> Option<PolicyDecision> {
        let open = view.open_candidates();
        let choice = open.choose(&mut self.rng)?;
        Some(PolicyDecision::new(
            choice.id,
            Some(format!("1 of {}", open.len())),
        ))
    }
}

impl GuessPolicy for ConsistentPolicy {
    fn name(&self) -> &'static str {
        "Consistent"
    }

    fn pick(&mut self, view: &GuessView<'_>) -> Option<PolicyDecision> {
        let open = view.open_candidates();
        let consistent: Vec<&Footballer> = open
            .iter()
            .copied()
            .filter(|candidate| explains_rows(view, candidate))
            .collect();
        if let Some(choice) = consistent.choose(&mut self.rng) {
            return Some(PolicyDecision::new(
                choice.id,
                Some(format!("{} consistent of {}", consistent.len(), open.len())),
            ));
        }
        // masked rows carry no information, so nothing narrows
        let choice = open.choose(&mut self.rng)?;
        Some(PolicyDecision::new(
            choice.id,
            Some("no consistent candidate".to_string()),
        ))
    }
}

/// Whether `candidate` as the target would have produced every row seen.
fn explains_rows(view: &GuessView<'_>, candidate: &Footballer) -> bool {
    view.rows.iter().all(|row| {
        view.catalog
            .get(row.footballer.id)
            .is_some_and(|guess| evaluate(guess, candidate, view.today).cells == row.cells)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::from_json(include_str!("../../../footle-web/static/data/footballers.json"))
            .unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
    }

    #[test]
    fn sequential_skips_tried_and_avoided_ids() {
        let catalog = catalog();
        let view = GuessView {
            catalog: &catalog,
            rows: &[],
            guessed: &[1, 3],
            today: today(),
            avoid: Some(2),
        };
        let mut policy = GuessStrategy::Sequential.create_policy(0);
        assert_eq!(policy.pick(&view).map(|d| d.id), Some(4));
    }

    #[test]
    fn random_policy_is_seeded() {
        let catalog = catalog();
        let view = GuessView {
            catalog: &catalog,
            rows: &[],
            guessed: &[],
            today: today(),
            avoid: None,
        };
        let a = GuessStrategy::Random.create_policy(9).pick(&view);
        let b = GuessStrategy::Random.create_policy(9).pick(&view);
        assert_eq!(a, b);
    }

    #[test]
    fn consistent_policy_keeps_the_target_in_play() {
        let catalog = catalog();
        let target = catalog.get(7).unwrap();
        let rows: Vec<GuessRow> = [1, 22]
            .iter()
            .rev()
            .map(|id| evaluate(catalog.get(*id).unwrap(), target, today()))
            .collect();
        let view = GuessView {
            catalog: &catalog,
            rows: &rows,
            guessed: &[1, 22],
            today: today(),
            avoid: None,
        };
        assert!(explains_rows(&view, target));
        assert!(!explains_rows(&view, catalog.get(1).unwrap()));

        let mut policy = GuessStrategy::Consistent.create_policy(3);
        let pick = policy.pick(&view).unwrap();
        assert!(explains_rows(&view, catalog.get(pick.id).unwrap()));
    }

    #[test]
    fn exhausted_catalog_yields_nothing() {
        let catalog = catalog();
        let all: Vec<FootballerId> = catalog.footballers().iter().map(|f| f.id).collect();
        let view = GuessView {
            catalog: &catalog,
            rows: &[],
            guessed: &all,
            today: today(),
            avoid: None,
        };
        for strategy in [
            GuessStrategy::Sequential,
            GuessStrategy::Random,
            GuessStrategy::Consistent,
        ] {
            assert!(strategy.create_policy(1).pick(&view).is_none());
        }
    }
}
