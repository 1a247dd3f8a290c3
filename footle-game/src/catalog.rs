//! In-memory footballer catalog and an offline provider built on it.
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

use crate::footballer::{DailyChallenge, Footballer, FootballerId};
use crate::provider::FootballerProvider;
use crate::schedule::daily_challenges_for;

/// Ordered list of footballers as published by the data source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    footballers: Vec<Footballer>,
}

impl Catalog {
    #[must_use]
    pub const fn new(footballers: Vec<Footballer>) -> Self {
        Self { footballers }
    }

    /// Load a catalog from a JSON array of footballers.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into footballer records.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn get(&self, id: FootballerId) -> Option<&Footballer> {
        self.footballers.iter().find(|f| f.id == id)
    }

    #[must_use]
    pub fn footballers(&self) -> &[Footballer] {
        &self.footballers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.footballers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.footballers.is_empty()
    }

    /// Case-insensitive substring match on `fullname`, catalog order, at most
    /// `limit` results. A blank query matches nothing.
    #[must_use]
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Footballer> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.footballers
            .iter()
            .filter(|f| f.fullname.to_lowercase().contains(&needle))
            .take(limit)
            .collect()
    }
}

/// Where a [`CatalogProvider`] gets today's challenge list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeSource {
    Fixed(Vec<DailyChallenge>),
    /// Derived from the date through the deterministic schedule.
    Scheduled { date: NaiveDate, salt: u64 },
}

/// Offline [`FootballerProvider`] over a [`Catalog`].
#[derive(Debug, Clone)]
pub struct CatalogProvider {
    catalog: Catalog,
    challenges: ChallengeSource,
    search_limit: usize,
}

impl CatalogProvider {
    #[must_use]
    pub const fn new(catalog: Catalog, challenges: ChallengeSource, search_limit: usize) -> Self {
        Self {
            catalog,
            challenges,
            search_limit,
        }
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn set_challenges(&mut self, challenges: ChallengeSource) {
        self.challenges = challenges;
    }

    fn rows(&self) -> Vec<DailyChallenge> {
        match &self.challenges {
            ChallengeSource::Fixed(rows) => rows.clone(),
            ChallengeSource::Scheduled { date, salt } => {
                daily_challenges_for(*date, &self.catalog, *salt).to_rows()
            }
        }
    }
}

#[async_trait(?Send)]
impl FootballerProvider for CatalogProvider {
    type Error = Infallible;

    async fn daily_challenges(&self) -> Result<Vec<DailyChallenge>, Self::Error> {
        Ok(self.rows())
    }

    async fn footballer_by_id(&self, id: FootballerId) -> Result<Option<Footballer>, Self::Error> {
        Ok(self.catalog.get(id).cloned())
    }

    async fn search(&self, query: &str) -> Result<Vec<Footballer>, Self::Error> {
        Ok(self
            .catalog
            .search(query, self.search_limit)
            .into_iter()
            .cloned()
            .collect())
    }
}
