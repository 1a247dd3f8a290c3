use async_trait::async_trait;

use crate::footballer::{DailyChallenge, Footballer, FootballerId};

/// External data collaborator: today's challenge list and the footballer
/// catalog. Platform-specific implementations should provide this.
///
/// Futures are not required to be `Send`; browser fetches never are.
#[async_trait(?Send)]
pub trait FootballerProvider {
    type Error: std::error::Error + 'static;

    /// One row per mode for the current UTC day.
    ///
    /// # Errors
    ///
    /// Returns an error if the challenge list cannot be fetched.
    async fn daily_challenges(&self) -> Result<Vec<DailyChallenge>, Self::Error>;

    /// Look up a full record; `Ok(None)` when the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup itself fails.
    async fn footballer_by_id(&self, id: FootballerId) -> Result<Option<Footballer>, Self::Error>;

    /// Case-insensitive substring search on full names, in provider order,
    /// capped by the provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the search cannot be performed.
    async fn search(&self, query: &str) -> Result<Vec<Footballer>, Self::Error>;
}
