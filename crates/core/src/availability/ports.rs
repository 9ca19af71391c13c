//! Availability port interfaces

use async_trait::async_trait;
use openslot_domain::{BusyInterval, Horizon, Result, TokenSet};

/// Trait for listing a user's busy intervals from a calendar provider.
///
/// Implementations return intervals ordered ascending by start time. Failure
/// mapping expected from adapters: unreachable provider -> `Network`,
/// rejected or expired credential -> `Auth`.
#[async_trait]
pub trait CalendarPort: Send + Sync {
    /// Fetch busy intervals within the horizon.
    async fn list_busy_intervals(
        &self,
        access_token: &str,
        horizon: &Horizon,
    ) -> Result<Vec<BusyInterval>>;
}

/// Trait for persisting and retrieving a user's OAuth credential.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Retrieve the stored credential. Fails with `NotFound` if the user
    /// never authorized.
    async fn get(&self, user_email: &str) -> Result<TokenSet>;

    /// Store (or replace) the credential for a user.
    async fn put(&self, user_email: &str, tokens: &TokenSet) -> Result<()>;
}
