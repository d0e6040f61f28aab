//! Account, profile and conversion-ledger abstractions.
//!
//! These are the seams where the local document-store implementation plugs
//! in (see `store::accounts`); a remote account backend would implement the
//! same traits.

use crate::core::asset::{ConversionRecord, Session, UserProfile};
use crate::core::error::{AuthError, StoreError};
use async_trait::async_trait;

/// Owner key used for favorites/history when nobody is signed in.
pub const ANON_OWNER: &str = "anon";

/// Favorites every new profile starts with.
pub const DEFAULT_FAVORITES: &[&str] = &["BTC", "ETH"];

#[async_trait]
pub trait AccountService: Send + Sync {
    /// Creates an account plus its profile and signs the user in.
    async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Session, AuthError>;

    /// Verifies credentials and signs the user in. The profile's display
    /// name takes precedence over the account record's when both exist.
    async fn authenticate(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Clears the current session.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// The signed-in user, if any.
    async fn current_session(&self) -> Result<Option<Session>, AuthError>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn profile(&self, uid: &str) -> Result<Option<UserProfile>, StoreError>;

    /// Full replace of the favorites set; bumps `updated_at`.
    async fn write_favorites(&self, uid: &str, favorites: &[String]) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ConversionLedger: Send + Sync {
    /// All records for `owner`, newest first.
    async fn list(&self, owner: &str) -> Result<Vec<ConversionRecord>, StoreError>;

    async fn save(&self, record: &ConversionRecord) -> Result<(), StoreError>;

    async fn delete(&self, owner: &str, id: &str) -> Result<(), StoreError>;

    /// Deletes every record for `owner`. Individual deletes are fanned out
    /// and awaited together; any failure is reported to the caller.
    async fn clear(&self, owner: &str) -> Result<(), StoreError>;
}
