//! Domain types shared across the gateways and the views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tradable cryptocurrency as reported by the market-data API.
/// Read-only; never persisted locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Short uppercase ticker, e.g. "BTC".
    pub symbol: String,
    pub name: String,
    /// Unit price in USD.
    pub price: f64,
    /// Signed 24h change, in percent.
    pub change_24h: Option<f64>,
    pub market_cap: Option<f64>,
    pub volume: Option<f64>,
    pub image: Option<String>,
}

/// One completed conversion. Immutable once created; deleted individually
/// or in bulk by its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionRecord {
    /// Opaque, time-derived identifier.
    pub id: String,
    /// Absent for conversions computed without persistence.
    pub owner: Option<String>,
    pub from_symbol: String,
    pub to_symbol: String,
    pub amount: f64,
    pub result: f64,
    pub rate: f64,
    pub timestamp: DateTime<Utc>,
}

/// Per-account profile. Created at registration, mutated only through the
/// favorites operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    /// Set semantics over insertion order; symbols are stored uppercase.
    pub favorites: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(uid: &str, email: &str, display_name: &str, favorites: &[&str]) -> Self {
        let now = Utc::now();
        Self {
            uid: uid.to_string(),
            email: email.to_string(),
            display_name: display_name.to_string(),
            favorites: favorites.iter().map(|s| s.to_uppercase()).collect(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Adds a favorite symbol. Idempotent: re-adding an existing symbol
    /// leaves the set unchanged and returns false.
    pub fn add_favorite(&mut self, symbol: &str) -> bool {
        let symbol = symbol.to_uppercase();
        if self.favorites.iter().any(|s| *s == symbol) {
            return false;
        }
        self.favorites.push(symbol);
        true
    }

    /// Removes a favorite symbol; returns false when it was not present.
    pub fn remove_favorite(&mut self, symbol: &str) -> bool {
        let symbol = symbol.to_uppercase();
        let before = self.favorites.len();
        self.favorites.retain(|s| *s != symbol);
        self.favorites.len() != before
    }
}

/// The currently signed-in user, mirrored from the session store. Transient:
/// lives only as long as the provider-side session does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub uid: String,
    pub email: String,
    pub display_name: String,
}
