//! Core business logic abstractions

pub mod accounts;
pub mod asset;
pub mod cache;
pub mod config;
pub mod convert;
pub mod error;
pub mod log;
pub mod market;
pub mod symbols;

// Re-export main types for cleaner imports
pub use accounts::{AccountService, ConversionLedger, ProfileStore};
pub use asset::{Asset, ConversionRecord, Session, UserProfile};
pub use convert::{ConversionOutcome, Converter};
pub use error::{AuthError, MarketError, StoreError};
pub use market::{MarketChart, MarketDataProvider};
