//! Typed failures surfaced at the gateway boundaries.
//!
//! The application layer composes these with `anyhow` the same way the rest
//! of the crate does; the taxonomy exists so callers can react to the cases
//! that matter (missing asset keys, auth categories) instead of matching on
//! strings.

use thiserror::Error;

/// Failures from the market-data API.
#[derive(Error, Debug)]
pub enum MarketError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned HTTP {status} for {endpoint}")]
    Upstream { status: u16, endpoint: String },

    #[error("{0} not found in upstream response")]
    NotFound(String),

    #[error("failed to parse upstream response: {0}")]
    Parse(String),
}

impl MarketError {
    /// Transient failures are worth a bounded retry; missing keys and
    /// client errors are not.
    pub fn is_transient(&self) -> bool {
        match self {
            MarketError::Http(_) => true,
            MarketError::Upstream { status, .. } => *status == 429 || *status >= 500,
            MarketError::NotFound(_) | MarketError::Parse(_) => false,
        }
    }
}

/// Authentication failures, mapped to user-facing categories.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("no account exists for this email")]
    NotFound,

    #[error("wrong email or password")]
    WrongCredential,

    #[error("email is already in use")]
    AlreadyInUse,

    #[error("password is too weak (minimum {MIN_PASSWORD_LEN} characters)")]
    WeakSecret,

    #[error("malformed email address")]
    MalformedIdentifier,

    #[error("too many attempts, try again later")]
    RateLimited,

    /// The account was written but a follow-up profile write failed. The
    /// account stays usable on the next login.
    #[error("account created, but profile setup failed: {0}")]
    PartialRegistration(String),

    #[error("authentication failed: {0}")]
    Unknown(String),
}

pub const MIN_PASSWORD_LEN: usize = 6;

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::Unknown(err.to_string())
    }
}

/// Document-store failures.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage engine error: {0}")]
    Engine(#[from] fjall::Error),

    #[error("serialization error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
