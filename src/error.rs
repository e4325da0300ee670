//! Error types for trading, persistence and configuration.

use crate::types::{Price, Quantity, SecurityId};

/// Reasons a trade request is rejected.
///
/// Every variant is recoverable: a rejected request leaves the simulation
/// untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TradeError {
    #[error("quantity must be a positive whole number")]
    InvalidQuantity,

    #[error("insufficient cash: need {required}, have {available}")]
    InsufficientCash { required: Price, available: Price },

    #[error("you don't own enough shares: requested {requested}, held {held}")]
    InsufficientShares { requested: Quantity, held: Quantity },

    #[error("unknown security '{0}'")]
    UnknownSecurity(SecurityId),
}

/// Failures reading or writing persisted simulator state.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("corrupt persisted state: {0}")]
    CorruptPersistedState(String),

    #[error("failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid simulation parameters.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("initial_cash must be >= 0, got {0}")]
    NegativeEndowment(i64),

    #[error("price_floor must be > 0, got {0}")]
    NonPositiveFloor(i64),

    #[error("max_daily_move must be in (0.0, 1.0), got {0}")]
    MoveOutOfRange(f64),
}
