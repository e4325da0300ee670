//! # stocksim
//!
//! A portfolio simulation engine for learning to invest with virtual cash.
//!
//! A learner starts with a cash endowment and trades a fixed catalog of
//! synthetic securities. Every executed trade is one simulated day: after
//! the trade settles, every security's price takes one random-walk step
//! and the day counter moves forward.
//!
//! ## Features
//!
//! - **Average-cost accounting**: buys re-weight the cost basis, sells keep it
//! - **Bounded random walk**: ±5% per tick, whole-unit prices, floor at 100
//! - **Injectable randomness**: swap in a seeded or scripted [`RandomSource`]
//! - **Forgiving persistence**: partial or legacy saved state loads with defaults
//! - **Side-effect-free rejections**: a refused trade changes nothing
//!
//! ## Quick Start
//!
//! ```
//! use stocksim::{MemoryStore, SequenceRandom, Simulation, SimulationConfig, TradeRequest};
//!
//! // 0.5 is the midpoint draw: prices stay put
//! let mut sim = Simulation::open(
//!     SimulationConfig::default(),
//!     MemoryStore::new(),
//!     SequenceRandom::constant(0.5),
//! )
//! .unwrap();
//!
//! let outcome = sim.execute_trade(&TradeRequest::buy("techcorp", 10));
//! assert_eq!(outcome.to_string(), "Bought 10 shares of TechCorp");
//! assert_eq!(sim.portfolio().cash(), 95_000);
//! assert_eq!(sim.day(), 2);
//! ```
//!
//! ## Rejections
//!
//! ```
//! use stocksim::{MemoryStore, SequenceRandom, Simulation, SimulationConfig, TradeError, TradeRequest};
//!
//! let mut sim = Simulation::open(
//!     SimulationConfig::default(),
//!     MemoryStore::new(),
//!     SequenceRandom::constant(0.5),
//! )
//! .unwrap();
//!
//! let outcome = sim.execute_trade(&TradeRequest::sell("techcorp", 1));
//! assert_eq!(
//!     outcome.rejection(),
//!     Some(&TradeError::InsufficientShares { requested: 1, held: 0 })
//! );
//! assert_eq!(sim.day(), 1); // nothing happened
//! ```

pub mod catalog;
pub mod clock;
pub mod config;
mod error;
pub mod ledger;
pub mod persistence;
pub mod price_model;
pub mod random;
mod side;
pub mod simulation;
pub mod store;
mod types;

// Re-export public API
pub use catalog::{Catalog, Security};
pub use clock::SimulationClock;
pub use config::SimulationConfig;
pub use error::{ConfigError, PersistenceError, TradeError};
pub use ledger::{Fill, Holding, Portfolio, PortfolioSnapshot};
pub use persistence::SavedState;
pub use price_model::RandomWalk;
pub use random::{RandomSource, SequenceRandom, StdRandom};
pub use side::Side;
pub use simulation::{Execution, SimState, Simulation, TradeOutcome, TradeRequest};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use types::{Price, Quantity, SecurityId};
