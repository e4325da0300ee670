//! The simulation controller: validates trades, applies them, ticks prices,
//! advances the day and persists.
//!
//! One trade runs start to finish before the next is accepted:
//!
//! 1. check the quantity, look up the security and validate against the
//!    ledger
//! 2. mutate the ledger at the current (pre-tick) price
//! 3. tick every security in the catalog once
//! 4. advance the clock
//! 5. save portfolio and day
//!
//! A request that fails step 1 or 2 is rejected with no side effects at
//! all: no price moves, no new day, nothing written.

use std::fmt;

use log::{error, info, warn};

use crate::catalog::Catalog;
use crate::clock::SimulationClock;
use crate::config::SimulationConfig;
use crate::error::{ConfigError, PersistenceError, TradeError};
use crate::ledger::{Portfolio, PortfolioSnapshot};
use crate::persistence;
use crate::price_model::RandomWalk;
use crate::random::RandomSource;
use crate::side::Side;
use crate::store::KeyValueStore;
use crate::types::{Price, Quantity, SecurityId};

/// A request to trade.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TradeRequest {
    pub security: SecurityId,
    pub quantity: Quantity,
    pub side: Side,
}

impl TradeRequest {
    pub fn new(security: impl Into<SecurityId>, quantity: Quantity, side: Side) -> Self {
        Self {
            security: security.into(),
            quantity,
            side,
        }
    }

    pub fn buy(security: impl Into<SecurityId>, quantity: Quantity) -> Self {
        Self::new(security, quantity, Side::Buy)
    }

    pub fn sell(security: impl Into<SecurityId>, quantity: Quantity) -> Self {
        Self::new(security, quantity, Side::Sell)
    }
}

/// Details of an executed trade, as of just after it settled.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Execution {
    pub security: SecurityId,
    pub name: String,
    pub side: Side,
    pub quantity: Quantity,
    /// Fill price (the price before the post-trade tick)
    pub price: Price,
    /// `quantity * price`
    pub notional: i64,
    /// Cash after the trade
    pub cash: i64,
    /// Shares of this security held after the trade
    pub shares: Quantity,
    /// Average cost basis after the trade
    pub avg_cost: f64,
    /// Day after the trade
    pub day: u32,
    /// Confirmation, e.g. "Bought 10 shares of TechCorp"
    pub message: String,
}

/// Result of [`Simulation::execute_trade`].
#[derive(Clone, Debug, PartialEq)]
pub enum TradeOutcome {
    Executed(Execution),
    Rejected(TradeError),
}

impl TradeOutcome {
    pub fn is_executed(&self) -> bool {
        matches!(self, TradeOutcome::Executed(_))
    }

    pub fn execution(&self) -> Option<&Execution> {
        match self {
            TradeOutcome::Executed(execution) => Some(execution),
            TradeOutcome::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&TradeError> {
        match self {
            TradeOutcome::Executed(_) => None,
            TradeOutcome::Rejected(reason) => Some(reason),
        }
    }
}

impl fmt::Display for TradeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeOutcome::Executed(execution) => f.write_str(&execution.message),
            TradeOutcome::Rejected(reason) => write!(f, "Rejected: {reason}"),
        }
    }
}

/// Everything a session mutates.
#[derive(Clone, Debug, PartialEq)]
pub struct SimState {
    pub catalog: Catalog,
    pub portfolio: Portfolio,
    pub clock: SimulationClock,
}

impl SimState {
    /// Default catalog at seed prices, `initial_cash`, day 1.
    pub fn fresh(initial_cash: i64) -> Self {
        Self {
            catalog: Catalog::default(),
            portfolio: Portfolio::new(initial_cash),
            clock: SimulationClock::new(),
        }
    }
}

/// Owns the session state and is its only writer.
pub struct Simulation<S, R> {
    config: SimulationConfig,
    model: RandomWalk,
    state: SimState,
    store: S,
    rng: R,
}

impl<S: KeyValueStore, R: RandomSource> Simulation<S, R> {
    /// Start a session on the default catalog, restoring the portfolio and
    /// day from `store` when present.
    pub fn open(config: SimulationConfig, store: S, rng: R) -> Result<Self, ConfigError> {
        Self::with_catalog(config, Catalog::default(), store, rng)
    }

    /// Like [`Simulation::open`] with a custom catalog.
    pub fn with_catalog(
        config: SimulationConfig,
        catalog: Catalog,
        store: S,
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = match persistence::load(&store, config.initial_cash) {
            Some(mut saved) => {
                for id in saved.portfolio.discard_unpriceable(&catalog) {
                    warn!("dropped saved holding of '{id}': value does not fit in a balance");
                }
                SimState {
                    catalog,
                    portfolio: saved.portfolio,
                    clock: saved.clock,
                }
            }
            None => {
                info!("no saved state; starting with {}", Price(config.initial_cash));
                SimState {
                    catalog,
                    portfolio: Portfolio::new(config.initial_cash),
                    clock: SimulationClock::new(),
                }
            }
        };
        Ok(Self {
            model: config.price_model(),
            config,
            state,
            store,
            rng,
        })
    }

    // === Queries ===

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.state.catalog
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.state.portfolio
    }

    pub fn day(&self) -> u32 {
        self.state.clock.day()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn snapshot(&self) -> PortfolioSnapshot {
        self.state.portfolio.snapshot(&self.state.catalog)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // === Operations ===

    /// Validate and run one trade.
    pub fn execute_trade(&mut self, request: &TradeRequest) -> TradeOutcome {
        match self.apply(request) {
            Ok(execution) => {
                info!("day {}: {}", execution.day, execution.message);
                TradeOutcome::Executed(execution)
            }
            Err(reason) => {
                warn!(
                    "rejected {} {} {}: {reason}",
                    request.side, request.quantity, request.security
                );
                TradeOutcome::Rejected(reason)
            }
        }
    }

    /// Restore the starting endowment, day 1 and seed prices, and erase
    /// saved state.
    ///
    /// In-memory state is reset even if erasing the store fails.
    pub fn reset(&mut self) -> Result<(), PersistenceError> {
        self.state.portfolio = Portfolio::new(self.config.initial_cash);
        self.state.clock.reset();
        self.state.catalog.reset();
        info!("simulation reset");
        persistence::clear(&mut self.store).inspect_err(|e| {
            error!("failed to clear saved state: {e}");
        })
    }

    fn apply(&mut self, request: &TradeRequest) -> Result<Execution, TradeError> {
        let SimState {
            catalog,
            portfolio,
            clock,
        } = &mut self.state;

        if request.quantity == 0 {
            return Err(TradeError::InvalidQuantity);
        }
        let security = catalog.require(&request.security)?;
        let fill = match request.side {
            Side::Buy => portfolio.buy(security, request.quantity)?,
            Side::Sell => portfolio.sell(security, request.quantity)?,
        };
        let name = security.name().to_owned();

        self.model.tick(catalog, &mut self.rng);
        clock.advance();

        if let Err(e) = persistence::save(&mut self.store, portfolio, clock) {
            error!("failed to save state after trade: {e}");
        }

        let id = request.security.as_str();
        Ok(Execution {
            security: request.security.clone(),
            message: format!("{} {} shares of {}", request.side.verb(), fill.quantity, name),
            name,
            side: request.side,
            quantity: fill.quantity,
            price: fill.price,
            notional: fill.notional,
            cash: portfolio.cash(),
            shares: portfolio.shares(id),
            avg_cost: portfolio.avg_cost(id),
            day: clock.day(),
        })
    }
}

impl<S, R> fmt::Debug for Simulation<S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("config", &self.config)
            .field("day", &self.state.clock.day())
            .field("cash", &self.state.portfolio.cash())
            .finish_non_exhaustive()
    }
}
