//! Simulation parameters.

use crate::error::ConfigError;
use crate::price_model::RandomWalk;
use crate::types::Price;

/// Tunable rules of the game.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Cash a fresh portfolio starts with
    pub initial_cash: i64,
    /// Lowest price any security can reach
    pub price_floor: i64,
    /// Largest fractional price move per tick
    pub max_daily_move: f64,
}

impl SimulationConfig {
    pub const DEFAULT_INITIAL_CASH: i64 = 100_000;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_cash < 0 {
            return Err(ConfigError::NegativeEndowment(self.initial_cash));
        }
        if self.price_floor <= 0 {
            return Err(ConfigError::NonPositiveFloor(self.price_floor));
        }
        if !(self.max_daily_move > 0.0 && self.max_daily_move < 1.0) {
            return Err(ConfigError::MoveOutOfRange(self.max_daily_move));
        }
        Ok(())
    }

    /// Price model described by this config.
    pub fn price_model(&self) -> RandomWalk {
        RandomWalk::new(self.max_daily_move, Price(self.price_floor))
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_cash: Self::DEFAULT_INITIAL_CASH,
            price_floor: RandomWalk::DEFAULT_FLOOR.0,
            max_daily_move: RandomWalk::DEFAULT_MAX_MOVE,
        }
    }
}
