//! Bounded random-walk price evolution.
//!
//! Each tick draws a move uniformly from `[-max_move, +max_move]`, applies
//! it to the current price, rounds to a whole unit and clamps at the floor.

use log::debug;

use crate::catalog::{Catalog, Security};
use crate::random::RandomSource;
use crate::types::Price;

/// Random-walk parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomWalk {
    /// Largest fractional move per tick (0.05 = 5%)
    pub max_move: f64,
    /// Prices never drop below this
    pub floor: Price,
}

impl RandomWalk {
    pub const DEFAULT_MAX_MOVE: f64 = 0.05;
    pub const DEFAULT_FLOOR: Price = Price(100);

    pub fn new(max_move: f64, floor: Price) -> Self {
        Self { max_move, floor }
    }

    /// Price after applying `delta` (a fraction) to `current`.
    pub fn next_price(&self, current: Price, delta: f64) -> Price {
        let candidate = current.as_f64() * (1.0 + delta);
        Price((candidate.round() as i64).max(self.floor.0))
    }

    /// Move one security by a single random draw.
    pub fn advance(&self, security: &mut Security, rng: &mut impl RandomSource) {
        let delta = (rng.next_unit() * 2.0 - 1.0) * self.max_move;
        let price = self.next_price(security.price(), delta);
        security.record_tick(price, delta * 100.0);
    }

    /// Advance every security in catalog order, one draw each.
    pub fn tick(&self, catalog: &mut Catalog, rng: &mut impl RandomSource) {
        for security in catalog.iter_mut() {
            self.advance(security, rng);
        }
        debug!(
            "tick: {}",
            catalog
                .iter()
                .map(|s| format!("{}={}", s.id(), s.price().0))
                .collect::<Vec<_>>()
                .join(" ")
        );
    }
}

impl Default for RandomWalk {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_MOVE, Self::DEFAULT_FLOOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SequenceRandom;

    fn one(price: i64) -> Catalog {
        Catalog::from_listings([("x", "X", price)])
    }

    #[test]
    fn midpoint_draw_leaves_price_unchanged() {
        let mut catalog = one(500);
        let mut rng = SequenceRandom::constant(0.5);
        RandomWalk::default().tick(&mut catalog, &mut rng);

        let x = catalog.get("x").unwrap();
        assert_eq!(x.price(), Price(500));
        assert_eq!(x.history(), &[Price(500), Price(500)]);
        assert_eq!(x.change_pct(), 0.0);
    }

    #[test]
    fn extreme_draws_stay_within_band() {
        let walk = RandomWalk::default();

        let mut catalog = one(1000);
        walk.tick(&mut catalog, &mut SequenceRandom::constant(0.0));
        let x = catalog.get("x").unwrap();
        assert_eq!(x.price(), Price(950));
        assert!((x.change_pct() + 5.0).abs() < 1e-9);

        let mut catalog = one(1000);
        walk.tick(&mut catalog, &mut SequenceRandom::constant(0.999_999));
        assert_eq!(catalog.get("x").unwrap().price(), Price(1050));
    }

    #[test]
    fn rounds_to_whole_units() {
        let walk = RandomWalk::default();
        // 333 * 1.03 = 342.99
        assert_eq!(walk.next_price(Price(333), 0.03), Price(343));
        // 400 * 0.9874 = 394.96
        assert_eq!(walk.next_price(Price(400), -0.0126), Price(395));
    }

    #[test]
    fn floor_clamps() {
        let mut catalog = one(101);
        let mut rng = SequenceRandom::constant(0.0);
        RandomWalk::default().tick(&mut catalog, &mut rng);
        assert_eq!(catalog.get("x").unwrap().price(), Price(100));
    }

    #[test]
    fn tick_moves_every_security_once() {
        let mut catalog = Catalog::default();
        let mut rng = SequenceRandom::new([0.1, 0.7, 0.4]);
        RandomWalk::default().tick(&mut catalog, &mut rng);
        assert!(catalog.iter().all(|s| s.history().len() == 2));
    }
}
