//! Property-based tests for ledger, price model and controller invariants.
//!
//! These tests use proptest to verify that key invariants hold
//! across randomly generated trading sessions.

use proptest::prelude::*;
use stocksim::{
    Catalog, MemoryStore, Price, RandomWalk, Side, SimState, Simulation, SimulationConfig,
    StdRandom, TradeOutcome, TradeRequest,
};

const IDS: [&str; 4] = ["techcorp", "medilife", "eduverse", "acme"];

/// A trade against one of a few securities (including one that is not listed)
fn request_strategy() -> impl Strategy<Value = TradeRequest> {
    (
        prop::sample::select(IDS.to_vec()),
        0u64..=60,
        prop_oneof![Just(Side::Buy), Just(Side::Sell)],
    )
        .prop_map(|(id, qty, side)| TradeRequest::new(id, qty, side))
}

fn session_strategy() -> impl Strategy<Value = Vec<TradeRequest>> {
    prop::collection::vec(request_strategy(), 1..80)
}

fn open(seed: u64) -> Simulation<MemoryStore, StdRandom> {
    Simulation::open(
        SimulationConfig::default(),
        MemoryStore::new(),
        StdRandom::from_seed(seed),
    )
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    // ========================================================================
    // LEDGER INVARIANTS
    // ========================================================================

    /// Executed buys debit exactly quantity * price; cash never goes negative
    #[test]
    fn cash_accounting(seed in any::<u64>(), requests in session_strategy()) {
        let mut sim = open(seed);

        for request in &requests {
            let cash_before = sim.portfolio().cash();
            let outcome = sim.execute_trade(request);
            if let TradeOutcome::Executed(e) = outcome {
                let delta = e.quantity as i64 * e.price.0;
                let expected = match e.side {
                    Side::Buy => cash_before - delta,
                    Side::Sell => cash_before + delta,
                };
                prop_assert_eq!(e.cash, expected);
                prop_assert_eq!(sim.portfolio().cash(), expected);
            }
            prop_assert!(sim.portfolio().cash() >= 0, "negative cash: {}", sim.portfolio().cash());
        }
    }

    /// Buys re-weight cost basis; sells leave it alone unless the holding closes
    #[test]
    fn cost_basis_rules(seed in any::<u64>(), requests in session_strategy()) {
        let mut sim = open(seed);

        for request in &requests {
            let id = request.security.as_str();
            let shares = sim.portfolio().shares(id);
            let avg = sim.portfolio().avg_cost(id);

            let outcome = sim.execute_trade(request);
            let Some(e) = outcome.execution() else { continue };

            match e.side {
                Side::Buy if shares == 0 => {
                    prop_assert_eq!(e.avg_cost, e.price.as_f64());
                }
                Side::Buy => {
                    let expected = (shares as f64 * avg + e.quantity as f64 * e.price.as_f64())
                        / (shares + e.quantity) as f64;
                    prop_assert!(
                        (e.avg_cost - expected).abs() <= 1e-9 * expected.max(1.0),
                        "avg {} != expected {}", e.avg_cost, expected
                    );
                }
                Side::Sell if e.shares == 0 => {
                    prop_assert_eq!(e.avg_cost, 0.0);
                }
                Side::Sell => {
                    prop_assert_eq!(e.avg_cost, avg);
                }
            }

            // Held shares always carry a positive basis
            for (_, holding) in sim.portfolio().holdings() {
                prop_assert!(holding.shares > 0 && holding.avg_cost > 0.0);
            }
        }
    }

    // ========================================================================
    // CONTROLLER INVARIANTS
    // ========================================================================

    /// Rejected requests change nothing; executed ones advance exactly one day
    #[test]
    fn rejections_are_side_effect_free(seed in any::<u64>(), requests in session_strategy()) {
        let mut sim = open(seed);

        for request in &requests {
            let before = sim.state().clone();
            let outcome = sim.execute_trade(request);
            if outcome.is_executed() {
                prop_assert_eq!(sim.day(), before.clock.day() + 1);
            } else {
                prop_assert_eq!(sim.state(), &before);
            }
        }
    }

    /// Reset after any session equals a fresh start, however often it runs
    #[test]
    fn reset_is_idempotent(seed in any::<u64>(), requests in session_strategy()) {
        let mut sim = open(seed);
        for request in &requests {
            sim.execute_trade(request);
        }

        sim.reset().unwrap();
        let once = sim.state().clone();
        sim.reset().unwrap();

        prop_assert_eq!(sim.state(), &once);
        prop_assert_eq!(once, SimState::fresh(100_000));
        prop_assert!(sim.store().is_empty());
    }

    /// Same seed and requests give the same session
    #[test]
    fn deterministic_replay(seed in any::<u64>(), requests in session_strategy()) {
        let mut a = open(seed);
        let mut b = open(seed);
        for request in &requests {
            prop_assert_eq!(a.execute_trade(request), b.execute_trade(request));
        }
        prop_assert_eq!(a.state(), b.state());
    }

    // ========================================================================
    // PRICE INVARIANTS
    // ========================================================================

    /// Prices never drop below the floor and moves stay within ±5%
    #[test]
    fn price_floor_and_band(seed in any::<u64>(), start in 100i64..=400, ticks in 1usize..300) {
        let mut catalog = Catalog::from_listings([("a", "A", start), ("b", "B", 1_000)]);
        let mut rng = StdRandom::from_seed(seed);
        let walk = RandomWalk::default();

        for _ in 0..ticks {
            walk.tick(&mut catalog, &mut rng);
            for security in &catalog {
                prop_assert!(security.price() >= Price(100), "below floor: {}", security.price());
                prop_assert!(security.change_pct().abs() <= 5.0 + 1e-9);
            }
        }
        for security in &catalog {
            prop_assert_eq!(security.history().len(), ticks + 1);
        }
    }
}
