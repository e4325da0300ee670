//! Saved-state compatibility: file-backed sessions and legacy payloads.

use stocksim::persistence::{DAY_KEY, PORTFOLIO_KEY};
use stocksim::{
    FileStore, KeyValueStore, MemoryStore, Portfolio, SequenceRandom, Simulation,
    SimulationConfig, TradeRequest,
};

fn open<S: KeyValueStore>(store: S) -> Simulation<S, SequenceRandom> {
    Simulation::open(
        SimulationConfig::default(),
        store,
        SequenceRandom::constant(0.5),
    )
    .unwrap()
}

#[test]
fn file_backed_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut sim = open(FileStore::new(dir.path()));
        sim.execute_trade(&TradeRequest::buy("techcorp", 10));
        sim.execute_trade(&TradeRequest::buy("financeplus", 4));
    }

    let sim = open(FileStore::new(dir.path()));
    assert_eq!(sim.day(), 3);
    assert_eq!(sim.portfolio().cash(), 100_000 - 5_000 - 3_000);
    assert_eq!(sim.portfolio().shares("techcorp"), 10);
    assert_eq!(sim.portfolio().avg_cost("financeplus"), 750.0);
}

#[test]
fn reset_erases_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut sim = open(FileStore::new(dir.path()));
    sim.execute_trade(&TradeRequest::buy("techcorp", 1));
    assert!(dir.path().join("portfolio.json").exists());

    sim.reset().unwrap();
    assert!(!dir.path().join("portfolio.json").exists());
    assert!(!dir.path().join("day.json").exists());

    let sim = open(FileStore::new(dir.path()));
    assert_eq!(sim.day(), 1);
    assert_eq!(*sim.portfolio(), Portfolio::new(100_000));
}

#[test]
fn payload_without_cost_basis_loads() {
    let mut store = MemoryStore::new();
    store
        .set(PORTFOLIO_KEY, r#"{"cash":95000,"shares":{"techcorp":10}}"#)
        .unwrap();
    store.set(DAY_KEY, "2").unwrap();

    let mut sim = open(store);
    assert_eq!(sim.day(), 2);
    assert_eq!(sim.portfolio().shares("techcorp"), 10);
    assert_eq!(sim.portfolio().avg_cost("techcorp"), 0.0);

    // The next buy re-weights against the unknown (zero) basis
    sim.execute_trade(&TradeRequest::buy("techcorp", 10));
    assert_eq!(sim.portfolio().avg_cost("techcorp"), 250.0);
}

#[test]
fn zero_share_entries_from_sold_out_holdings_are_dropped() {
    let mut store = MemoryStore::new();
    store
        .set(
            PORTFOLIO_KEY,
            r#"{"cash":101000,"shares":{"techcorp":0},"averagePurchasePrice":{"techcorp":0}}"#,
        )
        .unwrap();

    let sim = open(store);
    assert!(sim.portfolio().holding("techcorp").is_none());
    assert_eq!(sim.portfolio().cash(), 101_000);
    assert_eq!(sim.day(), 1);
}

#[test]
fn corrupt_records_fall_back_to_defaults() {
    let mut store = MemoryStore::new();
    store.set(PORTFOLIO_KEY, "\u{0}\u{1}garbage").unwrap();
    store.set(DAY_KEY, "NaN").unwrap();

    let mut sim = open(store);
    assert_eq!(*sim.portfolio(), Portfolio::new(100_000));
    assert_eq!(sim.day(), 1);

    // The session is fully usable and overwrites the bad records
    assert!(sim.execute_trade(&TradeRequest::buy("eduverse", 1)).is_executed());
    assert_eq!(sim.store().get(DAY_KEY).unwrap().as_deref(), Some("2"));
}

#[test]
fn oversized_share_count_is_dropped_on_load() {
    let mut store = MemoryStore::new();
    store
        .set(
            PORTFOLIO_KEY,
            r#"{"cash":1000,"shares":{"techcorp":100000000000000000,"eduverse":4}}"#,
        )
        .unwrap();

    let mut sim = open(store);
    assert!(sim.portfolio().holding("techcorp").is_none());
    assert_eq!(sim.portfolio().shares("eduverse"), 4);

    let snapshot = sim.snapshot();
    assert_eq!(snapshot.cash, 1_000);
    assert_eq!(snapshot.portfolio_value, 1_000);
    assert_eq!(snapshot.total_value, 2_000);

    // The session keeps working on the cleaned-up portfolio
    assert!(sim.execute_trade(&TradeRequest::sell("eduverse", 4)).is_executed());
    assert_eq!(sim.portfolio().cash(), 2_000);
}
