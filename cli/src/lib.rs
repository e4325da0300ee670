//! stocksim-cli: terminal front end for the stock market simulator.
//!
//! Loads a TOML config, opens the saved game from a directory of JSON
//! records, and runs an interactive trading session with a JSONL trade
//! journal.

pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod journal;
pub mod session;
