//! JSONL trade journal.
//!
//! Each executed trade and each reset is appended as one JSON object per
//! line, so a learner can look back over a whole game.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use stocksim::Execution;

use crate::error::{Error, Result};

/// A line in the journal.
#[derive(Debug, Clone, Serialize)]
pub struct JournalEntry {
    pub event: &'static str,
    pub ts: DateTime<Utc>,
    #[serde(flatten)]
    pub data: serde_json::Value,
}

/// Append-only journal writer.
pub struct TradeJournal {
    writer: BufWriter<fs::File>,
}

impl TradeJournal {
    /// Open (or create) the journal for appending.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(Error::Journal)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(Error::Journal)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Append an event with arbitrary JSON data.
    pub fn log(&mut self, event: &'static str, data: serde_json::Value) -> Result<()> {
        let entry = JournalEntry {
            event,
            ts: Utc::now(),
            data,
        };
        let json = serde_json::to_string(&entry)
            .map_err(|e| Error::Journal(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
        writeln!(self.writer, "{json}").map_err(Error::Journal)?;
        self.writer.flush().map_err(Error::Journal)
    }

    /// Record an executed trade.
    pub fn log_execution(&mut self, execution: &Execution) -> Result<()> {
        let data = serde_json::to_value(execution)
            .map_err(|e| Error::Journal(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
        self.log("trade_executed", data)
    }

    /// Record a reset.
    pub fn log_reset(&mut self, initial_cash: i64) -> Result<()> {
        self.log("game_reset", serde_json::json!({ "initial_cash": initial_cash }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stocksim::{MemoryStore, SequenceRandom, Simulation, SimulationConfig, TradeRequest};

    #[test]
    fn journal_writes_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trades.jsonl");

        let mut sim = Simulation::open(
            SimulationConfig::default(),
            MemoryStore::new(),
            SequenceRandom::constant(0.5),
        )
        .unwrap();
        let outcome = sim.execute_trade(&TradeRequest::buy("techcorp", 10));

        {
            let mut journal = TradeJournal::open(&path).unwrap();
            journal.log_execution(outcome.execution().unwrap()).unwrap();
            journal.log_reset(100_000).unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let trade: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(trade["event"], "trade_executed");
        assert_eq!(trade["security"], "techcorp");
        assert_eq!(trade["side"], "buy");
        assert_eq!(trade["quantity"], 10);
        assert_eq!(trade["price"], 500);
        assert_eq!(trade["day"], 2);
        assert!(trade["ts"].is_string());

        assert!(lines[1].contains("\"event\":\"game_reset\""));
    }

    #[test]
    fn journal_appends_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("trades.jsonl");

        TradeJournal::open(&path).unwrap().log_reset(1).unwrap();
        TradeJournal::open(&path).unwrap().log_reset(2).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }
}
