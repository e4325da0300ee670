//! Saving and restoring the portfolio and day counter.
//!
//! State is kept as two independent records in a [`KeyValueStore`]:
//!
//! | key         | payload                                                              |
//! |-------------|----------------------------------------------------------------------|
//! | `portfolio` | `{"cash": n, "shares": {id: int}, "averagePurchasePrice": {id: n}}` |
//! | `day`       | decimal text, e.g. `7`                                              |
//!
//! Loading is forgiving. Each record is decoded on its own and run through
//! a normalisation pass that fills missing or malformed fields with
//! defaults, so payloads written by older builds (no
//! `averagePurchasePrice`, say) still load. A record that is not JSON at
//! all is reported as [`PersistenceError::CorruptPersistedState`], logged,
//! and replaced by defaults.
//!
//! Catalog prices are not persisted: every session opens at seed prices.

use std::collections::BTreeMap;

use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;

use crate::clock::SimulationClock;
use crate::error::PersistenceError;
use crate::ledger::{Holding, Portfolio};
use crate::store::KeyValueStore;
use crate::types::SecurityId;

/// Store key of the portfolio record.
pub const PORTFOLIO_KEY: &str = "portfolio";
/// Store key of the day record.
pub const DAY_KEY: &str = "day";

/// Wire shape of the portfolio record.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioRecord {
    pub cash: i64,
    pub shares: BTreeMap<String, u64>,
    pub average_purchase_price: BTreeMap<String, f64>,
}

impl From<&Portfolio> for PortfolioRecord {
    fn from(portfolio: &Portfolio) -> Self {
        let mut record = PortfolioRecord {
            cash: portfolio.cash(),
            ..Default::default()
        };
        for (id, holding) in portfolio.holdings() {
            record.shares.insert(id.to_string(), holding.shares);
            record
                .average_purchase_price
                .insert(id.to_string(), holding.avg_cost);
        }
        record
    }
}

/// Everything that survives between sessions.
#[derive(Clone, Debug, PartialEq)]
pub struct SavedState {
    pub portfolio: Portfolio,
    pub clock: SimulationClock,
}

/// Write both records. The portfolio goes first.
pub fn save<S: KeyValueStore + ?Sized>(
    store: &mut S,
    portfolio: &Portfolio,
    clock: &SimulationClock,
) -> Result<(), PersistenceError> {
    let json = serde_json::to_string(&PortfolioRecord::from(portfolio))?;
    store.set(PORTFOLIO_KEY, &json)?;
    store.set(DAY_KEY, &clock.day().to_string())?;
    debug!("saved state: day {}, cash {}", clock.day(), portfolio.cash());
    Ok(())
}

/// Restore saved state, or `None` if nothing has been saved.
///
/// Never fails: unreadable or corrupt records are logged and replaced by
/// defaults (`initial_cash`, no holdings, day 1).
pub fn load<S: KeyValueStore + ?Sized>(store: &S, initial_cash: i64) -> Option<SavedState> {
    let portfolio_raw = read(store, PORTFOLIO_KEY);
    let day_raw = read(store, DAY_KEY);
    if portfolio_raw.is_none() && day_raw.is_none() {
        return None;
    }

    let portfolio = match portfolio_raw {
        Some(raw) => decode_portfolio(&raw, initial_cash).unwrap_or_else(|e| {
            warn!("{e}; starting from a fresh portfolio");
            Portfolio::new(initial_cash)
        }),
        None => Portfolio::new(initial_cash),
    };
    let clock = match day_raw {
        Some(raw) => decode_day(&raw).unwrap_or_else(|e| {
            warn!("{e}; restarting at day {}", SimulationClock::FIRST_DAY);
            SimulationClock::new()
        }),
        None => SimulationClock::new(),
    };

    info!(
        "restored state: day {}, cash {}, {} holdings",
        clock.day(),
        portfolio.cash(),
        portfolio.holdings().count()
    );
    Some(SavedState { portfolio, clock })
}

/// Remove both records.
pub fn clear<S: KeyValueStore + ?Sized>(store: &mut S) -> Result<(), PersistenceError> {
    store.remove(PORTFOLIO_KEY)?;
    store.remove(DAY_KEY)?;
    Ok(())
}

fn read<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            warn!("failed to read '{key}' from store: {e}; treating as absent");
            None
        }
    }
}

/// Parse a portfolio record and normalise it.
pub fn decode_portfolio(raw: &str, initial_cash: i64) -> Result<Portfolio, PersistenceError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| PersistenceError::CorruptPersistedState(format!("portfolio record: {e}")))?;
    if !value.is_object() {
        return Err(PersistenceError::CorruptPersistedState(
            "portfolio record is not an object".into(),
        ));
    }
    Ok(normalize_portfolio(&value, initial_cash))
}

/// Build a portfolio from a possibly partial record, defaulting whatever is
/// missing or malformed.
///
/// - `cash`: missing or non-numeric → `initial_cash`; fractional →
///   truncated; negative → 0
/// - `shares`: entries that are not whole non-negative numbers are dropped
/// - `averagePurchasePrice`: missing → empty; negative or non-numeric
///   entries dropped; entries for securities not held are ignored
///
/// A held security with no usable cost basis keeps an average cost of 0.
pub fn normalize_portfolio(value: &Value, initial_cash: i64) -> Portfolio {
    let cash = match value.get("cash").and_then(as_cash) {
        Some(cash) => cash.max(0),
        None => {
            debug!("portfolio record has no usable cash; using {initial_cash}");
            initial_cash
        }
    };

    let shares: BTreeMap<&str, u64> = entries(value, "shares")
        .filter_map(|(id, v)| {
            let n = as_whole_number(v).filter(|n| *n >= 0)?;
            Some((id, n as u64))
        })
        .collect();

    let avg: BTreeMap<&str, f64> = entries(value, "averagePurchasePrice")
        .filter_map(|(id, v)| {
            let a = v.as_f64().filter(|a| a.is_finite() && *a >= 0.0)?;
            Some((id, a))
        })
        .collect();

    let holdings = shares.into_iter().filter(|(_, n)| *n > 0).map(|(id, n)| {
        let avg_cost = avg.get(id).copied().unwrap_or_else(|| {
            debug!("no cost basis for held '{id}'; using 0");
            0.0
        });
        (SecurityId::from(id), Holding::new(n, avg_cost))
    });

    Portfolio::restore(cash, holdings)
}

/// Parse the day record. Accepts `7`, `"7"` and `7.0`; days before the
/// first are clamped to day 1.
pub fn decode_day(raw: &str) -> Result<SimulationClock, PersistenceError> {
    let text = raw.trim().trim_matches('"').trim();
    let day = if let Ok(day) = text.parse::<i64>() {
        day
    } else {
        match text.parse::<f64>() {
            Ok(f) if f.is_finite() && f.fract() == 0.0 => f as i64,
            _ => {
                return Err(PersistenceError::CorruptPersistedState(format!(
                    "day record '{raw}' is not a whole number"
                )));
            }
        }
    };
    let day = u32::try_from(day.max(0)).unwrap_or(u32::MAX);
    Ok(SimulationClock::at(day))
}

fn entries<'a>(value: &'a Value, key: &str) -> impl Iterator<Item = (&'a str, &'a Value)> {
    value
        .get(key)
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|map| map.iter().map(|(k, v)| (k.as_str(), v)))
}

/// Whole units of cash. Fractions are truncated; out-of-range values
/// saturate.
fn as_cash(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64().filter(|f| f.is_finite())?;
    Some(f.trunc() as i64)
}

fn as_whole_number(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
