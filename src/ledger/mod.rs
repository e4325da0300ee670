//! Portfolio ledger: cash, share counts and average cost basis.
//!
//! The ledger only mutates in memory. Each mutation validates first and
//! touches nothing unless every precondition holds, so a failed `buy` or
//! `sell` leaves the portfolio exactly as it was.
//!
//! # Example
//!
//! ```
//! use stocksim::{Catalog, Portfolio};
//!
//! let catalog = Catalog::default();
//! let techcorp = catalog.get("techcorp").unwrap(); // ₹500
//!
//! let mut portfolio = Portfolio::new(100_000);
//! portfolio.buy(techcorp, 10).unwrap();
//!
//! assert_eq!(portfolio.cash(), 95_000);
//! assert_eq!(portfolio.shares("techcorp"), 10);
//! assert_eq!(portfolio.avg_cost("techcorp"), 500.0);
//! assert_eq!(portfolio.total_value(&catalog), 100_000);
//! ```

pub mod holding;

pub use holding::Holding;

use rustc_hash::FxHashMap;

use crate::catalog::{Catalog, Security};
use crate::error::TradeError;
use crate::types::{Price, Quantity, SecurityId};

/// Cash plus holdings, keyed by security id.
///
/// Cash is in whole currency units and never negative. Holdings with zero
/// shares are removed, so "absent" and "not held" are the same thing.
#[derive(Clone, Debug, PartialEq)]
pub struct Portfolio {
    cash: i64,
    holdings: FxHashMap<SecurityId, Holding>,
}

/// Cash movement produced by a successful ledger mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fill {
    pub quantity: Quantity,
    pub price: Price,
    /// `quantity * price`
    pub notional: i64,
}

impl Portfolio {
    /// Fresh portfolio holding only `cash`.
    pub fn new(cash: i64) -> Self {
        debug_assert!(cash >= 0, "cash must be non-negative, got {cash}");
        Self {
            cash,
            holdings: FxHashMap::default(),
        }
    }

    /// Rebuild a portfolio from persisted parts. Flat holdings are dropped.
    pub fn restore(cash: i64, holdings: impl IntoIterator<Item = (SecurityId, Holding)>) -> Self {
        Self {
            cash: cash.max(0),
            holdings: holdings.into_iter().filter(|(_, h)| !h.is_flat()).collect(),
        }
    }

    // === Queries ===

    #[inline]
    pub fn cash(&self) -> i64 {
        self.cash
    }

    pub fn holding(&self, id: &str) -> Option<&Holding> {
        self.holdings.get(id)
    }

    /// Shares held of `id` (zero if none).
    pub fn shares(&self, id: &str) -> Quantity {
        self.holding(id).map_or(0, |h| h.shares)
    }

    /// Average cost basis of `id` (zero if not held).
    pub fn avg_cost(&self, id: &str) -> f64 {
        self.holding(id).map_or(0.0, |h| h.avg_cost)
    }

    /// Open holdings, in unspecified order.
    pub fn holdings(&self) -> impl Iterator<Item = (&SecurityId, &Holding)> {
        self.holdings.iter()
    }

    /// Open holdings sorted by security id.
    pub fn holdings_sorted(&self) -> Vec<(&SecurityId, &Holding)> {
        let mut v: Vec<_> = self.holdings.iter().collect();
        v.sort_by(|a, b| a.0.cmp(b.0));
        v
    }

    /// Market value of every holding at current catalog prices.
    ///
    /// Holdings of securities missing from the catalog are valued at zero.
    /// Saturates at `i64::MAX`.
    pub fn portfolio_value(&self, catalog: &Catalog) -> i64 {
        catalog
            .iter()
            .map(|s| self.holding(s.id().as_str()).map_or(0, |h| h.market_value(s.price())))
            .fold(0i64, i64::saturating_add)
    }

    /// Cash plus [`Portfolio::portfolio_value`].
    pub fn total_value(&self, catalog: &Catalog) -> i64 {
        self.cash.saturating_add(self.portfolio_value(catalog))
    }

    /// Amount paid for all shares still held.
    pub fn invested_value(&self) -> f64 {
        self.holdings.values().map(Holding::invested).sum()
    }

    /// Paper gain or loss on one security at its current price.
    pub fn unrealized_pnl(&self, security: &Security) -> f64 {
        self.holding(security.id().as_str())
            .map_or(0.0, |h| h.unrealized_pnl(security.price()))
    }

    /// [`Portfolio::unrealized_pnl`] as a percentage of cost basis.
    pub fn unrealized_pnl_pct(&self, security: &Security) -> f64 {
        self.holding(security.id().as_str())
            .map_or(0.0, |h| h.unrealized_pnl_pct(security.price()))
    }

    /// Paper gain or loss across all holdings.
    pub fn total_unrealized_pnl(&self, catalog: &Catalog) -> f64 {
        self.portfolio_value(catalog) as f64 - self.invested_value()
    }

    /// [`Portfolio::total_unrealized_pnl`] relative to the invested amount.
    pub fn total_unrealized_pnl_pct(&self, catalog: &Catalog) -> f64 {
        let invested = self.invested_value();
        if invested <= 0.0 {
            return 0.0;
        }
        self.total_unrealized_pnl(catalog) / invested * 100.0
    }

    /// Point-in-time summary for display.
    pub fn snapshot(&self, catalog: &Catalog) -> PortfolioSnapshot {
        let portfolio_value = self.portfolio_value(catalog);
        PortfolioSnapshot {
            cash: self.cash,
            portfolio_value,
            total_value: self.cash.saturating_add(portfolio_value),
            invested_value: self.invested_value(),
            unrealized_pnl: self.total_unrealized_pnl(catalog),
            unrealized_pnl_pct: self.total_unrealized_pnl_pct(catalog),
            num_holdings: self.holdings.len(),
        }
    }

    // === Mutations ===

    /// Drop holdings whose value at current catalog prices does not fit in
    /// an `i64`. Returns the dropped ids, sorted.
    pub fn discard_unpriceable(&mut self, catalog: &Catalog) -> Vec<SecurityId> {
        let mut dropped: Vec<SecurityId> = self
            .holdings
            .iter()
            .filter(|(id, h)| {
                catalog
                    .get(id.as_str())
                    .is_some_and(|s| h.checked_market_value(s.price()).is_none())
            })
            .map(|(id, _)| id.clone())
            .collect();
        dropped.sort();
        for id in &dropped {
            self.holdings.remove(id);
        }
        dropped
    }

    /// Buy `quantity` shares of `security` at its current price.
    pub fn buy(&mut self, security: &Security, quantity: Quantity) -> Result<Fill, TradeError> {
        if quantity == 0 {
            return Err(TradeError::InvalidQuantity);
        }
        let price = security.price();
        let notional = i64::try_from(quantity)
            .ok()
            .and_then(|q| q.checked_mul(price.0));
        let notional = match notional {
            Some(n) if n <= self.cash => n,
            _ => {
                return Err(TradeError::InsufficientCash {
                    required: Price(notional.unwrap_or(i64::MAX)),
                    available: Price(self.cash),
                });
            }
        };

        self.cash -= notional;
        self.holdings
            .entry(security.id().clone())
            .or_default()
            .apply_buy(quantity, price);

        Ok(Fill {
            quantity,
            price,
            notional,
        })
    }

    /// Sell `quantity` shares of `security` at its current price.
    pub fn sell(&mut self, security: &Security, quantity: Quantity) -> Result<Fill, TradeError> {
        if quantity == 0 {
            return Err(TradeError::InvalidQuantity);
        }
        let held = self.shares(security.id().as_str());
        if quantity > held {
            return Err(TradeError::InsufficientShares {
                requested: quantity,
                held,
            });
        }
        let price = security.price();
        let notional = (quantity as i64).saturating_mul(price.0);

        self.cash = self.cash.saturating_add(notional);
        let id = security.id().as_str();
        let flat = match self.holdings.get_mut(id) {
            Some(holding) => {
                holding.apply_sell(quantity);
                holding.is_flat()
            }
            None => false,
        };
        if flat {
            self.holdings.remove(id);
        }

        Ok(Fill {
            quantity,
            price,
            notional,
        })
    }
}

/// A point-in-time summary of a portfolio.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PortfolioSnapshot {
    pub cash: i64,
    /// Market value of holdings
    pub portfolio_value: i64,
    /// Cash plus holdings
    pub total_value: i64,
    /// Amount paid for holdings still held
    pub invested_value: f64,
    pub unrealized_pnl: f64,
    pub unrealized_pnl_pct: f64,
    /// Number of securities with shares held
    pub num_holdings: usize,
}
