//! Holding in a single security.

use crate::types::{Price, Quantity};

/// Shares of one security and their average cost basis.
///
/// `avg_cost` is the quantity-weighted average purchase price of the shares
/// still held. Selling leaves it unchanged; selling out resets it to zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Holding {
    /// Shares held
    pub shares: Quantity,
    /// Average cost basis per share
    pub avg_cost: f64,
}

impl Holding {
    pub fn new(shares: Quantity, avg_cost: f64) -> Self {
        Self { shares, avg_cost }
    }

    /// Add `qty` shares bought at `price`, re-weighting the cost basis.
    pub fn apply_buy(&mut self, qty: Quantity, price: Price) {
        if qty == 0 {
            return;
        }
        if self.shares == 0 {
            self.shares = qty;
            self.avg_cost = price.as_f64();
        } else {
            let total = self.shares.saturating_add(qty);
            let cost = self.shares as f64 * self.avg_cost + qty as f64 * price.as_f64();
            self.shares = total;
            self.avg_cost = cost / total as f64;
        }
    }

    /// Remove `qty` shares. Caller guarantees `qty <= shares`.
    pub fn apply_sell(&mut self, qty: Quantity) {
        debug_assert!(qty <= self.shares, "selling {qty} of {} shares", self.shares);
        self.shares -= qty.min(self.shares);
        if self.shares == 0 {
            self.avg_cost = 0.0;
        }
    }

    /// Market value at `price`, or `None` if it does not fit in an `i64`.
    #[inline]
    pub fn checked_market_value(&self, price: Price) -> Option<i64> {
        i64::try_from(self.shares).ok()?.checked_mul(price.0)
    }

    /// Market value at `price`, saturating at `i64::MAX`.
    #[inline]
    pub fn market_value(&self, price: Price) -> i64 {
        self.checked_market_value(price).unwrap_or(i64::MAX)
    }

    /// Amount paid for the shares still held.
    #[inline]
    pub fn invested(&self) -> f64 {
        self.shares as f64 * self.avg_cost
    }

    /// Paper gain or loss at `price`.
    pub fn unrealized_pnl(&self, price: Price) -> f64 {
        if self.shares == 0 {
            return 0.0;
        }
        self.shares as f64 * (price.as_f64() - self.avg_cost)
    }

    /// Paper gain or loss at `price` as a percentage of cost basis.
    /// Zero when the cost basis is unknown.
    pub fn unrealized_pnl_pct(&self, price: Price) -> f64 {
        if self.avg_cost <= 0.0 {
            return 0.0;
        }
        (price.as_f64() - self.avg_cost) / self.avg_cost * 100.0
    }

    #[inline]
    pub fn is_flat(&self) -> bool {
        self.shares == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_holding_is_flat() {
        let h = Holding::default();
        assert!(h.is_flat());
        assert_eq!(h.unrealized_pnl(Price(500)), 0.0);
        assert_eq!(h.unrealized_pnl_pct(Price(500)), 0.0);
    }

    #[test]
    fn first_buy_sets_basis_exactly() {
        let mut h = Holding::default();
        h.apply_buy(10, Price(500));
        assert_eq!(h.shares, 10);
        assert_eq!(h.avg_cost, 500.0);
        assert_eq!(h.market_value(Price(550)), 5_500);
        assert_eq!(h.unrealized_pnl(Price(550)), 500.0);
        assert!((h.unrealized_pnl_pct(Price(550)) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn add_reweights_basis() {
        let mut h = Holding::default();
        h.apply_buy(10, Price(500));
        h.apply_buy(10, Price(600));
        assert_eq!(h.shares, 20);
        assert_eq!(h.avg_cost, 550.0);
    }

    #[test]
    fn uneven_weights() {
        let mut h = Holding::default();
        h.apply_buy(3, Price(100));
        h.apply_buy(1, Price(200));
        assert!((h.avg_cost - 125.0).abs() < 1e-9);
    }

    #[test]
    fn partial_sell_keeps_basis() {
        let mut h = Holding::default();
        h.apply_buy(20, Price(550));
        h.apply_sell(5);
        assert_eq!(h.shares, 15);
        assert_eq!(h.avg_cost, 550.0);
    }

    #[test]
    fn sell_out_resets_basis() {
        let mut h = Holding::default();
        h.apply_buy(15, Price(550));
        h.apply_sell(15);
        assert!(h.is_flat());
        assert_eq!(h.avg_cost, 0.0);
    }

    #[test]
    fn losing_position() {
        let mut h = Holding::default();
        h.apply_buy(4, Price(1200));
        assert_eq!(h.unrealized_pnl(Price(1140)), -240.0);
        assert!((h.unrealized_pnl_pct(Price(1140)) + 5.0).abs() < 1e-9);
    }

    #[test]
    fn market_value_saturates() {
        let h = Holding::new(100_000_000_000_000_000, 0.0);
        assert_eq!(h.checked_market_value(Price(500)), None);
        assert_eq!(h.market_value(Price(500)), i64::MAX);
        assert_eq!(Holding::new(u64::MAX, 1.0).market_value(Price(100)), i64::MAX);
        assert_eq!(Holding::new(10, 500.0).checked_market_value(Price(600)), Some(6_000));
    }
}
