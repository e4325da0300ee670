//! Plain-text rendering of market and portfolio state.

use std::fmt::Write;

use stocksim::{Catalog, Portfolio, Price, Security};

/// Signed money with an explicit sign, e.g. `+₹1,000` or `-₹240`.
pub fn signed_money(amount: f64) -> String {
    let rounded = Price(amount.round() as i64);
    if rounded.0 >= 0 {
        format!("+{rounded}")
    } else {
        rounded.to_string()
    }
}

/// Signed percentage with two decimals, e.g. `+20.00%`.
pub fn signed_pct(pct: f64) -> String {
    format!("{pct:+.2}%")
}

/// One row per security: id, name, price and last move.
pub fn market_table(catalog: &Catalog) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  {:<14} {:<14} {:>10} {:>9}", "ID", "NAME", "PRICE", "CHANGE");
    let _ = writeln!(out, "  {}", "─".repeat(50));
    for security in catalog {
        let arrow = match security.change_pct() {
            c if c > 0.0 => "▲",
            c if c < 0.0 => "▼",
            _ => " ",
        };
        let _ = writeln!(
            out,
            "  {:<14} {:<14} {:>10} {:>8} {arrow}",
            security.id(),
            security.name(),
            security.price().to_string(),
            signed_pct(security.change_pct()),
        );
    }
    out
}

/// Cash, values, day and per-holding profit/loss.
pub fn portfolio_report(portfolio: &Portfolio, catalog: &Catalog, day: u32) -> String {
    let snap = portfolio.snapshot(catalog);
    let mut out = String::new();
    let _ = writeln!(out, "  Day:             {day}");
    let _ = writeln!(out, "  Cash:            {}", Price(snap.cash));
    let _ = writeln!(out, "  Portfolio value: {}", Price(snap.portfolio_value));
    let _ = writeln!(out, "  Total value:     {}", Price(snap.total_value));

    if snap.num_holdings == 0 {
        let _ = writeln!(out, "\n  (no holdings)");
        return out;
    }

    let _ = writeln!(
        out,
        "\n  {:<14} {:>7} {:>10} {:>10} {:>12}  {}",
        "ID", "SHARES", "AVG COST", "PRICE", "VALUE", "P&L"
    );
    let _ = writeln!(out, "  {}", "─".repeat(72));
    for (id, holding) in portfolio.holdings_sorted() {
        let Some(security) = catalog.get(id.as_str()) else {
            let _ = writeln!(out, "  {id:<14} {:>7}  (not listed)", holding.shares);
            continue;
        };
        let _ = writeln!(
            out,
            "  {:<14} {:>7} {:>10} {:>10} {:>12}  {} ({})",
            id.as_str(),
            holding.shares,
            Price(holding.avg_cost.round() as i64).to_string(),
            security.price().to_string(),
            Price(holding.market_value(security.price())).to_string(),
            signed_money(portfolio.unrealized_pnl(security)),
            signed_pct(portfolio.unrealized_pnl_pct(security)),
        );
    }
    let _ = writeln!(
        out,
        "\n  Total P&L: {} ({})",
        signed_money(snap.unrealized_pnl),
        signed_pct(snap.unrealized_pnl_pct)
    );
    out
}

/// Price path of one security, oldest first.
pub fn history_line(security: &Security) -> String {
    let path: Vec<String> = security.history().iter().map(|p| p.0.to_string()).collect();
    format!("{} ({}): {}", security.name(), security.id(), path.join(" → "))
}
