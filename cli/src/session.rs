//! Interactive trading session (REPL).

use std::io::{BufRead, Write};

use log::warn;
use stocksim::{KeyValueStore, Quantity, RandomSource, Side, Simulation, TradeError, TradeRequest};

use crate::display;
use crate::error::Result;
use crate::journal::TradeJournal;

/// Asked before any reset.
pub const RESET_PROMPT: &str = "Are you sure you want to reset? This will clear all progress.";

/// A parsed session command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Trade(TradeRequest),
    Market,
    Portfolio,
    History(String),
    Reset,
    Help,
    Quit,
}

/// Parse one input line. `Ok(None)` for a blank line.
pub fn parse_command(line: &str) -> std::result::Result<Option<Command>, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some(cmd) = parts.first() else {
        return Ok(None);
    };

    let command = match cmd.to_ascii_lowercase().as_str() {
        "buy" | "sell" => {
            let side: Side = cmd.parse()?;
            let [_, id, qty] = parts[..] else {
                return Err(format!("usage: {} <id> <quantity>", cmd.to_ascii_lowercase()));
            };
            let quantity = parse_quantity(qty).map_err(|e| e.to_string())?;
            Command::Trade(TradeRequest::new(id.to_ascii_lowercase(), quantity, side))
        }
        "market" | "m" => Command::Market,
        "portfolio" | "p" => Command::Portfolio,
        "history" | "hist" => match parts.get(1) {
            Some(id) => Command::History(id.to_ascii_lowercase()),
            None => return Err("usage: history <id>".into()),
        },
        "reset" => Command::Reset,
        "help" | "h" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("Unknown command: '{other}'. Type 'help' for commands.")),
    };
    Ok(Some(command))
}

/// Quantities must be positive whole numbers; zero is left for the
/// simulation to reject.
fn parse_quantity(text: &str) -> std::result::Result<Quantity, TradeError> {
    text.parse::<Quantity>().map_err(|_| TradeError::InvalidQuantity)
}

/// Run the session until `quit` or end of input.
///
/// `confirm` is asked before a reset; answering no leaves the game as is.
pub fn run<S, R>(
    sim: &mut Simulation<S, R>,
    mut journal: Option<&mut TradeJournal>,
    input: impl BufRead,
    mut out: impl Write,
    mut confirm: impl FnMut(&str) -> bool,
) -> Result<()>
where
    S: KeyValueStore,
    R: RandomSource,
{
    writeln!(out, "Stock Market Simulator. Day {}.", sim.day())?;
    writeln!(out, "Type 'help' for commands, 'quit' to exit.\n")?;
    write!(out, "{}", display::market_table(sim.catalog()))?;

    let mut lines = input.lines();
    loop {
        write!(out, "day {}> ", sim.day())?;
        out.flush()?;

        let Some(line) = lines.next() else {
            break; // EOF
        };
        let line = line?;

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(msg) => {
                writeln!(out, "{msg}")?;
                continue;
            }
        };

        match command {
            Command::Trade(request) => {
                let outcome = sim.execute_trade(&request);
                writeln!(out, "{outcome}")?;
                let journal = journal.as_deref_mut();
                if let (Some(execution), Some(journal)) = (outcome.execution(), journal) {
                    if let Err(e) = journal.log_execution(execution) {
                        warn!("{e}");
                    }
                }
            }
            Command::Market => write!(out, "{}", display::market_table(sim.catalog()))?,
            Command::Portfolio => write!(
                out,
                "{}",
                display::portfolio_report(sim.portfolio(), sim.catalog(), sim.day())
            )?,
            Command::History(id) => match sim.catalog().get(&id) {
                Some(security) => writeln!(out, "{}", display::history_line(security))?,
                None => writeln!(out, "{}", TradeError::UnknownSecurity(id.into()))?,
            },
            Command::Reset => {
                if !confirm(RESET_PROMPT) {
                    writeln!(out, "Reset cancelled.")?;
                    continue;
                }
                sim.reset()?;
                if let Some(journal) = journal.as_deref_mut() {
                    if let Err(e) = journal.log_reset(sim.config().initial_cash) {
                        warn!("{e}");
                    }
                }
                writeln!(out, "Game reset!")?;
            }
            Command::Help => print_help(&mut out)?,
            Command::Quit => break,
        }
    }

    writeln!(out, "Goodbye!")?;
    Ok(())
}

fn print_help(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(
        out,
        r#"
Commands:
  buy <id> <qty>      Buy shares at the current price
  sell <id> <qty>     Sell shares at the current price
  market              Show prices and last moves
  portfolio           Show cash, holdings and profit/loss
  history <id>        Show a security's price path
  reset               Start over (asks for confirmation)
  help                Show this help
  quit                Exit

Every executed trade ends the day: all prices move by up to ±5%.

Examples:
  buy techcorp 10
  sell medilife 2
"#
    )
}
