//! Subcommand implementations.

use std::io;

use log::{info, warn};
use stocksim::{FileStore, Simulation, StdRandom};

use crate::config::Config;
use crate::display;
use crate::error::{Error, Result};
use crate::journal::TradeJournal;
use crate::session::{self, RESET_PROMPT};

/// Open the saved game described by `config`.
pub fn open_game(config: &Config) -> Result<Simulation<FileStore, StdRandom>> {
    let rng = match config.game.seed {
        Some(seed) => StdRandom::from_seed(seed),
        None => StdRandom::from_entropy(),
    };
    let store = FileStore::new(&config.storage.dir);
    let sim = Simulation::open(config.game.rules(), store, rng)?;
    info!("opened game in {} at day {}", config.storage.dir, sim.day());
    Ok(sim)
}

fn open_journal(config: &Config) -> Option<TradeJournal> {
    match TradeJournal::open(&config.journal_path()) {
        Ok(journal) => Some(journal),
        Err(e) => {
            warn!("trade journal disabled: {e}");
            None
        }
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| Error::Aborted(format!("confirmation prompt failed: {e}")))
}

/// Interactive trading session on stdin/stdout.
pub fn play(config: &Config) -> Result<()> {
    let mut sim = open_game(config)?;
    let mut journal = open_journal(config);
    let stdin = io::stdin();
    session::run(
        &mut sim,
        journal.as_mut(),
        stdin.lock(),
        io::stdout(),
        |prompt| {
            confirm(prompt).unwrap_or_else(|e| {
                warn!("{e}");
                false
            })
        },
    )
}

/// Print the saved day, cash and holdings.
pub fn status(config: &Config) -> Result<()> {
    let sim = open_game(config)?;
    print!(
        "{}",
        display::portfolio_report(sim.portfolio(), sim.catalog(), sim.day())
    );
    Ok(())
}

/// Erase the saved game after confirmation.
pub fn reset(config: &Config, force: bool) -> Result<()> {
    let mut sim = open_game(config)?;
    if !force && !confirm(RESET_PROMPT)? {
        return Err(Error::Aborted("Reset cancelled.".into()));
    }
    sim.reset()?;
    if let Some(mut journal) = open_journal(config) {
        if let Err(e) = journal.log_reset(config.game.initial_cash) {
            warn!("{e}");
        }
    }
    println!("Game reset!");
    Ok(())
}
