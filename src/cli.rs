use clap::{Parser, Subcommand};
use std::path::PathBuf;

use options_ladder::market::OptionSide;

/// Options strike ladders: how far is the next strike, what does it pay,
/// and what is that worth per year.
#[derive(Parser)]
#[command(name = "options-ladder", version, about)]
pub struct Cli {
    /// JSON config file (default: ./options-ladder.json if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Serve market data from a JSON fixture instead of Yahoo Finance
    #[arg(long, global = true)]
    pub fixture: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the web server
    Serve {
        /// Interface to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print a ladder for one ticker and expiration
    Ladder {
        /// Ticker symbol, e.g. AAPL
        ticker: String,

        /// Expiration number, 1 = nearest (see `expirations`)
        expiration: usize,

        /// Horizon in years used to annualize the premium
        #[arg(default_value = "1")]
        years: u32,

        /// call or put
        #[arg(long, default_value = "call")]
        side: OptionSide,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List a ticker's option expirations with their numbers
    Expirations {
        /// Ticker symbol, e.g. AAPL
        ticker: String,
    },
}
