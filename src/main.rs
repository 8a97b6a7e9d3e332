use anyhow::Result;
use clap::Parser;

use options_ladder::config::AppConfig;
use options_ladder::report::{self, LadderRequest};
use options_ladder::{api, logging, market};

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(fixture) = cli.fixture {
        config.fixture = Some(fixture);
    }

    match cli.command {
        cli::Command::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            let _guard = logging::init(&config, true)?;
            api::run(&config)
        }
        cli::Command::Ladder {
            ticker,
            expiration,
            years,
            side,
            json,
        } => {
            let _guard = logging::init(&config, false)?;
            report::run(
                &config,
                &LadderRequest {
                    ticker,
                    expiration_index: expiration,
                    horizon_years: years,
                    side,
                },
                json,
            )
        }
        cli::Command::Expirations { ticker } => {
            let _guard = logging::init(&config, false)?;
            market::run_expirations(&config, &ticker)
        }
    }
}
