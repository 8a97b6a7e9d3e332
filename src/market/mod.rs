//! Market data access.
//!
//! `MarketData` is the seam between the ladder and the outside world.
//! `YahooClient` talks to Yahoo Finance; `StaticMarket` serves a JSON fixture
//! and backs the tests and offline runs.

pub mod fixture;
pub mod yahoo;

pub use fixture::StaticMarket;
pub use yahoo::YahooClient;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppConfig;
use crate::ladder::{Direction, OptionChainRow};

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("invalid ticker '{0}'")]
    InvalidTicker(String),

    #[error("no data returned for {0}")]
    NoData(String),

    #[error("expiration index {index} out of range, {available} expirations available")]
    IndexOutOfRange { index: usize, available: usize },

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("provider rejected the session: {0}")]
    Unauthorized(String),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
}

pub type MarketResult<T> = Result<T, MarketError>;

// ── Types ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub current_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionSide {
    Call,
    Put,
}

impl OptionSide {
    /// Calls are laddered upward, puts downward.
    pub fn direction(self) -> Direction {
        match self {
            OptionSide::Call => Direction::Increase,
            OptionSide::Put => Direction::Decrease,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OptionSide::Call => "call",
            OptionSide::Put => "put",
        }
    }
}

impl fmt::Display for OptionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "call" | "calls" => Ok(OptionSide::Call),
            "put" | "puts" => Ok(OptionSide::Put),
            other => Err(format!("unknown option side '{other}', expected 'call' or 'put'")),
        }
    }
}

/// A listed expiration. `timestamp` is the provider's own key for the date
/// and is passed back verbatim when requesting the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expiration {
    pub date: NaiveDate,
    pub timestamp: i64,
}

impl Expiration {
    pub fn from_timestamp(timestamp: i64) -> Option<Self> {
        DateTime::from_timestamp(timestamp, 0).map(|dt| Self {
            date: dt.date_naive(),
            timestamp,
        })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            date,
            timestamp: date.and_time(NaiveTime::MIN).and_utc().timestamp(),
        }
    }
}

/// Quote and expiration list as of one provider response.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub quote: Quote,
    pub expirations: Vec<Expiration>,
}

// ── Provider trait ──────────────────────────────────────────────────

#[async_trait]
pub trait MarketData: Send + Sync {
    async fn quote(&self, symbol: &str) -> MarketResult<Quote>;

    /// Listed expirations, in provider order.
    async fn expirations(&self, symbol: &str) -> MarketResult<Vec<Expiration>>;

    /// Quote and expirations together. Providers that get both from a single
    /// request override this.
    async fn snapshot(&self, symbol: &str) -> MarketResult<Snapshot> {
        Ok(Snapshot {
            quote: self.quote(symbol).await?,
            expirations: self.expirations(symbol).await?,
        })
    }

    async fn option_chain(
        &self,
        symbol: &str,
        expiration: &Expiration,
        side: OptionSide,
    ) -> MarketResult<Vec<OptionChainRow>>;
}

/// Fixture-backed provider when `config.fixture` is set, Yahoo otherwise.
pub fn from_config(config: &AppConfig) -> MarketResult<Arc<dyn MarketData>> {
    match &config.fixture {
        Some(path) => {
            tracing::info!(fixture = %path.display(), "using static market data");
            Ok(Arc::new(StaticMarket::load(path)?))
        }
        None => Ok(Arc::new(YahooClient::new(&config.provider)?)),
    }
}

/// `expirations` command: print a ticker's expirations with their 1-based
/// numbers, the same numbers the ladder pages take.
pub fn run_expirations(config: &AppConfig, ticker: &str) -> anyhow::Result<()> {
    let symbol = normalize_ticker(ticker)?;
    let provider = from_config(config).context("creating market data provider")?;

    let rt = tokio::runtime::Runtime::new().context("creating async runtime")?;
    let expirations = rt
        .block_on(provider.expirations(&symbol))
        .with_context(|| format!("fetching expirations for {symbol}"))?;

    println!("{symbol}: {} expirations", expirations.len());
    for (i, expiration) in expirations.iter().enumerate() {
        println!("  {:>3}  {}", i + 1, expiration.date);
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────

const MAX_TICKER_LEN: usize = 12;

/// Trim and upper-case a user-supplied ticker, rejecting anything that
/// could not be a listed symbol.
pub fn normalize_ticker(raw: &str) -> MarketResult<String> {
    let ticker = raw.trim().to_uppercase();
    let valid = !ticker.is_empty()
        && ticker.len() <= MAX_TICKER_LEN
        && ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='))
        && ticker.chars().any(|c| c.is_ascii_alphanumeric());
    if valid {
        Ok(ticker)
    } else {
        Err(MarketError::InvalidTicker(raw.to_string()))
    }
}

/// Pick an expiration by 1-based index.
pub fn select_expiration(expirations: &[Expiration], index: usize) -> MarketResult<&Expiration> {
    index
        .checked_sub(1)
        .and_then(|i| expirations.get(i))
        .ok_or(MarketError::IndexOutOfRange {
            index,
            available: expirations.len(),
        })
}
