//! Turns a user request into a finished ladder report: fetch, select, compute.

use std::fmt;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppConfig;
use crate::ladder::{LadderError, LadderRow, build_ladder};
use crate::market::{
    self, Expiration, MarketData, MarketError, OptionSide, Snapshot, normalize_ticker,
    select_expiration,
};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Market(#[from] MarketError),

    #[error(transparent)]
    Ladder(#[from] LadderError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LadderRequest {
    pub ticker: String,
    /// 1-based position in the provider's expiration list.
    pub expiration_index: usize,
    pub horizon_years: u32,
    pub side: OptionSide,
}

#[derive(Debug, Clone, Serialize)]
pub struct LadderReport {
    pub symbol: String,
    pub current_price: f64,
    pub expiration: Expiration,
    pub expiration_index: usize,
    pub side: OptionSide,
    pub horizon_years: u32,
    pub rows: Vec<LadderRow>,
}

impl LadderReport {
    pub fn headers(&self) -> [&'static str; 5] {
        headers(self.side)
    }
}

pub fn headers(side: OptionSide) -> [&'static str; 5] {
    match side {
        OptionSide::Call => ["% Increase", "Amount Increased", "Strike", "Premium", "RISK/APR"],
        OptionSide::Put => ["% Decrease", "Amount Decreased", "Strike", "Premium", "RISK/APR"],
    }
}

pub async fn build_report(
    provider: &dyn MarketData,
    request: &LadderRequest,
) -> Result<LadderReport, ReportError> {
    let symbol = normalize_ticker(&request.ticker)?;

    let Snapshot { quote, expirations } = provider.snapshot(&symbol).await?;
    if expirations.is_empty() {
        return Err(MarketError::NoData(format!("{symbol} expirations")).into());
    }
    let expiration = select_expiration(&expirations, request.expiration_index)?.clone();

    let chain = provider
        .option_chain(&symbol, &expiration, request.side)
        .await?;

    // Each expiration index is one weekly period out.
    let horizon = u32::try_from(request.expiration_index).map_err(|_| {
        MarketError::IndexOutOfRange {
            index: request.expiration_index,
            available: expirations.len(),
        }
    })?;
    let rows = build_ladder(
        quote.current_price,
        &chain,
        request.side.direction(),
        request.horizon_years,
        horizon,
    )
    .rows()?;

    tracing::info!(
        %symbol,
        side = %request.side,
        expiration = %expiration.date,
        price = quote.current_price,
        strikes = chain.len(),
        "ladder built"
    );

    Ok(LadderReport {
        symbol,
        current_price: quote.current_price,
        expiration,
        expiration_index: request.expiration_index,
        side: request.side,
        horizon_years: request.horizon_years,
        rows,
    })
}

/// `ladder` command: build one report and print it as a table or JSON.
pub fn run(config: &AppConfig, request: &LadderRequest, json: bool) -> anyhow::Result<()> {
    let provider = market::from_config(config).context("creating market data provider")?;

    let rt = tokio::runtime::Runtime::new().context("creating async runtime")?;
    let report = rt
        .block_on(build_report(provider.as_ref(), request))
        .with_context(|| format!("building {} ladder for {}", request.side, request.ticker))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}

// ── Text rendering ──────────────────────────────────────────────────

impl fmt::Display for LadderReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {}s  price {:.2}  expiration {} (#{})  horizon {}y",
            self.symbol,
            self.side,
            self.current_price,
            self.expiration.date,
            self.expiration_index,
            self.horizon_years
        )?;

        let h = self.headers();
        writeln!(f, "{:>10}  {:>16}  {:>10}  {:>10}  {:>8}", h[0], h[1], h[2], h[3], h[4])?;
        writeln!(f, "{}", "-".repeat(62))?;
        for row in &self.rows {
            writeln!(
                f,
                "{:>10}  {:>16.2}  {:>10.2}  {:>10.2}  {:>8}",
                row.percent_step,
                row.price_delta,
                row.matched_strike,
                row.premium,
                format!("{}%", row.risk_ratio)
            )?;
        }
        Ok(())
    }
}
