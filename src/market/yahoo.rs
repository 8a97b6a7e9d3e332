//! Yahoo Finance options client.
//!
//! Uses the unofficial v7 options endpoint. One call returns the quote, the
//! list of expirations and the chain for a single expiration (the nearest
//! one unless `date` is given).
//!
//! The endpoint wants a session: a cookie from `cookie_url` and a crumb from
//! `crumb_url`, sent back as `&crumb=` on every request. The crumb is fetched
//! on first use and refreshed once when the provider rejects it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::sync::Mutex;

use super::{Expiration, MarketData, MarketError, MarketResult, OptionSide, Quote, Snapshot};
use crate::config::ProviderConfig;
use crate::ladder::OptionChainRow;

pub struct YahooClient {
    client: reqwest::Client,
    base_url: String,
    cookie_url: String,
    crumb_url: String,
    crumb: Mutex<Option<String>>,
}

impl YahooClient {
    pub fn new(config: &ProviderConfig) -> MarketResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .cookie_store(true)
            .build()
            .map_err(|e| MarketError::Network(format!("building HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cookie_url: config.cookie_url.clone(),
            crumb_url: config.crumb_url.clone(),
            crumb: Mutex::new(None),
        })
    }

    /// Cached crumb, or a fresh cookie + crumb handshake.
    async fn crumb(&self) -> MarketResult<String> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        // Only the Set-Cookie matters; the page itself is usually a 404.
        self.client
            .get(&self.cookie_url)
            .send()
            .await
            .map_err(|e| MarketError::Network(format!("{}: {e}", self.cookie_url)))?;

        let response = self
            .client
            .get(&self.crumb_url)
            .send()
            .await
            .map_err(|e| MarketError::Network(format!("{}: {e}", self.crumb_url)))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MarketError::Network(format!("{}: {e}", self.crumb_url)))?;

        let crumb = body.trim();
        if !status.is_success() || crumb.is_empty() || crumb.contains(['<', '{', ' ']) {
            return Err(MarketError::Unauthorized(format!(
                "no crumb from {} ({status})",
                self.crumb_url
            )));
        }

        tracing::debug!("yahoo session established");
        *cached = Some(crumb.to_string());
        Ok(crumb.to_string())
    }

    async fn fetch_options(&self, symbol: &str, date: Option<i64>) -> MarketResult<YahooChainData> {
        match self.try_fetch_options(symbol, date).await {
            Err(MarketError::Unauthorized(reason)) => {
                tracing::debug!(%reason, "crumb rejected, starting a new session");
                *self.crumb.lock().await = None;
                self.try_fetch_options(symbol, date).await
            }
            other => other,
        }
    }

    async fn try_fetch_options(
        &self,
        symbol: &str,
        date: Option<i64>,
    ) -> MarketResult<YahooChainData> {
        let crumb = self.crumb().await?;
        let url = format!("{}/options/{}", self.base_url, symbol);
        let mut query = vec![("crumb", crumb)];
        if let Some(ts) = date {
            query.push(("date", ts.to_string()));
        }
        tracing::debug!(%url, ?date, "requesting options");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(MarketError::NoData(symbol.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
                || body.contains("Invalid Crumb")
            {
                return Err(MarketError::Unauthorized(format!("{url} returned {status}")));
            }
            return Err(MarketError::Network(format!("{url} returned {status}")));
        }

        let body: YahooOptionsResponse = response
            .json()
            .await
            .map_err(|e| MarketError::Parse(format!("options response for {symbol}: {e}")))?;

        first_result(body, symbol)
    }
}

#[async_trait]
impl MarketData for YahooClient {
    async fn quote(&self, symbol: &str) -> MarketResult<Quote> {
        let data = self.fetch_options(symbol, None).await?;
        quote_from(&data, symbol)
    }

    async fn expirations(&self, symbol: &str) -> MarketResult<Vec<Expiration>> {
        let data = self.fetch_options(symbol, None).await?;
        Ok(expirations_from(&data))
    }

    async fn snapshot(&self, symbol: &str) -> MarketResult<Snapshot> {
        let data = self.fetch_options(symbol, None).await?;
        Ok(Snapshot {
            quote: quote_from(&data, symbol)?,
            expirations: expirations_from(&data),
        })
    }

    async fn option_chain(
        &self,
        symbol: &str,
        expiration: &Expiration,
        side: OptionSide,
    ) -> MarketResult<Vec<OptionChainRow>> {
        let data = self
            .fetch_options(symbol, Some(expiration.timestamp))
            .await?;
        let rows = chain_from(data, side);
        tracing::debug!(symbol, date = %expiration.date, %side, rows = rows.len(), "chain fetched");
        Ok(rows)
    }
}

// ── Response conversion ─────────────────────────────────────────────

fn first_result(body: YahooOptionsResponse, symbol: &str) -> MarketResult<YahooChainData> {
    body.option_chain
        .result
        .into_iter()
        .next()
        .ok_or_else(|| MarketError::NoData(symbol.to_string()))
}

fn quote_from(data: &YahooChainData, symbol: &str) -> MarketResult<Quote> {
    let price = data
        .quote
        .as_ref()
        .and_then(|q| q.regular_market_price)
        .filter(|p| p.is_finite() && *p > 0.0)
        .ok_or_else(|| MarketError::NoData(format!("{symbol} current price")))?;

    Ok(Quote {
        symbol: symbol.to_string(),
        current_price: price,
    })
}

fn expirations_from(data: &YahooChainData) -> Vec<Expiration> {
    data.expiration_dates
        .iter()
        .filter_map(|&ts| Expiration::from_timestamp(ts))
        .collect()
}

/// Contracts without a strike or last price are dropped.
fn chain_from(data: YahooChainData, side: OptionSide) -> Vec<OptionChainRow> {
    let Some(options) = data.options.into_iter().next() else {
        return Vec::new();
    };
    let contracts = match side {
        OptionSide::Call => options.calls,
        OptionSide::Put => options.puts,
    };

    contracts
        .into_iter()
        .filter_map(|c| {
            Some(OptionChainRow {
                strike: c.strike?,
                last_price: c.last_price?,
            })
        })
        .filter(|row| row.strike.is_finite() && row.last_price.is_finite())
        .collect()
}

// ── Yahoo Finance API response structures ───────────────────────────

#[derive(Debug, Deserialize)]
struct YahooOptionsResponse {
    #[serde(rename = "optionChain")]
    option_chain: YahooOptionChain,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChain {
    #[serde(default)]
    result: Vec<YahooChainData>,
}

#[derive(Debug, Deserialize)]
struct YahooChainData {
    #[serde(rename = "expirationDates", default)]
    expiration_dates: Vec<i64>,
    quote: Option<YahooQuoteData>,
    #[serde(default)]
    options: Vec<YahooOptions>,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteData {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct YahooOptions {
    #[serde(default)]
    calls: Vec<YahooContract>,
    #[serde(default)]
    puts: Vec<YahooContract>,
}

#[derive(Debug, Deserialize)]
struct YahooContract {
    strike: Option<f64>,
    #[serde(rename = "lastPrice")]
    last_price: Option<f64>,
}
