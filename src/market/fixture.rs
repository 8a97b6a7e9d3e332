use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Expiration, MarketData, MarketError, MarketResult, OptionSide, Quote};
use crate::ladder::OptionChainRow;

// ── Fixture file format ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    pub symbols: BTreeMap<String, FixtureSymbol>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSymbol {
    pub price: f64,
    #[serde(default)]
    pub expirations: Vec<FixtureExpiration>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureExpiration {
    pub date: NaiveDate,
    #[serde(default)]
    pub calls: Vec<OptionChainRow>,
    #[serde(default)]
    pub puts: Vec<OptionChainRow>,
}

// ── Provider ────────────────────────────────────────────────────────

/// Market data served from memory. Symbols are matched case-insensitively.
pub struct StaticMarket {
    symbols: BTreeMap<String, FixtureSymbol>,
}

impl StaticMarket {
    pub fn new(fixture: Fixture) -> Self {
        let symbols = fixture
            .symbols
            .into_iter()
            .map(|(symbol, data)| (symbol.to_uppercase(), data))
            .collect();
        Self { symbols }
    }

    pub fn from_json(json: &str) -> MarketResult<Self> {
        let fixture: Fixture =
            serde_json::from_str(json).map_err(|e| MarketError::Parse(format!("fixture: {e}")))?;
        Ok(Self::new(fixture))
    }

    pub fn load(path: &Path) -> MarketResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
            .map_err(|e| MarketError::Parse(format!("{}: {e}", path.display())))
    }

    fn symbol(&self, symbol: &str) -> MarketResult<&FixtureSymbol> {
        self.symbols
            .get(&symbol.to_uppercase())
            .ok_or_else(|| MarketError::NoData(symbol.to_string()))
    }
}

#[async_trait]
impl MarketData for StaticMarket {
    async fn quote(&self, symbol: &str) -> MarketResult<Quote> {
        let data = self.symbol(symbol)?;
        Ok(Quote {
            symbol: symbol.to_uppercase(),
            current_price: data.price,
        })
    }

    async fn expirations(&self, symbol: &str) -> MarketResult<Vec<Expiration>> {
        let data = self.symbol(symbol)?;
        Ok(data
            .expirations
            .iter()
            .map(|e| Expiration::from_date(e.date))
            .collect())
    }

    async fn option_chain(
        &self,
        symbol: &str,
        expiration: &Expiration,
        side: OptionSide,
    ) -> MarketResult<Vec<OptionChainRow>> {
        let data = self.symbol(symbol)?;
        let listed = data
            .expirations
            .iter()
            .find(|e| e.date == expiration.date)
            .ok_or_else(|| MarketError::NoData(format!("{symbol} {}", expiration.date)))?;

        Ok(match side {
            OptionSide::Call => listed.calls.clone(),
            OptionSide::Put => listed.puts.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "symbols": {
            "msft": {
                "price": 400.0,
                "expirations": [
                    {
                        "date": "2024-03-15",
                        "calls": [{ "strike": 410.0, "last_price": 6.5 }],
                        "puts": [{ "strike": 390.0, "last_price": 5.25 }]
                    },
                    { "date": "2024-03-22" }
                ]
            }
        }
    }"#;

    #[tokio::test]
    async fn test_static_market_lookup() {
        let market = StaticMarket::from_json(FIXTURE).unwrap();

        let quote = market.quote("MSFT").await.unwrap();
        assert_eq!(quote.current_price, 400.0);

        let expiries = market.expirations("msft").await.unwrap();
        assert_eq!(expiries.len(), 2);

        let puts = market
            .option_chain("MSFT", &expiries[0], OptionSide::Put)
            .await
            .unwrap();
        assert_eq!(puts, vec![OptionChainRow { strike: 390.0, last_price: 5.25 }]);

        let calls = market
            .option_chain("MSFT", &expiries[1], OptionSide::Call)
            .await
            .unwrap();
        assert!(calls.is_empty());
    }

    #[tokio::test]
    async fn test_static_market_unknown_symbol() {
        let market = StaticMarket::from_json(FIXTURE).unwrap();
        assert!(matches!(
            market.quote("AAPL").await,
            Err(MarketError::NoData(_))
        ));
    }

    #[test]
    fn test_bad_fixture_is_parse_error() {
        assert!(matches!(
            StaticMarket::from_json("{\"symbols\": 3}"),
            Err(MarketError::Parse(_))
        ));
    }
}
