mod market_common;

use options_ladder::config::AppConfig;
use options_ladder::ladder::LadderError;
use options_ladder::market::{self, MarketError, OptionSide};
use options_ladder::report::{self, LadderRequest, ReportError, build_report};

use market_common::*;

fn request(ticker: &str, expiration_index: usize, side: OptionSide) -> LadderRequest {
    LadderRequest {
        ticker: ticker.to_string(),
        expiration_index,
        horizon_years: 1,
        side,
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_call_ladder() {
    let market = market();
    let report = build_report(market.as_ref(), &request("aapl", 1, OptionSide::Call))
        .await
        .unwrap();

    assert_eq!(report.symbol, "AAPL");
    assert_eq!(report.current_price, 100.0);
    assert_eq!(report.expiration.date.to_string(), "2024-01-19");
    assert_eq!(report.rows.len(), 20);
    let steps: Vec<u32> = report.rows.iter().map(|r| r.percent_step).collect();
    assert_eq!(steps, (1..=20).collect::<Vec<u32>>());

    // +1% → 101 → strike 100: 4/100 * 52 / 1 * 100 = 208
    let first = &report.rows[0];
    assert_eq!(first.matched_strike, 100.0);
    assert_eq!(first.price_delta, 0.0);
    assert_eq!(first.risk_ratio, 208);

    // +3% → 103 → strike 105
    assert_eq!(report.rows[2].matched_strike, 105.0);

    // +10% → 110: 1.6/110 * 52 * 100 = 75.6
    let tenth = &report.rows[9];
    assert_eq!(tenth.matched_strike, 110.0);
    assert_eq!(tenth.premium, 1.6);
    assert_eq!(tenth.price_delta, 10.0);
    assert_eq!(tenth.risk_ratio, 76);

    // Beyond the last listed strike everything pins to 120
    assert!(report.rows[17..].iter().all(|r| r.matched_strike == 120.0));
    assert_eq!(report.rows[19].risk_ratio, 17);
}

#[tokio::test]
async fn test_put_ladder() {
    let market = market();
    let report = build_report(market.as_ref(), &request("AAPL", 1, OptionSide::Put))
        .await
        .unwrap();

    assert_eq!(report.rows.len(), 20);

    // -3% → 97 → strike 95, but the amount decreased is the 3.00 move
    let third = &report.rows[2];
    assert_eq!(third.matched_strike, 95.0);
    assert_eq!(third.price_delta, -3.0);

    let fifth = &report.rows[4];
    assert_eq!(fifth.matched_strike, 95.0);
    assert_eq!(fifth.premium, 2.0);
    assert_eq!(fifth.price_delta, -5.0);
    assert!(report.rows.iter().all(|r| r.matched_strike <= 100.0));
    assert_eq!(report.headers()[0], "% Decrease");
}

#[tokio::test]
async fn test_expiration_index_is_the_horizon() {
    let market = market();
    let report = build_report(market.as_ref(), &request("AAPL", 2, OptionSide::Call))
        .await
        .unwrap();

    assert_eq!(report.expiration.date.to_string(), "2024-01-26");
    // 2.2/110 * 52 / 2 * 100 = 52
    assert!(report.rows.iter().all(|r| r.risk_ratio == 52));
}

#[tokio::test]
async fn test_expiration_out_of_range() {
    let market = market();
    let err = build_report(market.as_ref(), &request("AAPL", 5, OptionSide::Call))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ReportError::Market(MarketError::IndexOutOfRange {
            index: 5,
            available: 2
        })
    ));
}

#[tokio::test]
async fn test_empty_chain() {
    let market = market();
    let err = build_report(market.as_ref(), &request("EMPTY", 1, OptionSide::Call))
        .await
        .unwrap_err();
    assert!(matches!(err, ReportError::Ladder(LadderError::EmptyChain)));
}

#[tokio::test]
async fn test_no_data() {
    let market = market();
    for ticker in ["NOEXP", "ZZZZ"] {
        let err = build_report(market.as_ref(), &request(ticker, 1, OptionSide::Put))
            .await
            .unwrap_err();
        assert!(
            matches!(err, ReportError::Market(MarketError::NoData(_))),
            "{ticker}: {err}"
        );
    }

    let err = build_report(market.as_ref(), &request("not a ticker", 1, OptionSide::Put))
        .await
        .unwrap_err();
    assert!(matches!(err, ReportError::Market(MarketError::InvalidTicker(_))));
}

#[tokio::test]
async fn test_text_table() {
    let market = market();
    let report = build_report(market.as_ref(), &request("AAPL", 1, OptionSide::Call))
        .await
        .unwrap();

    let text = report.to_string();
    let lines: Vec<&str> = text.lines().collect();
    // title, header, rule, 20 rows
    assert_eq!(lines.len(), 23);
    assert!(lines[0].starts_with("AAPL calls"));
    assert!(lines[1].contains("Amount Increased"));
    assert!(lines[12].trim_end().ends_with("76%"));
}

// ── CLI commands ─────────────────────────────────────────────────────

#[test]
fn test_cli_commands_against_fixture() {
    let config = AppConfig {
        fixture: Some(fixture_path()),
        ..AppConfig::default()
    };

    report::run(&config, &request("AAPL", 1, OptionSide::Put), false).unwrap();
    report::run(&config, &request("AAPL", 2, OptionSide::Call), true).unwrap();
    market::run_expirations(&config, "aapl").unwrap();

    let err = report::run(&config, &request("AAPL", 9, OptionSide::Call), false).unwrap_err();
    assert!(err.to_string().contains("building call ladder for AAPL"));
    assert!(market::run_expirations(&config, "..").is_err());
}
