#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;

use options_ladder::api::{self, state::AppState};
use options_ladder::config::ProviderConfig;
use options_ladder::market::StaticMarket;

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/market.json")
}

/// AAPL at 100 with two expirations, EMPTY with a strikeless chain, NOEXP with
/// no expirations.
pub fn market() -> Arc<StaticMarket> {
    Arc::new(StaticMarket::load(&fixture_path()).expect("loading fixtures/market.json"))
}

/// Serve `app` on an ephemeral port; returns the base URL.
pub async fn spawn_router(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// The ladder app over the fixture market.
pub async fn spawn_server() -> String {
    spawn_router(api::router(AppState::new(market()))).await
}

// ── Yahoo stand-in ───────────────────────────────────────────────────

/// AAPL at 100; call strikes 100/110/120, put strikes 90/95.
pub const AAPL_OPTIONS: &str = r#"{
    "optionChain": {
        "result": [{
            "underlyingSymbol": "AAPL",
            "expirationDates": [1705622400, 1706227200],
            "quote": { "symbol": "AAPL", "regularMarketPrice": 100.0 },
            "options": [{
                "expirationDate": 1705622400,
                "calls": [
                    { "strike": 100.0, "lastPrice": 4.0 },
                    { "strike": 110.0, "lastPrice": 1.6 },
                    { "strike": 120.0, "lastPrice": 0.4 }
                ],
                "puts": [
                    { "strike": 90.0, "lastPrice": 1.1 },
                    { "strike": 95.0, "lastPrice": 2.0 }
                ]
            }]
        }],
        "error": null
    }
}"#;

const INVALID_CRUMB: &str =
    r#"{"finance":{"result":null,"error":{"code":"Unauthorized","description":"Invalid Crumb"}}}"#;

/// Request counters. Only the most recently issued crumb is accepted, so
/// bumping `crumbs_issued` invalidates the client's cached one.
#[derive(Default)]
pub struct YahooStub {
    pub crumbs_issued: AtomicUsize,
    pub options_requests: AtomicUsize,
}

impl YahooStub {
    fn current_crumb(&self) -> String {
        format!("crumb{}", self.crumbs_issued.load(Ordering::SeqCst))
    }
}

async fn stub_cookie() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::SET_COOKIE, "A3=stub-session; Path=/")],
        "",
    )
        .into_response()
}

async fn stub_crumb(State(stub): State<Arc<YahooStub>>) -> String {
    stub.crumbs_issued.fetch_add(1, Ordering::SeqCst);
    stub.current_crumb()
}

/// Symbols pick the response: AAPL is a real chain, GONE 404s, DOWN 500s,
/// GARBLED returns a non-JSON body, LOCKED always rejects the crumb.
async fn stub_options(
    State(stub): State<Arc<YahooStub>>,
    Path(symbol): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    stub.options_requests.fetch_add(1, Ordering::SeqCst);

    let crumb_ok = params.get("crumb") == Some(&stub.current_crumb());
    if !crumb_ok || symbol == "LOCKED" {
        return (StatusCode::UNAUTHORIZED, INVALID_CRUMB).into_response();
    }

    match symbol.as_str() {
        "AAPL" => ([(header::CONTENT_TYPE, "application/json")], AAPL_OPTIONS).into_response(),
        "DOWN" => (StatusCode::INTERNAL_SERVER_ERROR, "upstream down").into_response(),
        "GARBLED" => ([(header::CONTENT_TYPE, "application/json")], "<html>").into_response(),
        _ => (StatusCode::NOT_FOUND, "").into_response(),
    }
}

/// A local stand-in for the Yahoo cookie, crumb and options endpoints.
/// Returns a provider config pointed at it plus the shared counters.
pub async fn spawn_yahoo_stub() -> (ProviderConfig, Arc<YahooStub>) {
    let stub = Arc::new(YahooStub::default());
    let app = Router::new()
        .route("/cookie", get(stub_cookie))
        .route("/v1/test/getcrumb", get(stub_crumb))
        .route("/v7/finance/options/{symbol}", get(stub_options))
        .with_state(stub.clone());
    let base = spawn_router(app).await;

    let config = ProviderConfig {
        base_url: format!("{base}/v7/finance"),
        cookie_url: format!("{base}/cookie"),
        crumb_url: format!("{base}/v1/test/getcrumb"),
        timeout_secs: 5,
        ..ProviderConfig::default()
    };
    (config, stub)
}
