use axum::Json;
use axum::extract::{Path, State};
use axum::response::Html;

use crate::api::error::{ApiError, JsonError};
use crate::api::render;
use crate::api::state::AppState;
use crate::api::types::parse_request;
use crate::market::OptionSide;
use crate::report::{LadderReport, LadderRequest, build_report};

pub async fn call_page(
    State(state): State<AppState>,
    Path((ticker, date, years)): Path<(String, String, String)>,
) -> Result<Html<String>, ApiError> {
    let request = parse_request(OptionSide::Call, &ticker, &date, &years)?;
    let report = run(&state, &request).await?;
    Ok(Html(render::ladder_page(&report)))
}

pub async fn put_page(
    State(state): State<AppState>,
    Path((ticker, date, years)): Path<(String, String, String)>,
) -> Result<Html<String>, ApiError> {
    let request = parse_request(OptionSide::Put, &ticker, &date, &years)?;
    let report = run(&state, &request).await?;
    Ok(Html(render::ladder_page(&report)))
}

pub async fn ladder_json(
    State(state): State<AppState>,
    Path((side, ticker, date, years)): Path<(String, String, String, String)>,
) -> Result<Json<LadderReport>, JsonError> {
    let side: OptionSide = side.parse().map_err(ApiError::BadRequest)?;
    let request = parse_request(side, &ticker, &date, &years)?;
    let report = run(&state, &request).await?;
    Ok(Json(report))
}

async fn run(state: &AppState, request: &LadderRequest) -> Result<LadderReport, ApiError> {
    build_report(state.provider.as_ref(), request)
        .await
        .map_err(|e| {
            tracing::warn!(
                ticker = %request.ticker,
                side = %request.side,
                expiration = request.expiration_index,
                error = %e,
                "ladder request failed"
            );
            ApiError::from(e)
        })
}
