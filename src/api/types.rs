use serde::Deserialize;

use super::error::ApiError;
use crate::market::{OptionSide, normalize_ticker};
use crate::report::LadderRequest;

// ── Request types ────────────────────────────────────────────────────

/// Fields posted by the call and put forms.
#[derive(Debug, Deserialize)]
pub struct LadderForm {
    pub ticker_1: String,
    pub date_1: String,
    pub years_1: String,
}

/// Validate raw path or form values into a request.
pub fn parse_request(
    side: OptionSide,
    ticker: &str,
    date: &str,
    years: &str,
) -> Result<LadderRequest, ApiError> {
    let ticker = normalize_ticker(ticker).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let expiration_index = date.trim().parse::<usize>().map_err(|_| {
        ApiError::BadRequest(format!("expiration must be a positive whole number, got '{date}'"))
    })?;
    if expiration_index == 0 {
        return Err(ApiError::BadRequest(
            "expiration numbering starts at 1".to_string(),
        ));
    }
    let horizon_years = years.trim().parse::<u32>().map_err(|_| {
        ApiError::BadRequest(format!("years must be a whole number, got '{years}'"))
    })?;

    Ok(LadderRequest {
        ticker,
        expiration_index,
        horizon_years,
        side,
    })
}

impl LadderRequest {
    /// Path of the HTML page showing this request.
    pub fn page_path(&self) -> String {
        let prefix = match self.side {
            OptionSide::Call => "calldata",
            OptionSide::Put => "putdata",
        };
        format!(
            "/{prefix}/{}/{}/{}",
            self.ticker, self.expiration_index, self.horizon_years
        )
    }
}
