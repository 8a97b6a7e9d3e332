use std::sync::Arc;

use crate::market::MarketData;

/// Shared across requests. Holds nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn MarketData>,
}

impl AppState {
    pub fn new(provider: Arc<dyn MarketData>) -> Self {
        Self { provider }
    }
}
