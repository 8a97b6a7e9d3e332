//! Options strike ladders.
//!
//! Fetches a ticker's current price and option chain, then lays out what the
//! nearest listed strike, its premium and an annualized premium yield look
//! like if the price moves 1% through 20% up (calls) or down (puts).
//!
//! The calculation in [`ladder`] is pure and always available. Market data
//! access, the report builder, the web server and logging sit behind the
//! default `full` feature.

pub mod config;
pub mod ladder;

#[cfg(feature = "full")]
pub mod api;
#[cfg(feature = "full")]
pub mod logging;
#[cfg(feature = "full")]
pub mod market;
#[cfg(feature = "full")]
pub mod report;
