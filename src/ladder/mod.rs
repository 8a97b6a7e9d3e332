//! Strike ladder calculation.
//!
//! For each percentage step 1..=20 the underlying price is moved up (calls) or
//! down (puts), the closest listed strike is looked up in the chain, and the
//! premium at that strike is annualized into a risk ratio. Everything here is
//! pure: no I/O, no shared state.

mod error;

pub use error::{LadderError, LadderResult};

use serde::{Deserialize, Serialize};

/// Number of percentage steps in a ladder.
pub const LADDER_STEPS: u32 = 20;

/// Weeks in a year, used to annualize the premium yield.
pub const WEEKS_PER_YEAR: f64 = 52.0;

// ── Types ───────────────────────────────────────────────────────────

/// Which way the underlying price is moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increase,
    Decrease,
}

/// One listed contract: its strike and last traded premium.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionChainRow {
    pub strike: f64,
    pub last_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LadderRow {
    pub percent_step: u32,
    /// Calls: matched strike minus current price. Puts: target price minus
    /// current price, i.e. the hypothetical move itself.
    pub price_delta: f64,
    pub matched_strike: f64,
    pub premium: f64,
    /// Annualized premium yield, in whole percent.
    pub risk_ratio: i64,
}

// ── Pure functions ──────────────────────────────────────────────────

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `current_price` moved by `percent` in `direction`, rounded to cents.
pub fn target_price(current_price: f64, percent: u32, direction: Direction) -> f64 {
    let shift = current_price * (percent as f64 / 100.0);
    match direction {
        Direction::Increase => round2(current_price + shift),
        Direction::Decrease => round2(current_price - shift),
    }
}

/// The chain row whose strike is closest to `target`.
///
/// Equidistant strikes resolve to the lower one.
pub fn nearest_strike(target: f64, chain: &[OptionChainRow]) -> LadderResult<&OptionChainRow> {
    chain
        .iter()
        .min_by(|a, b| {
            let da = (a.strike - target).abs();
            let db = (b.strike - target).abs();
            da.total_cmp(&db).then(a.strike.total_cmp(&b.strike))
        })
        .ok_or(LadderError::EmptyChain)
}

/// Premium yield annualized over `periods_per_year` years of weekly periods,
/// for a position held `horizon_periods` weeks. Rounded half-to-even.
pub fn risk_ratio(
    premium: f64,
    strike: f64,
    periods_per_year: u32,
    horizon_periods: u32,
) -> LadderResult<i64> {
    if strike == 0.0 {
        return Err(LadderError::DivideByZero("strike"));
    }
    if horizon_periods == 0 {
        return Err(LadderError::DivideByZero("horizon_periods"));
    }

    let ratio = premium / strike * (periods_per_year as f64 * WEEKS_PER_YEAR)
        / horizon_periods as f64
        * 100.0;
    if !ratio.is_finite() {
        return Err(LadderError::InvalidPrice(premium));
    }
    Ok(ratio.round_ties_even() as i64)
}

// ── Ladder ──────────────────────────────────────────────────────────

/// A 20-step ladder over one chain. Rows are computed on iteration and the
/// ladder can be iterated any number of times.
#[derive(Debug, Clone, Copy)]
pub struct Ladder<'a> {
    current_price: f64,
    chain: &'a [OptionChainRow],
    direction: Direction,
    annual_periods: u32,
    horizon: u32,
}

pub fn build_ladder(
    current_price: f64,
    chain: &[OptionChainRow],
    direction: Direction,
    annual_periods: u32,
    horizon: u32,
) -> Ladder<'_> {
    Ladder {
        current_price,
        chain,
        direction,
        annual_periods,
        horizon,
    }
}

impl<'a> Ladder<'a> {
    pub fn iter(&self) -> LadderIter<'a> {
        LadderIter {
            ladder: *self,
            step: 1,
        }
    }

    /// Evaluate every step, stopping at the first failure.
    pub fn rows(&self) -> LadderResult<Vec<LadderRow>> {
        self.iter().collect()
    }

    fn row(&self, percent_step: u32) -> LadderResult<LadderRow> {
        if !self.current_price.is_finite() || self.current_price <= 0.0 {
            return Err(LadderError::InvalidPrice(self.current_price));
        }

        let target = target_price(self.current_price, percent_step, self.direction);
        let matched = nearest_strike(target, self.chain)?;
        let risk = risk_ratio(
            matched.last_price,
            matched.strike,
            self.annual_periods,
            self.horizon,
        )?;

        let price_delta = match self.direction {
            Direction::Increase => round2(matched.strike - self.current_price),
            Direction::Decrease => round2(target - self.current_price),
        };

        Ok(LadderRow {
            percent_step,
            price_delta,
            matched_strike: matched.strike,
            premium: matched.last_price,
            risk_ratio: risk,
        })
    }
}

impl<'a> IntoIterator for &Ladder<'a> {
    type Item = LadderResult<LadderRow>;
    type IntoIter = LadderIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct LadderIter<'a> {
    ladder: Ladder<'a>,
    step: u32,
}

impl Iterator for LadderIter<'_> {
    type Item = LadderResult<LadderRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.step > LADDER_STEPS {
            return None;
        }
        let row = self.ladder.row(self.step);
        self.step += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (LADDER_STEPS + 1).saturating_sub(self.step) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for LadderIter<'_> {}
