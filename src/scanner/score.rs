//! Opportunity scoring
//!
//! Volume and liquidity are log10-scaled so size has diminishing returns.
//! Spread and slippage penalties are linear because execution cost eats into
//! profit roughly proportionally.

use crate::config::ScoringConfig;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Inputs to the score, all taken from one scan observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreInputs {
    pub spread: Decimal,
    pub volume_24h: Decimal,
    pub liquidity: Decimal,
    pub abs_move: Decimal,
    pub slippage_buy: Decimal,
    pub slippage_sell: Decimal,
}

/// Pure scoring model
#[derive(Debug, Clone)]
pub struct ScoringModel {
    config: ScoringConfig,
}

impl ScoringModel {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score an observation, 0 (ignore) to 100 (strong)
    pub fn score(&self, inputs: &ScoreInputs) -> u8 {
        let c = &self.config;

        let volume = log_scaled(inputs.volume_24h, c.volume_log_ceiling);
        let liquidity = log_scaled(inputs.liquidity, c.liquidity_log_ceiling);
        let movement = linear(inputs.abs_move, c.strong_move);
        let spread = linear(inputs.spread, c.bad_spread);
        let slippage = linear(inputs.slippage_buy + inputs.slippage_sell, c.bad_slippage);

        let raw = c.volume_weight * volume + c.liquidity_weight * liquidity
            + c.movement_weight * movement
            - c.spread_penalty * spread
            - c.slippage_penalty * slippage;

        if !raw.is_finite() {
            return 0;
        }
        raw.clamp(0.0, 100.0).round() as u8
    }
}

impl Default for ScoringModel {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// `log10(1 + value) / ceiling`, clamped to [0, 1]
fn log_scaled(value: Decimal, ceiling: f64) -> f64 {
    let value = to_f64(value).max(0.0);
    if ceiling <= 0.0 {
        return 0.0;
    }
    ((1.0 + value).log10() / ceiling).clamp(0.0, 1.0)
}

/// `|value| / saturation`, clamped to [0, 1]
fn linear(value: Decimal, saturation: f64) -> f64 {
    let value = to_f64(value).abs();
    if saturation <= 0.0 {
        return if value > 0.0 { 1.0 } else { 0.0 };
    }
    (value / saturation).clamp(0.0, 1.0)
}
