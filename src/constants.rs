//! Application-wide constants and magic numbers
//!
//! This module centralizes the scoring thresholds and valuation multipliers
//! so they can be tuned in one place.

/// Rating engine constants
pub mod rating {
    /// RSI below this is an oversold condition (+1 to the score)
    pub const RSI_OVERSOLD: f64 = 30.0;

    /// RSI above this is an overbought condition (-1 to the score)
    pub const RSI_OVERBOUGHT: f64 = 70.0;

    /// Annualized volatility (in percent) above which confidence is reduced
    pub const HIGH_VOLATILITY_PCT: f64 = 40.0;

    /// Score multiplier applied in high-volatility regimes
    pub const VOLATILITY_DAMPING: f64 = 0.8;

    /// Score boundaries for the discrete rating, inclusive as written
    pub const STRONG_BUY_SCORE: f64 = 1.5;
    pub const BUY_SCORE: f64 = 0.5;
    pub const SELL_SCORE: f64 = -0.5;
    pub const STRONG_SELL_SCORE: f64 = -1.5;
}

/// Risk metric constants
pub mod risk {
    /// Simplified beta: volatility scaled against the market
    pub const BETA_VOLATILITY_MULTIPLIER: f64 = 1.2;

    /// Sharpe ratio baseline; lower volatility keeps the ratio near this
    pub const SHARPE_BASE: f64 = 0.8;

    /// Volatility penalty on the Sharpe ratio (can push it negative)
    pub const SHARPE_VOLATILITY_MULTIPLIER: f64 = 2.0;
}

/// Scenario valuation constants
pub mod valuation {
    /// Bull case upside, uniform draw bounds (10-40%)
    pub const BULL_UPSIDE_MIN: f64 = 0.10;
    pub const BULL_UPSIDE_MAX: f64 = 0.40;

    /// Bear case downside, uniform draw bounds (5-35%)
    pub const BEAR_DOWNSIDE_MIN: f64 = 0.05;
    pub const BEAR_DOWNSIDE_MAX: f64 = 0.35;

    /// Discount rate floor
    pub const BASE_DISCOUNT_RATE: f64 = 0.05;

    /// Volatility contribution to the discount rate
    pub const VOLATILITY_DISCOUNT_MULTIPLIER: f64 = 5.0;
}

/// Forensic integrity constants
pub mod forensic {
    /// Anomaly score upper bound
    pub const ANOMALY_SCORE_MAX: f64 = 100.0;

    /// Confidence bounds, in percent
    pub const CONFIDENCE_MIN_PCT: f64 = 50.0;
    pub const CONFIDENCE_MAX_PCT: f64 = 100.0;
}
