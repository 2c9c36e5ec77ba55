use serde::Serialize;

use super::round2;
use crate::constants::risk;
use crate::model::AnalysisPayload;

/// Risk profile derived from volatility and the price series.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RiskMetrics {
    pub beta: f64,
    pub sharpe_ratio: f64,
    /// Largest peak-to-trough decline observed, in percent.
    pub max_drawdown_pct: f64,
}

/// Compute the simplified risk metrics for one payload.
///
/// The Sharpe ratio is intentionally unclamped: volatility above 0.4 drives
/// it negative rather than flooring at zero. Assumes a validated, non-empty
/// price history.
pub fn compute_risk_metrics(payload: &AnalysisPayload) -> RiskMetrics {
    let volatility = payload.metrics.technical.volatility;
    let beta = volatility * risk::BETA_VOLATILITY_MULTIPLIER;
    let sharpe_ratio = risk::SHARPE_BASE - volatility * risk::SHARPE_VOLATILITY_MULTIPLIER;

    RiskMetrics {
        beta: round2(beta),
        sharpe_ratio: round2(sharpe_ratio),
        max_drawdown_pct: round2(max_drawdown(&payload.price_history.prices) * 100.0),
    }
}

/// Largest fractional decline from a running peak. A single observation or
/// a monotonically rising series yields 0.
fn max_drawdown(prices: &[f64]) -> f64 {
    let mut peak = prices.first().copied().unwrap_or(0.0);
    let mut max_drawdown = 0.0_f64;

    for &price in prices.iter().skip(1) {
        if price > peak {
            peak = price;
        } else {
            let drawdown = (peak - price) / peak;
            if drawdown > max_drawdown {
                max_drawdown = drawdown;
            }
        }
    }

    max_drawdown
}
