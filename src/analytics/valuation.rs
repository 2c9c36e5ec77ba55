use rand::Rng;
use serde::Serialize;

use super::round2;
use crate::constants::valuation;
use crate::model::AnalysisPayload;

/// Scenario-based DCF valuation bounds around the latest price.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DcfValuation {
    pub base_case: f64,
    pub bull_case: f64,
    pub bear_case: f64,
    /// Discount rate, in percent. Rendered with a `%` suffix by the sink.
    pub discount_rate_pct: f64,
}

/// Compute the simulated valuation range for one payload.
///
/// Bull and bear cases carry a uniform random component (10-40% upside,
/// 5-35% downside), so two calls over identical inputs differ; the base
/// case and discount rate are deterministic. The generator is injected so
/// callers can fix a seed.
pub fn compute_dcf_valuation<R: Rng + ?Sized>(
    payload: &AnalysisPayload,
    rng: &mut R,
) -> DcfValuation {
    let price = payload.metrics.latest_price;
    let volatility = payload.metrics.technical.volatility;

    let upside = rng.gen_range(valuation::BULL_UPSIDE_MIN..valuation::BULL_UPSIDE_MAX);
    let downside = rng.gen_range(valuation::BEAR_DOWNSIDE_MIN..valuation::BEAR_DOWNSIDE_MAX);

    // Higher volatility = higher discount rate
    let discount_rate =
        valuation::BASE_DISCOUNT_RATE + volatility * valuation::VOLATILITY_DISCOUNT_MULTIPLIER;

    DcfValuation {
        base_case: round2(price),
        bull_case: round2(price * (1.0 + upside)),
        bear_case: round2(price * (1.0 - downside)),
        discount_rate_pct: round2(discount_rate * 100.0),
    }
}
