use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use super::forensic::{compute_forensic_metrics, ForensicMetrics};
use super::rating::{generate_rating, Rating};
use super::risk::{compute_risk_metrics, RiskMetrics};
use super::valuation::{compute_dcf_valuation, DcfValuation};
use crate::model::AnalysisPayload;

/// The raw payload plus every derived metric, assembled once per inbound
/// analysis event. Downstream consumers share this one instance; the random
/// components make recomputation produce different numbers than what was
/// already shown.
#[derive(Clone, Debug, Serialize)]
pub struct EnrichedResult {
    pub payload: AnalysisPayload,
    pub risk: RiskMetrics,
    pub forensic: ForensicMetrics,
    pub valuation: DcfValuation,
    pub rating: Rating,
}

impl EnrichedResult {
    pub fn ticker(&self) -> &str {
        &self.payload.ticker
    }
}

/// Assembles enriched results. Owns the random source for the forensic and
/// valuation draws so a seed can be fixed for reproducible output.
pub struct Aggregator {
    rng: StdRng,
}

impl Aggregator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Invoke each metrics operation and the rating engine exactly once and
    /// assemble the result. Never fails: payload validation happens before
    /// the payload reaches the aggregator.
    pub fn aggregate(&mut self, payload: AnalysisPayload) -> EnrichedResult {
        let risk = compute_risk_metrics(&payload);
        let forensic = compute_forensic_metrics(&mut self.rng);
        let valuation = compute_dcf_valuation(&payload, &mut self.rng);
        let rating = generate_rating(&payload.metrics);

        EnrichedResult {
            payload,
            risk,
            forensic,
            valuation,
            rating,
        }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}
