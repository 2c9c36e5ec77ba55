use rand::Rng;
use serde::Serialize;

use super::round2;
use crate::constants::forensic;

/// Forensic-integrity scores for one result.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ForensicMetrics {
    /// Benford-style anomaly score in [0,100]; lower is more natural.
    pub anomaly_score: f64,
    /// Confidence in the integrity assessment, in percent, in [50,100].
    pub confidence_pct: f64,
}

/// Draw the forensic scores. Deliberately independent of the payload: the
/// upstream product never wired real digit-frequency analysis in, so these
/// are uniform draws from the documented ranges. The generator is injected
/// so callers can fix a seed.
pub fn compute_forensic_metrics<R: Rng + ?Sized>(rng: &mut R) -> ForensicMetrics {
    ForensicMetrics {
        anomaly_score: round2(rng.gen_range(0.0..forensic::ANOMALY_SCORE_MAX)),
        confidence_pct: round2(
            rng.gen_range(forensic::CONFIDENCE_MIN_PCT..forensic::CONFIDENCE_MAX_PCT),
        ),
    }
}
