use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::rating;
use crate::model::RawMetrics;

/// Discrete recommendation derived from the technical indicators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "NEUTRAL")]
    Neutral,
    #[serde(rename = "SELL")]
    Sell,
    #[serde(rename = "STRONG SELL")]
    StrongSell,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::StrongBuy => "STRONG BUY",
            Rating::Buy => "BUY",
            Rating::Neutral => "NEUTRAL",
            Rating::Sell => "SELL",
            Rating::StrongSell => "STRONG SELL",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score the technical indicators into a rating. Pure and deterministic:
/// identical inputs always yield the identical rating.
pub fn generate_rating(metrics: &RawMetrics) -> Rating {
    let technical = &metrics.technical;
    let volatility_pct = technical.volatility * 100.0;
    let mut score = 0.0_f64;

    // RSI component
    if technical.rsi < rating::RSI_OVERSOLD {
        score += 1.0; // Oversold condition, potentially bullish
    } else if technical.rsi > rating::RSI_OVERBOUGHT {
        score -= 1.0; // Overbought condition, potentially bearish
    }

    // Moving average component. Strict chained comparisons: a flat or mixed
    // ordering contributes nothing.
    if metrics.latest_price > technical.sma_50 && technical.sma_50 > technical.sma_200 {
        score += 1.0; // Bullish trend
    } else if metrics.latest_price < technical.sma_50 && technical.sma_50 < technical.sma_200 {
        score -= 1.0; // Bearish trend
    }

    // Volatility component, applied after the others
    if volatility_pct > rating::HIGH_VOLATILITY_PCT {
        score *= rating::VOLATILITY_DAMPING;
    }

    if score >= rating::STRONG_BUY_SCORE {
        Rating::StrongBuy
    } else if score >= rating::BUY_SCORE {
        Rating::Buy
    } else if score <= rating::STRONG_SELL_SCORE {
        Rating::StrongSell
    } else if score <= rating::SELL_SCORE {
        Rating::Sell
    } else {
        Rating::Neutral
    }
}
