//! Domain types for the analytics pipeline.

use chrono::NaiveDate;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::SessionError;

/// A batch of tickers submitted for analysis.
///
/// Tickers are trimmed on construction; duplicates are allowed and are not
/// deduplicated. An empty list (after trimming) is a validation error and
/// never reaches the channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisRequest {
    tickers: Vec<String>,
}

impl AnalysisRequest {
    pub fn new(tickers: Vec<String>) -> Result<Self, SessionError> {
        let tickers: Vec<String> = tickers
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        if tickers.is_empty() {
            return Err(SessionError::Validation(
                "Please enter at least one ticker".to_string(),
            ));
        }
        Ok(Self { tickers })
    }

    /// Parse a comma-separated ticker list, e.g. `"AAPL, MSFT,BTC"`.
    pub fn from_input(input: &str) -> Result<Self, SessionError> {
        Self::new(input.split(',').map(str::to_string).collect())
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn into_tickers(self) -> Vec<String> {
        self.tickers
    }
}

/// Aligned historical series for one ticker. Index `i` across the three
/// vectors is one observation.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct PriceHistory {
    pub dates: Vec<NaiveDate>,
    pub prices: Vec<f64>,
    pub volumes: Vec<f64>,
}

impl PriceHistory {
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Check the alignment invariant: equal lengths, at least one observation.
    pub fn check_aligned(&self) -> Result<(), String> {
        if self.prices.is_empty() {
            return Err("price history is empty".to_string());
        }
        if self.dates.len() != self.prices.len() || self.volumes.len() != self.prices.len() {
            return Err(format!(
                "price history misaligned: {} dates, {} prices, {} volumes",
                self.dates.len(),
                self.prices.len(),
                self.volumes.len()
            ));
        }
        Ok(())
    }
}

/// Technical indicators computed upstream. The upstream contract keeps
/// `rsi` in [0,100]; `volatility` is a fractional rate (0.25 = 25%).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct TechnicalIndicators {
    pub rsi: f64,
    pub sma_50: f64,
    pub sma_200: f64,
    pub volatility: f64,
}

/// Market cap is either a number or the upstream `"N/A"` sentinel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MarketCap {
    Known(f64),
    Unavailable,
}

impl fmt::Display for MarketCap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketCap::Known(value) => write!(f, "${value:.0}"),
            MarketCap::Unavailable => write!(f, "N/A"),
        }
    }
}

impl Serialize for MarketCap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MarketCap::Known(value) => serializer.serialize_f64(*value),
            MarketCap::Unavailable => serializer.serialize_str("N/A"),
        }
    }
}

impl<'de> Deserialize<'de> for MarketCap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Number(n) => n
                .as_f64()
                .map(MarketCap::Known)
                .ok_or_else(|| de::Error::custom("market_cap out of f64 range")),
            Value::String(s) if s == "N/A" => Ok(MarketCap::Unavailable),
            other => Err(de::Error::custom(format!(
                "market_cap must be a number or \"N/A\", got {other}"
            ))),
        }
    }
}

/// Raw per-ticker metrics as delivered by the upstream service.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct RawMetrics {
    pub latest_price: f64,
    pub volume: f64,
    pub market_cap: MarketCap,
    pub technical: TechnicalIndicators,
}

/// One successful server-side analysis of one ticker. Owned by the session
/// controller until consumed by the aggregator, then moved into the
/// enriched result.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct AnalysisPayload {
    pub ticker: String,
    pub metrics: RawMetrics,
    pub price_history: PriceHistory,
}
