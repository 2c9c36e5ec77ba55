//! Wire codec for the streaming channel.
//!
//! The protocol carries JSON objects discriminated by a `type` field. There
//! is no correlation id, acknowledgment, or completion signal: results for a
//! request arrive asynchronously, in arbitrary order and cardinality.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtocolError;
use crate::model::{AnalysisPayload, PriceHistory, RawMetrics};

/// Client -> channel messages.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Analyze { tickers: Vec<String> },
}

/// Channel -> client messages after decoding.
#[derive(Clone, Debug)]
pub enum ServerMessage {
    /// A remote analysis failure. Recoverable: other tickers keep flowing.
    Error { message: String },
    /// One completed analysis for one ticker.
    AnalysisResult(AnalysisPayload),
    /// A `type` this protocol version does not know. Forward-compatible
    /// no-op.
    Ignored { kind: String },
}

#[derive(Deserialize)]
struct ResultFrame {
    ticker: String,
    data: ResultData,
}

#[derive(Deserialize)]
struct ResultData {
    metrics: RawMetrics,
    price_history: PriceHistory,
}

/// Decode one inbound text frame.
///
/// A frame that is not valid JSON, lacks the discriminator, or carries a
/// structurally broken `analysis_result` fails with a descriptive error;
/// the caller discards that frame and keeps dispatching.
pub fn parse_server_message(text: &str) -> Result<ServerMessage, ProtocolError> {
    let value: Value = serde_json::from_str(text)?;
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ProtocolError::MissingType)?
        .to_string();

    match kind.as_str() {
        "error" => {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .ok_or(ProtocolError::MissingMessage)?
                .to_string();
            Ok(ServerMessage::Error { message })
        }
        "analysis_result" => {
            // Pull the ticker out up front so decode failures can name it.
            let ticker = value
                .get("ticker")
                .and_then(Value::as_str)
                .unwrap_or("<unknown>")
                .to_string();

            let frame: ResultFrame =
                serde_json::from_value(value).map_err(|e| ProtocolError::MalformedResult {
                    ticker: ticker.clone(),
                    reason: e.to_string(),
                })?;

            frame
                .data
                .price_history
                .check_aligned()
                .map_err(|reason| ProtocolError::MalformedResult {
                    ticker: ticker.clone(),
                    reason,
                })?;

            Ok(ServerMessage::AnalysisResult(AnalysisPayload {
                ticker: frame.ticker,
                metrics: frame.data.metrics,
                price_history: frame.data.price_history,
            }))
        }
        _ => Ok(ServerMessage::Ignored { kind }),
    }
}
