//! Custom error types for the analytics pipeline
//!
//! Provides structured, typed errors instead of generic Box<dyn Error>

use thiserror::Error;

/// Session-level errors surfaced to the user.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("{0}")]
    Validation(String),

    #[error("channel unavailable: {0}")]
    ChannelUnavailable(String),

    #[error("channel not ready (state: {state})")]
    NotReady { state: &'static str },

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Errors decoding inbound frames. A malformed frame is terminal for that
/// frame only; the dispatch loop keeps running.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("invalid JSON frame: {0}")]
    Json(#[from] serde_json::Error),

    #[error("message missing `type` discriminator")]
    MissingType,

    #[error("`error` message missing `message` field")]
    MissingMessage,

    #[error("malformed analysis result for {ticker}: {reason}")]
    MalformedResult { ticker: String, reason: String },
}

/// Transport failures. Fatal to the session; no automatic reconnect.
#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("invalid endpoint `{endpoint}`: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}
