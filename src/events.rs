use std::sync::Arc;

use crate::analytics::aggregator::EnrichedResult;

/// Severity of a user-facing status message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

/// Events flowing from the session controller to the presentation side.
#[derive(Clone, Debug)]
pub enum PipelineEvent {
    /// One fully enriched result, emitted per inbound analysis event.
    Result(Arc<EnrichedResult>),
    /// A user-visible status line (validation errors, server errors,
    /// channel lifecycle notices).
    Status { level: StatusLevel, message: String },
}

impl PipelineEvent {
    pub fn info(message: impl Into<String>) -> Self {
        PipelineEvent::Status {
            level: StatusLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        PipelineEvent::Status {
            level: StatusLevel::Error,
            message: message.into(),
        }
    }
}
