//! The message-driven session controller.
//!
//! Owns the streaming channel handles, validates submissions, dispatches
//! inbound events through the aggregator, and publishes enriched results
//! and status messages on the event bus. All mutation happens on one
//! control flow: each inbound message is processed to completion before the
//! next one.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::analytics::aggregator::Aggregator;
use crate::bus::EventBus;
use crate::data::store::ResultStore;
use crate::error::SessionError;
use crate::events::PipelineEvent;
use crate::model::{AnalysisPayload, AnalysisRequest};
use crate::protocol::{parse_server_message, ClientMessage, ServerMessage};
use crate::transport::ChannelEvent;

/// Lifecycle of the streaming session. `Closed` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Ready,
    Awaiting,
    Closed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Disconnected => "disconnected",
            SessionState::Connecting => "connecting",
            SessionState::Ready => "ready",
            SessionState::Awaiting => "awaiting",
            SessionState::Closed => "closed",
        }
    }
}

pub struct SessionController {
    state: SessionState,
    outbound: mpsc::UnboundedSender<ClientMessage>,
    aggregator: Aggregator,
    store: ResultStore,
    bus: EventBus,
    quiet_period: Duration,
}

impl SessionController {
    pub fn new(
        outbound: mpsc::UnboundedSender<ClientMessage>,
        bus: EventBus,
        store: ResultStore,
        aggregator: Aggregator,
        quiet_period: Duration,
    ) -> Self {
        Self {
            state: SessionState::Disconnected,
            outbound,
            aggregator,
            store,
            bus,
            quiet_period,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Transition out of `Disconnected` when the transport dial begins.
    pub fn begin_connect(&mut self) {
        if self.state == SessionState::Disconnected {
            self.state = SessionState::Connecting;
        }
    }

    /// Validate a raw comma-separated ticker line and submit it.
    pub fn submit_line(&mut self, input: &str) -> Result<(), SessionError> {
        let request = match AnalysisRequest::from_input(input) {
            Ok(request) => request,
            Err(e) => {
                self.bus.publish(PipelineEvent::error(e.to_string())).ok();
                return Err(e);
            }
        };
        self.submit_request(request)
    }

    /// Send an analyze request over the channel. Accepted in `Ready` and
    /// `Awaiting` (outstanding requests do not block further submissions).
    pub fn submit_request(&mut self, request: AnalysisRequest) -> Result<(), SessionError> {
        match self.state {
            SessionState::Closed => {
                let err = SessionError::ChannelUnavailable(
                    "session is closed; restart to analyze again".to_string(),
                );
                self.bus.publish(PipelineEvent::error(err.to_string())).ok();
                Err(err)
            }
            SessionState::Disconnected | SessionState::Connecting => {
                let err = SessionError::NotReady {
                    state: self.state.as_str(),
                };
                self.bus.publish(PipelineEvent::error(err.to_string())).ok();
                Err(err)
            }
            SessionState::Ready | SessionState::Awaiting => {
                let tickers = request.into_tickers();
                info!("📨 Submitting analysis request for {:?}", tickers);
                self.bus
                    .publish(PipelineEvent::info("Analyzing tickers..."))
                    .ok();

                if self.outbound.send(ClientMessage::Analyze { tickers }).is_err() {
                    // Writer task is gone, the channel is dead.
                    self.state = SessionState::Closed;
                    let err = SessionError::ChannelUnavailable(
                        "outbound channel is gone".to_string(),
                    );
                    self.bus.publish(PipelineEvent::error(err.to_string())).ok();
                    return Err(err);
                }

                self.state = SessionState::Awaiting;
                Ok(())
            }
        }
    }

    /// Dispatch one channel event. Never panics and never tears down the
    /// session except on channel close.
    pub fn handle_event(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::Opened => {
                info!("✓ Analysis channel established");
                if matches!(
                    self.state,
                    SessionState::Disconnected | SessionState::Connecting
                ) {
                    self.state = SessionState::Ready;
                }
            }
            ChannelEvent::Message(text) => self.dispatch_frame(&text),
            ChannelEvent::Closed(reason) => {
                error!("❌ Analysis channel closed: {}", reason);
                self.state = SessionState::Closed;
                self.bus
                    .publish(PipelineEvent::error(format!(
                        "Analysis channel closed: {reason}"
                    )))
                    .ok();
            }
        }
    }

    fn dispatch_frame(&mut self, text: &str) {
        match parse_server_message(text) {
            Ok(ServerMessage::Error { message }) => {
                warn!("Server reported an analysis error: {}", message);
                self.bus
                    .publish(PipelineEvent::error(format!("Error: {message}")))
                    .ok();
            }
            Ok(ServerMessage::AnalysisResult(payload)) => self.dispatch_result(payload),
            Ok(ServerMessage::Ignored { kind }) => {
                debug!("Ignoring message of unknown type `{}`", kind);
            }
            Err(e) => {
                // Terminal for this frame only; keep dispatching.
                warn!("Discarding malformed frame: {}", e);
                self.bus.publish(PipelineEvent::error(e.to_string())).ok();
            }
        }
    }

    fn dispatch_result(&mut self, payload: AnalysisPayload) {
        let ticker = payload.ticker.clone();
        let enriched = Arc::new(self.aggregator.aggregate(payload));
        info!(
            "📊 Enriched {}: rating {}, max drawdown {:.2}%",
            ticker, enriched.rating, enriched.risk.max_drawdown_pct
        );

        // Replace the ticker's entry wholesale; stale results must never
        // survive a re-submission.
        self.store.replace(enriched.clone());
        self.bus.publish(PipelineEvent::Result(enriched)).ok();
    }

    /// The quiet-period heuristic: with no completion signal in the
    /// protocol, an awaiting batch with no channel traffic for the
    /// configured window is treated as complete.
    fn batch_quiet(&mut self) {
        self.state = SessionState::Ready;
        self.bus
            .publish(PipelineEvent::info(format!(
                "No further results for {}s; {} ticker(s) enriched so far",
                self.quiet_period.as_secs(),
                self.store.len()
            )))
            .ok();
    }

    /// The single-threaded event loop: channel events and user submissions
    /// interleave on one control flow, each processed to completion.
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<ChannelEvent>,
        mut requests: mpsc::UnboundedReceiver<String>,
    ) {
        self.begin_connect();
        let mut requests_open = true;

        loop {
            tokio::select! {
                maybe_event = events.recv() => {
                    match maybe_event {
                        Some(event) => self.handle_event(event),
                        None => self.handle_event(ChannelEvent::Closed(
                            "event queue dropped".to_string(),
                        )),
                    }
                    if self.state == SessionState::Closed {
                        break;
                    }
                }
                maybe_line = requests.recv(), if requests_open => {
                    match maybe_line {
                        Some(line) => {
                            let _ = self.submit_line(&line);
                        }
                        None => requests_open = false,
                    }
                }
                _ = tokio::time::sleep(self.quiet_period),
                    if self.state == SessionState::Awaiting =>
                {
                    self.batch_quiet();
                }
            }
        }

        info!("Session closed");
    }
}
