//! Channel transport: the seam between the session controller and the
//! streaming connection. The session only ever sees `ChannelEvent`s on a
//! queue and an outbound sender that never suspends it.

pub mod ws;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::ChannelError;
use crate::protocol::ClientMessage;

/// Lifecycle and traffic events delivered from the transport.
#[derive(Clone, Debug)]
pub enum ChannelEvent {
    /// Connection confirmed open.
    Opened,
    /// One raw inbound text frame.
    Message(String),
    /// Transport failure or close. Terminal; carries the reason.
    Closed(String),
}

/// Outbound sender plus the inbound event queue for one connection.
pub type ChannelHandle = (
    mpsc::UnboundedSender<ClientMessage>,
    mpsc::UnboundedReceiver<ChannelEvent>,
);

#[async_trait]
pub trait AnalysisChannel: Send + Sync {
    /// Dial the channel. On success the connection is live: an `Opened`
    /// event is already queued, and outbound messages are serialized and
    /// written by a background task.
    async fn open(&self) -> Result<ChannelHandle, ChannelError>;
}
