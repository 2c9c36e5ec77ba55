use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use tracing::{error, info, warn};
use url::Url;

use super::{AnalysisChannel, ChannelEvent, ChannelHandle};
use crate::error::ChannelError;
use crate::protocol::ClientMessage;

/// WebSocket implementation of the analysis channel.
#[derive(Clone)]
pub struct WsChannel {
    endpoint: String,
}

impl WsChannel {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    fn validate_endpoint(&self) -> Result<(), ChannelError> {
        let url = Url::parse(&self.endpoint).map_err(|e| ChannelError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason: e.to_string(),
        })?;
        match url.scheme() {
            "ws" | "wss" => Ok(()),
            scheme => Err(ChannelError::InvalidEndpoint {
                endpoint: self.endpoint.clone(),
                reason: format!("unsupported scheme `{scheme}`"),
            }),
        }
    }
}

#[async_trait]
impl AnalysisChannel for WsChannel {
    async fn open(&self) -> Result<ChannelHandle, ChannelError> {
        self.validate_endpoint()?;

        info!("Connecting to analysis channel: {}", self.endpoint);
        let (ws_stream, _) = connect_async(&self.endpoint).await?;
        info!("✓ Analysis channel connected");

        let (mut write, mut read) = ws_stream.split();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<ClientMessage>();
        let (event_tx, event_rx) = mpsc::unbounded_channel::<ChannelEvent>();

        event_tx.send(ChannelEvent::Opened).ok();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    maybe_outbound = outbound_rx.recv() => {
                        match maybe_outbound {
                            Some(message) => {
                                let text = match serde_json::to_string(&message) {
                                    Ok(text) => text,
                                    Err(e) => {
                                        error!("❌ Failed to encode outbound message: {}", e);
                                        continue;
                                    }
                                };
                                if let Err(e) = write.send(Message::Text(text)).await {
                                    event_tx
                                        .send(ChannelEvent::Closed(e.to_string()))
                                        .ok();
                                    break;
                                }
                            }
                            None => {
                                // Session dropped its sender; close cleanly.
                                let _ = write.send(Message::Close(None)).await;
                                break;
                            }
                        }
                    }
                    maybe_frame = read.next() => {
                        match maybe_frame {
                            Some(Ok(Message::Text(text))) => {
                                event_tx.send(ChannelEvent::Message(text)).ok();
                            }
                            Some(Ok(Message::Ping(payload))) => {
                                let _ = write.send(Message::Pong(payload)).await;
                            }
                            Some(Ok(Message::Close(_))) => {
                                event_tx
                                    .send(ChannelEvent::Closed(
                                        "server closed the connection".to_string(),
                                    ))
                                    .ok();
                                break;
                            }
                            Some(Ok(_)) => {}
                            Some(Err(e)) => {
                                error!("❌ Channel error: {}", e);
                                event_tx.send(ChannelEvent::Closed(e.to_string())).ok();
                                break;
                            }
                            None => {
                                event_tx
                                    .send(ChannelEvent::Closed("stream ended".to_string()))
                                    .ok();
                                break;
                            }
                        }
                    }
                }
            }
            warn!("⚠ Channel task ended");
        });

        Ok((outbound_tx, event_rx))
    }
}
