use crate::events::PipelineEvent;
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<PipelineEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PipelineEvent> {
        self.tx.subscribe()
    }

    pub fn publish(
        &self,
        event: PipelineEvent,
    ) -> Result<usize, broadcast::error::SendError<PipelineEvent>> {
        self.tx.send(event)
    }
}
