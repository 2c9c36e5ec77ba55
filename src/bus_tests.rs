//! Unit tests for the EventBus - broadcast plumbing between the session
//! and the presentation side.

#[cfg(test)]
mod bus_tests {
    use crate::bus::EventBus;
    use crate::events::{PipelineEvent, StatusLevel};

    #[tokio::test]
    async fn test_publish_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(PipelineEvent::info("Analyzing tickers...")).unwrap();

        let event = rx.recv().await.unwrap();
        match event {
            PipelineEvent::Status { level, message } => {
                assert_eq!(level, StatusLevel::Info);
                assert_eq!(message, "Analyzing tickers...");
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_multiple_subscribers_see_every_event() {
        let bus = EventBus::new(16);
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        bus.publish(PipelineEvent::error("boom")).unwrap();

        assert!(matches!(
            first.recv().await.unwrap(),
            PipelineEvent::Status { level: StatusLevel::Error, .. }
        ));
        assert!(matches!(
            second.recv().await.unwrap(),
            PipelineEvent::Status { level: StatusLevel::Error, .. }
        ));
    }

    #[test]
    fn test_publish_without_subscribers_errors() {
        let bus = EventBus::new(16);
        assert!(bus.publish(PipelineEvent::info("nobody listening")).is_err());
    }

    #[tokio::test]
    async fn test_events_arrive_in_publish_order() {
        let bus = EventBus::new(64);
        let mut rx = bus.subscribe();

        for i in 0..10 {
            bus.publish(PipelineEvent::info(format!("event {i}"))).unwrap();
        }

        for i in 0..10 {
            let PipelineEvent::Status { message, .. } = rx.recv().await.unwrap() else {
                panic!("expected Status");
            };
            assert_eq!(message, format!("event {i}"));
        }
    }
}
