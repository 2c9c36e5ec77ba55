//! Unit tests for the session controller state machine and its dispatch
//! loop.

#[cfg(test)]
mod session_tests {
    use std::time::Duration;

    use serde_json::json;
    use tokio::sync::broadcast;
    use tokio::sync::mpsc;

    use crate::analytics::aggregator::Aggregator;
    use crate::bus::EventBus;
    use crate::data::store::ResultStore;
    use crate::error::SessionError;
    use crate::events::{PipelineEvent, StatusLevel};
    use crate::model::AnalysisRequest;
    use crate::protocol::ClientMessage;
    use crate::session::{SessionController, SessionState};
    use crate::transport::ChannelEvent;

    struct Harness {
        session: SessionController,
        outbound: mpsc::UnboundedReceiver<ClientMessage>,
        emitted: broadcast::Receiver<PipelineEvent>,
        store: ResultStore,
    }

    fn harness() -> Harness {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let bus = EventBus::new(64);
        let emitted = bus.subscribe();
        let store = ResultStore::new();
        let session = SessionController::new(
            outbound_tx,
            bus,
            store.clone(),
            Aggregator::with_seed(7),
            Duration::from_secs(5),
        );
        Harness {
            session,
            outbound: outbound_rx,
            emitted,
            store,
        }
    }

    fn open_session(harness: &mut Harness) {
        harness.session.begin_connect();
        harness.session.handle_event(ChannelEvent::Opened);
        assert_eq!(harness.session.state(), SessionState::Ready);
    }

    fn result_frame(ticker: &str, prices: &[f64]) -> String {
        let dates: Vec<String> = (1..=prices.len())
            .map(|day| format!("2025-01-{day:02}"))
            .collect();
        json!({
            "type": "analysis_result",
            "ticker": ticker,
            "data": {
                "metrics": {
                    "latest_price": prices.last().unwrap(),
                    "volume": 1_000_000.0,
                    "market_cap": "N/A",
                    "technical": {
                        "rsi": 45.0,
                        "sma_50": 100.0,
                        "sma_200": 95.0,
                        "volatility": 0.2
                    }
                },
                "price_history": {
                    "dates": dates,
                    "prices": prices,
                    "volumes": vec![1_000_000.0; prices.len()]
                }
            }
        })
        .to_string()
    }

    // ============= State Machine Tests =============

    #[test]
    fn test_initial_state_is_disconnected() {
        let harness = harness();
        assert_eq!(harness.session.state(), SessionState::Disconnected);
    }

    #[test]
    fn test_open_transitions_to_ready() {
        let mut harness = harness();
        harness.session.begin_connect();
        assert_eq!(harness.session.state(), SessionState::Connecting);
        harness.session.handle_event(ChannelEvent::Opened);
        assert_eq!(harness.session.state(), SessionState::Ready);
    }

    #[test]
    fn test_submit_transitions_to_awaiting() {
        let mut harness = harness();
        open_session(&mut harness);

        harness.session.submit_line("AAPL, MSFT").unwrap();
        assert_eq!(harness.session.state(), SessionState::Awaiting);

        let sent = harness.outbound.try_recv().unwrap();
        let ClientMessage::Analyze { tickers } = sent;
        assert_eq!(tickers, vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn test_submit_before_open_is_rejected() {
        let mut harness = harness();
        harness.session.begin_connect();

        let err = harness.session.submit_line("AAPL").unwrap_err();
        assert!(matches!(err, SessionError::NotReady { state: "connecting" }));
        assert!(harness.outbound.try_recv().is_err());
    }

    #[test]
    fn test_close_is_terminal_for_submissions() {
        let mut harness = harness();
        open_session(&mut harness);
        harness
            .session
            .handle_event(ChannelEvent::Closed("transport failure".to_string()));
        assert_eq!(harness.session.state(), SessionState::Closed);

        let err = harness.session.submit_line("AAPL").unwrap_err();
        assert!(matches!(err, SessionError::ChannelUnavailable(_)));
        assert!(harness.outbound.try_recv().is_err());
    }

    #[test]
    fn test_submissions_allowed_while_awaiting() {
        let mut harness = harness();
        open_session(&mut harness);

        harness.session.submit_line("AAPL").unwrap();
        harness.session.submit_line("MSFT").unwrap();
        assert_eq!(harness.session.state(), SessionState::Awaiting);

        assert!(harness.outbound.try_recv().is_ok());
        assert!(harness.outbound.try_recv().is_ok());
    }

    // ============= Validation Tests =============

    #[test]
    fn test_empty_submission_never_reaches_the_channel() {
        let mut harness = harness();
        open_session(&mut harness);

        for input in ["", "   ", " , ,, "] {
            let err = harness.session.submit_line(input).unwrap_err();
            assert!(matches!(err, SessionError::Validation(_)), "input: {input:?}");
        }

        assert!(harness.outbound.try_recv().is_err());
        assert_eq!(harness.session.state(), SessionState::Ready);
    }

    #[test]
    fn test_request_trims_and_keeps_duplicates() {
        let request = AnalysisRequest::from_input(" AAPL , MSFT,AAPL, ").unwrap();
        assert_eq!(request.tickers(), ["AAPL", "MSFT", "AAPL"]);
    }

    // ============= Dispatch Tests =============

    fn next_result(rx: &mut broadcast::Receiver<PipelineEvent>) -> Option<PipelineEvent> {
        while let Ok(event) = rx.try_recv() {
            if matches!(event, PipelineEvent::Result(_)) {
                return Some(event);
            }
        }
        None
    }

    #[test]
    fn test_result_event_emits_enriched_result() {
        let mut harness = harness();
        open_session(&mut harness);
        harness.session.submit_line("AAPL").unwrap();

        harness
            .session
            .handle_event(ChannelEvent::Message(result_frame("AAPL", &[100.0, 50.0])));

        let event = next_result(&mut harness.emitted).expect("no result emitted");
        let PipelineEvent::Result(result) = event else {
            unreachable!()
        };
        assert_eq!(result.ticker(), "AAPL");
        assert_eq!(result.risk.max_drawdown_pct, 50.00);
        assert!(harness.store.latest("AAPL").is_some());
    }

    #[test]
    fn test_duplicate_results_emit_independently() {
        let mut harness = harness();
        open_session(&mut harness);
        harness.session.submit_line("AAPL").unwrap();

        harness
            .session
            .handle_event(ChannelEvent::Message(result_frame("AAPL", &[100.0, 90.0])));
        harness
            .session
            .handle_event(ChannelEvent::Message(result_frame("AAPL", &[100.0, 50.0])));

        // Two emissions, in arrival order, no deduplication.
        let first = next_result(&mut harness.emitted).expect("first result");
        let second = next_result(&mut harness.emitted).expect("second result");
        let (PipelineEvent::Result(first), PipelineEvent::Result(second)) = (first, second) else {
            unreachable!()
        };
        assert_eq!(first.risk.max_drawdown_pct, 10.00);
        assert_eq!(second.risk.max_drawdown_pct, 50.00);

        // The store keeps only the later result, replaced wholesale.
        let stored = harness.store.latest("AAPL").unwrap();
        assert!(std::sync::Arc::ptr_eq(&stored, &second));
        assert_eq!(harness.store.len(), 1);
    }

    #[test]
    fn test_server_error_is_recoverable() {
        let mut harness = harness();
        open_session(&mut harness);
        harness.session.submit_line("AAPL").unwrap();

        let frame = json!({"type": "error", "message": "upstream exploded"}).to_string();
        harness.session.handle_event(ChannelEvent::Message(frame));

        // Status surfaced, session still live, later results still flow.
        let mut saw_error = false;
        while let Ok(event) = harness.emitted.try_recv() {
            if let PipelineEvent::Status { level, message } = event {
                if level == StatusLevel::Error && message.contains("upstream exploded") {
                    saw_error = true;
                }
            }
        }
        assert!(saw_error);
        assert_eq!(harness.session.state(), SessionState::Awaiting);

        harness
            .session
            .handle_event(ChannelEvent::Message(result_frame("AAPL", &[10.0])));
        assert!(harness.store.latest("AAPL").is_some());
    }

    #[test]
    fn test_malformed_result_does_not_stop_dispatch() {
        let mut harness = harness();
        open_session(&mut harness);
        harness.session.submit_line("AAPL,MSFT").unwrap();

        // analysis_result with no price_history at all
        let broken = json!({
            "type": "analysis_result",
            "ticker": "AAPL",
            "data": { "metrics": { "latest_price": 1.0, "volume": 1.0,
                "market_cap": "N/A",
                "technical": {"rsi": 1.0, "sma_50": 1.0, "sma_200": 1.0, "volatility": 0.1}}}
        })
        .to_string();
        harness.session.handle_event(ChannelEvent::Message(broken));

        assert_eq!(harness.session.state(), SessionState::Awaiting);
        assert!(harness.store.latest("AAPL").is_none());

        // Subsequent events are still processed.
        harness
            .session
            .handle_event(ChannelEvent::Message(result_frame("MSFT", &[20.0, 22.0])));
        assert!(harness.store.latest("MSFT").is_some());
    }

    #[test]
    fn test_unknown_type_emits_nothing() {
        let mut harness = harness();
        open_session(&mut harness);

        // Drain lifecycle statuses first.
        while harness.emitted.try_recv().is_ok() {}

        let frame = json!({"type": "heartbeat"}).to_string();
        harness.session.handle_event(ChannelEvent::Message(frame));
        assert!(harness.emitted.try_recv().is_err());
        assert_eq!(harness.session.state(), SessionState::Ready);
    }
}
