//! Presentation side of the pipeline.
//!
//! The sink is injectable: the session publishes `PipelineEvent`s on the
//! bus and `SinkService` forwards them to whatever `PresentationSink` the
//! application constructed. Sinks receive one fully-populated record per
//! render call and must not mutate it.

use tokio::task::JoinHandle;
use tracing::info;

use crate::analytics::aggregator::EnrichedResult;
use crate::bus::EventBus;
use crate::events::{PipelineEvent, StatusLevel};

pub trait PresentationSink: Send + 'static {
    fn render_result(&mut self, result: &EnrichedResult);
    fn render_status(&mut self, level: StatusLevel, message: &str);
}

/// Subscribes to the bus and drives the sink, one event at a time, in
/// arrival order.
pub struct SinkService<S: PresentationSink> {
    bus: EventBus,
    sink: S,
}

impl<S: PresentationSink> SinkService<S> {
    pub fn new(bus: EventBus, sink: S) -> Self {
        Self { bus, sink }
    }

    pub fn start(self) -> JoinHandle<()> {
        let mut rx = self.bus.subscribe();
        let mut sink = self.sink;

        tokio::spawn(async move {
            info!("🖥️ Presentation sink started");
            while let Ok(event) = rx.recv().await {
                match event {
                    PipelineEvent::Result(result) => sink.render_result(&result),
                    PipelineEvent::Status { level, message } => {
                        sink.render_status(level, &message)
                    }
                }
            }
        })
    }
}

/// Plain-text sink for the terminal binary.
#[derive(Default)]
pub struct TerminalSink;

impl TerminalSink {
    pub fn new() -> Self {
        Self
    }
}

impl PresentationSink for TerminalSink {
    fn render_result(&mut self, result: &EnrichedResult) {
        let metrics = &result.payload.metrics;
        let technical = &metrics.technical;

        println!("==== {} ====", result.payload.ticker);
        println!("  Latest Price   ${:.2}", metrics.latest_price);
        println!("  Volume         {:.0}", metrics.volume);
        println!("  Market Cap     {}", metrics.market_cap);
        println!(
            "  Technical      RSI {:.2} | SMA50 ${:.2} | SMA200 ${:.2} | Volatility {:.2}%",
            technical.rsi,
            technical.sma_50,
            technical.sma_200,
            technical.volatility * 100.0
        );
        println!(
            "  Risk           Beta {:.2} | Sharpe {:.2} | Max DD {:.2}%",
            result.risk.beta, result.risk.sharpe_ratio, result.risk.max_drawdown_pct
        );
        println!(
            "  Forensic       Anomaly {:.2} | Confidence {:.2}%",
            result.forensic.anomaly_score, result.forensic.confidence_pct
        );
        println!(
            "  DCF            Base ${:.2} | Bull ${:.2} | Bear ${:.2} | Discount {:.2}%",
            result.valuation.base_case,
            result.valuation.bull_case,
            result.valuation.bear_case,
            result.valuation.discount_rate_pct
        );
        println!("  Rating         {}", result.rating);
        println!(
            "  History        {} observations",
            result.payload.price_history.len()
        );
    }

    fn render_status(&mut self, level: StatusLevel, message: &str) {
        match level {
            StatusLevel::Info => println!("[info] {message}"),
            StatusLevel::Error => eprintln!("[error] {message}"),
        }
    }
}
