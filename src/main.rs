use tickerlens::analytics::aggregator::Aggregator;
use tickerlens::bus::EventBus;
use tickerlens::config::AppConfig;
use tickerlens::data::store::ResultStore;
use tickerlens::session::SessionController;
use tickerlens::sink::{SinkService, TerminalSink};
use tickerlens::transport::ws::WsChannel;
use tickerlens::transport::AnalysisChannel;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();

    // Setup Logging
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting TickerLens...");

    // Load Configuration
    let config = AppConfig::load();
    info!("Loaded Configuration: {:?}", config);

    let endpoint =
        std::env::var("TICKERLENS_WS_URL").unwrap_or_else(|_| config.endpoint.clone());

    let bus = EventBus::new(config.bus_capacity);
    let store = ResultStore::new();

    let aggregator = match config.rng_seed {
        Some(seed) => {
            info!("Using fixed scenario seed: {}", seed);
            Aggregator::with_seed(seed)
        }
        None => Aggregator::new(),
    };

    // Presentation side
    SinkService::new(bus.clone(), TerminalSink::new()).start();

    // Streaming channel
    let channel = WsChannel::new(endpoint);
    let (outbound, events) = channel.open().await?;

    let session = SessionController::new(
        outbound,
        bus.clone(),
        store,
        aggregator,
        config.quiet_period(),
    );

    // One comma-separated ticker list per stdin line
    let (request_tx, request_rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if request_tx.send(line).is_err() {
                break;
            }
        }
    });

    info!("Enter comma-separated tickers to analyze (e.g. AAPL,MSFT)");
    session.run(events, request_rx).await;

    Ok(())
}
