use std::sync::Arc;
use std::time::Duration;

use oanda_bridge::exchange::oanda::OandaClient;
use oanda_bridge::{registry, AppConfig, Store};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();

    // Load Configuration
    let config = AppConfig::load()?;

    // Setup Logging (RUST_LOG wins over the configured level)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting OANDA bridge...");
    info!(
        "Account {} (practice: {}, refresh every {:?})",
        config.oanda.account,
        config.oanda.practice,
        config.oanda.refresh_interval()
    );

    let client = OandaClient::new(&config.oanda)?;
    info!(
        "REST: {} | Stream: {}",
        client.rest_context().base_url(),
        client.stream_context().base_url()
    );

    let store = Arc::new(Store::new(config.oanda.clone(), Arc::new(client)));
    registry::install(store.clone())?;

    let broker = store.get_broker();
    broker.start().await?;

    for instrument in &config.instruments {
        let data = store.get_data(&instrument.name, instrument.timeframe, instrument.compression);
        match data.granularity() {
            Some(code) => info!("📈 {} -> {}", instrument.name, code),
            None => warn!(
                "⚠️ {} has no granularity for {:?}/{}",
                instrument.name, instrument.timeframe, instrument.compression
            ),
        }
        data.start().await?;
    }

    let mut report = tokio::time::interval(Duration::from_secs(config.report_interval_secs.max(1)));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = report.tick() => {
                info!("💰 cash={:.2} value={:.2}", broker.get_cash(), broker.get_value());
                for n in store.get_notifications() {
                    warn!("[NOTIFY] {} {}", n.created_at.to_rfc3339(), n.message);
                }
            }
        }
    }

    info!("Ctrl-C received, shutting down");
    store.shutdown().await;
    registry::uninstall();

    Ok(())
}
