use clap::Parser;
use dht22_rs::config::{Args, Config};
use dht22_rs::dht22::Dht22;
use dht22_rs::error::EXIT_SENSOR_UNAVAILABLE;
use dht22_rs::sampler;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // stdout is the metrics stream, so diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match Config::from_args(args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(e.exit_code());
        }
    };

    let mut sensor = match Dht22::open(config.gpio).await {
        Ok(sensor) => sensor,
        Err(e) => {
            tracing::error!("Couldn't open the DHT22 sensor: {}", e);
            std::process::exit(EXIT_SENSOR_UNAVAILABLE);
        }
    };

    let cancel = CancellationToken::new();
    let cancel_signal = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Received shutdown signal");
        cancel_signal.cancel();
    });

    tracing::info!(
        "Sampling the DHT22 on GPIO {} every {}s",
        config.gpio,
        config.wait_seconds
    );

    let mut stdout = std::io::stdout();
    if let Err(e) = sampler::run(&mut sensor, &config, &mut stdout, cancel).await {
        tracing::error!("{}", e);
        std::process::exit(e.exit_code());
    }
}
