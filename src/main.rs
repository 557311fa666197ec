mod bits;
mod bus;
mod config;
mod errors;
mod messages;
mod sampler;
mod sensors;

use crate::bus::i2c::I2CBus;
use crate::config::load_config;
use crate::messages::CSV_HEADER;
use crate::sampler::spawn_sampler;
use crate::sensors::L3gd20;
use tokio_stream::StreamExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with RUST_LOG environment variable support.
    // Logs go to stderr so the CSV stream on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    info!("[gyrostream] starting up...");

    // Load configuration from CONFIG_PATH or default
    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/gyro.toml".to_string());
    let cfg = load_config(&config_path)?;
    info!("[config] loaded '{}': bus={}", config_path, cfg.bus.path);

    let mut bus = I2CBus::open(&cfg.bus.path)?;
    let mut sensor = L3gd20::new(
        cfg.gyro.id.clone(),
        cfg.gyro.chip_select,
        cfg.gyro.gyro_config(),
    );
    sensor.init(&mut bus).await?;
    info!(
        "[{}] initialized at {:#04x}: {:?}",
        sensor.id(),
        sensor.address(),
        sensor.config()
    );

    let mut samples = spawn_sampler(sensor, Box::new(bus), cfg.gyro.frequency);

    println!("{}", CSV_HEADER);
    while let Some(sample) = samples.next().await {
        println!("{}", sample?.csv_row());
    }

    Ok(())
}
