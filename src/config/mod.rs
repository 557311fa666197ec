pub mod gyro_config;

pub use gyro_config::{load_config, Config};
