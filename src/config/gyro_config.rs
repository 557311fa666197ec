use crate::errors::{ConfigError, ConfigResult};
use crate::sensors::l3gd20::{ChipSelect, FifoMode, FullScale, GyroConfig};
use serde::Deserialize;
use std::fs;

/// Root configuration struct for the gyro streamer TOML file
#[derive(Debug, Deserialize)]
pub struct Config {
    pub bus: BusSection,
    pub gyro: GyroSection,
}

/// `[bus]` section: which I2C device node to open
#[derive(Debug, Deserialize)]
pub struct BusSection {
    pub path: String,
}

/// `[gyro]` section: one sensor entry
#[derive(Debug, Deserialize)]
pub struct GyroSection {
    pub id: String,
    pub chip_select: ChipSelect,
    #[serde(default)]
    pub full_scale: FullScale,
    #[serde(default)]
    pub fifo_mode: FifoMode,
    pub frequency: Option<u32>,
}

impl GyroSection {
    pub fn gyro_config(&self) -> GyroConfig {
        GyroConfig {
            full_scale: self.full_scale,
            fifo_mode: self.fifo_mode,
        }
    }
}

/// Loads config from TOML file
pub fn load_config(path: &str) -> ConfigResult<Config> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::LoadError {
        path: path.to_string(),
        source,
    })?;
    let parsed: Config = toml::from_str(&content)?;
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let cfg: Config = toml::from_str(
            r#"
            [bus]
            path = "/dev/i2c-1"

            [gyro]
            id = "gyro0"
            chip_select = "vdd"
            full_scale = 500
            fifo_mode = "stream-to-fifo"
            frequency = 100
            "#,
        )
        .unwrap();

        assert_eq!(cfg.bus.path, "/dev/i2c-1");
        assert_eq!(cfg.gyro.id, "gyro0");
        assert_eq!(cfg.gyro.chip_select, ChipSelect::Vdd);
        assert_eq!(cfg.gyro.full_scale, FullScale::Dps500);
        assert_eq!(cfg.gyro.fifo_mode, FifoMode::StreamToFifo);
        assert_eq!(cfg.gyro.frequency, Some(100));
    }

    #[test]
    fn range_and_fifo_mode_default_to_build_configuration() {
        let cfg: Config = toml::from_str(
            r#"
            [bus]
            path = "/dev/i2c-1"

            [gyro]
            id = "gyro0"
            chip_select = "gnd"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.gyro.full_scale, FullScale::Dps250);
        assert_eq!(cfg.gyro.fifo_mode, FifoMode::Fifo);
        assert_eq!(cfg.gyro.frequency, None);
    }

    #[test]
    fn rejects_unknown_full_scale() {
        let result: Result<Config, _> = toml::from_str(
            r#"
            [bus]
            path = "/dev/i2c-1"

            [gyro]
            id = "gyro0"
            chip_select = "vdd"
            full_scale = 300
            "#,
        );

        let err = result.unwrap_err().to_string();
        assert!(err.contains("300"), "unexpected error: {err}");
    }

    #[test]
    fn rejects_unknown_chip_select() {
        let result: Result<Config, _> = toml::from_str(
            r#"
            [bus]
            path = "/dev/i2c-1"

            [gyro]
            id = "gyro0"
            chip_select = "float"
            "#,
        );

        assert!(result.is_err());
    }
}
