use chrono::{DateTime, Local};
use serde::Serialize;

/// CSV header for the sample stream. Field order is part of the contract.
pub const CSV_HEADER: &str = "DATE,GYRO_X,GYRO_Y,GYRO_Z,TEMP";

/// One timestamped gyro reading.
///
/// Angular rates are in degrees per second; `temp` is the raw signed
/// register count, deliberately left unconverted.
#[derive(Serialize, Clone, Debug)]
pub struct GyroSample {
    pub timestamp: DateTime<Local>,
    pub gyro_x: f32,
    pub gyro_y: f32,
    pub gyro_z: f32,
    pub temp: i8,
}

impl GyroSample {
    /// One CSV record, timestamped with millisecond precision.
    pub fn csv_row(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.timestamp.format("%Y/%m/%d %H:%M:%S%.3f"),
            self.gyro_x,
            self.gyro_y,
            self.gyro_z,
            self.temp
        )
    }

    /// Serialize to JSON for debugging
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
