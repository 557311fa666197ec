use crate::bits::{make_short, signed_byte, signed_short};
use crate::bus::RegisterBus;
use crate::errors::{SensorError, SensorResult};
use crate::messages::GyroSample;
use chrono::Local;
use serde::Deserialize;

// Register addresses for the L3GD20
const WHO_AM_I: u8 = 0x0F;
const CTRL_REG1: u8 = 0x20;
const CTRL_REG4: u8 = 0x23;
const OUT_TEMP: u8 = 0x26;
const OUT_X_L: u8 = 0x28;
const OUT_X_H: u8 = 0x29;
const OUT_Y_L: u8 = 0x2A;
const OUT_Y_H: u8 = 0x2B;
const OUT_Z_L: u8 = 0x2C;
const OUT_Z_H: u8 = 0x2D;
const FIFO_CTRL_REG: u8 = 0x2E;

/// WHO_AM_I answer for a genuine L3GD20
const CHIP_ID: u8 = 0xD4;

// Slave addresses, selected by the SDO/CS pin strap
const SLAVE_ADDR_GND: u8 = 0x6A;
const SLAVE_ADDR_VDD: u8 = 0x6B;

// CTRL_REG1: normal power mode, X/Y/Z axes enabled
const CTRL_REG1_NORMAL_XYZ: u8 = 0b0000_1111;

/// SDO/CS pin strap state, which selects one of the two slave addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChipSelect {
    Gnd,
    Vdd,
}

impl ChipSelect {
    pub fn address(self) -> u8 {
        match self {
            ChipSelect::Gnd => SLAVE_ADDR_GND,
            ChipSelect::Vdd => SLAVE_ADDR_VDD,
        }
    }
}

/// Full-scale measurement range.
///
/// CTRL_REG4 bits and per-LSB sensitivity both derive from this one value,
/// so the register write and the scaling constant cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "u16")]
pub enum FullScale {
    #[default]
    Dps250,
    Dps500,
    Dps2000,
}

impl FullScale {
    pub fn from_dps(dps: u16) -> SensorResult<Self> {
        match dps {
            250 => Ok(FullScale::Dps250),
            500 => Ok(FullScale::Dps500),
            2000 => Ok(FullScale::Dps2000),
            _ => Err(SensorError::InvalidFullScale { dps }),
        }
    }

    /// CTRL_REG4 FS bits
    pub fn reg_bits(self) -> u8 {
        match self {
            FullScale::Dps250 => 0x00,
            FullScale::Dps500 => 0x10,
            FullScale::Dps2000 => 0x20,
        }
    }

    /// Angular rate per least-significant bit (dps/LSB)
    pub fn dps_per_lsb(self) -> f32 {
        match self {
            FullScale::Dps250 => 0.00875,
            FullScale::Dps500 => 0.0175,
            FullScale::Dps2000 => 0.07,
        }
    }
}

impl TryFrom<u16> for FullScale {
    type Error = SensorError;

    fn try_from(dps: u16) -> Result<Self, Self::Error> {
        FullScale::from_dps(dps)
    }
}

/// FIFO_CTRL_REG operating mode. This build only selects the mode; it
/// never drains the FIFO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FifoMode {
    Bypass,
    #[default]
    Fifo,
    Stream,
    StreamToFifo,
    BypassToStream,
}

impl FifoMode {
    /// FIFO_CTRL_REG FM bits
    pub fn reg_bits(self) -> u8 {
        match self {
            FifoMode::Bypass => 0x00,
            FifoMode::Fifo => 0x20,
            FifoMode::Stream => 0x40,
            FifoMode::StreamToFifo => 0x60,
            FifoMode::BypassToStream => 0x80,
        }
    }
}

/// Operating configuration written to the device at initialization.
#[derive(Debug, Clone, Copy, Default)]
pub struct GyroConfig {
    pub full_scale: FullScale,
    pub fifo_mode: FifoMode,
}

/// Driver for one L3GD20 gyro on an I2C bus.
pub struct L3gd20 {
    id: String,
    address: u8,
    config: GyroConfig,
    dps_per_lsb: f32,
}

impl L3gd20 {
    pub fn new(id: String, chip_select: ChipSelect, config: GyroConfig) -> Self {
        let dps_per_lsb = config.full_scale.dps_per_lsb();
        Self {
            id,
            address: chip_select.address(),
            config,
            dps_per_lsb,
        }
    }

    /// Verify device identity and write the operating configuration.
    ///
    /// Fails with `WrongChipId` before any configuration register is
    /// touched if WHO_AM_I does not answer with the L3GD20 chip ID.
    pub async fn init(&mut self, bus: &mut dyn RegisterBus) -> SensorResult<()> {
        let who_am_i = bus.read_byte(self.address, WHO_AM_I).await?;
        if who_am_i != CHIP_ID {
            return Err(SensorError::WrongChipId {
                sensor: self.id.clone(),
                expected: CHIP_ID,
                actual: who_am_i,
            });
        }

        bus.write_byte(self.address, CTRL_REG1, CTRL_REG1_NORMAL_XYZ)
            .await
            .map_err(|e| SensorError::InitError {
                sensor: self.id.clone(),
                reason: format!("Failed to configure CTRL_REG1: {}", e),
            })?;
        bus.write_byte(self.address, CTRL_REG4, self.config.full_scale.reg_bits())
            .await
            .map_err(|e| SensorError::InitError {
                sensor: self.id.clone(),
                reason: format!("Failed to configure CTRL_REG4: {}", e),
            })?;
        bus.write_byte(self.address, FIFO_CTRL_REG, self.config.fifo_mode.reg_bits())
            .await
            .map_err(|e| SensorError::InitError {
                sensor: self.id.clone(),
                reason: format!("Failed to configure FIFO_CTRL_REG: {}", e),
            })?;

        Ok(())
    }

    /// Angular rate around X (dps)
    pub async fn get_x(&self, bus: &mut dyn RegisterBus) -> SensorResult<f32> {
        self.read_axis(bus, OUT_X_L, OUT_X_H).await
    }

    /// Angular rate around Y (dps)
    pub async fn get_y(&self, bus: &mut dyn RegisterBus) -> SensorResult<f32> {
        self.read_axis(bus, OUT_Y_L, OUT_Y_H).await
    }

    /// Angular rate around Z (dps)
    pub async fn get_z(&self, bus: &mut dyn RegisterBus) -> SensorResult<f32> {
        self.read_axis(bus, OUT_Z_L, OUT_Z_H).await
    }

    /// Raw temperature count. The on-device scale and offset are left
    /// unapplied; this is the register value as a signed byte.
    pub async fn get_temp(&self, bus: &mut dyn RegisterBus) -> SensorResult<i8> {
        let raw = self.read_reg(bus, OUT_TEMP).await?;
        Ok(signed_byte(raw))
    }

    /// One timestamped reading of all three axes plus temperature.
    ///
    /// Four separate bus transactions; the axes are not sampled
    /// atomically, so readings may be slightly skewed in time.
    pub async fn read_sample(&self, bus: &mut dyn RegisterBus) -> SensorResult<GyroSample> {
        let timestamp = Local::now();
        let gyro_x = self.get_x(bus).await?;
        let gyro_y = self.get_y(bus).await?;
        let gyro_z = self.get_z(bus).await?;
        let temp = self.get_temp(bus).await?;
        Ok(GyroSample {
            timestamp,
            gyro_x,
            gyro_y,
            gyro_z,
            temp,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn config(&self) -> GyroConfig {
        self.config
    }

    async fn read_axis(&self, bus: &mut dyn RegisterBus, reg_l: u8, reg_h: u8) -> SensorResult<f32> {
        // The low byte must be read before the high byte.
        let lo = self.read_reg(bus, reg_l).await?;
        let hi = self.read_reg(bus, reg_h).await?;
        let raw = signed_short(make_short(hi as u16, lo as u16));
        Ok(raw as f32 * self.dps_per_lsb)
    }

    async fn read_reg(&self, bus: &mut dyn RegisterBus, reg: u8) -> SensorResult<u8> {
        bus.read_byte(self.address, reg)
            .await
            .map_err(|e| SensorError::ReadError {
                sensor: self.id.clone(),
                reason: format!("Failed to read register {:#04x}: {}", reg, e),
            })
    }
}
