#[cfg(target_os = "linux")]
use i2cdev::core::I2CDevice;
#[cfg(target_os = "linux")]
use i2cdev::linux::{LinuxI2CDevice, LinuxI2CError};

use crate::bus::RegisterBus;
use crate::errors::SensorResult;
use async_trait::async_trait;

/// I2C bus error type - platform specific
#[cfg(target_os = "linux")]
pub type I2CError = LinuxI2CError;

#[cfg(not(target_os = "linux"))]
#[derive(Debug)]
pub struct I2CError(String);

#[cfg(not(target_os = "linux"))]
impl std::fmt::Display for I2CError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "I2C not supported on this platform: {}", self.0)
    }
}

#[cfg(not(target_os = "linux"))]
impl std::error::Error for I2CError {}

/// I2C bus implementation
#[cfg(target_os = "linux")]
pub struct I2CBus {
    device: LinuxI2CDevice,
}

#[cfg(not(target_os = "linux"))]
pub struct I2CBus {
    _phantom: std::marker::PhantomData<()>,
}

#[cfg(target_os = "linux")]
impl I2CBus {
    /// Open the bus device node, e.g. `/dev/i2c-1`. The slave address is
    /// set per transaction, not at open time.
    pub fn open(path: &str) -> Result<Self, I2CError> {
        let device = LinuxI2CDevice::new(path, 0)?;
        Ok(Self { device })
    }
}

#[cfg(target_os = "linux")]
#[async_trait]
impl RegisterBus for I2CBus {
    async fn read_byte(&mut self, address: u8, reg: u8) -> SensorResult<u8> {
        self.device.set_slave_address(address as u16)?;
        Ok(self.device.smbus_read_byte_data(reg)?)
    }

    async fn write_byte(&mut self, address: u8, reg: u8, value: u8) -> SensorResult<()> {
        self.device.set_slave_address(address as u16)?;
        Ok(self.device.smbus_write_byte_data(reg, value)?)
    }
}

#[cfg(not(target_os = "linux"))]
impl I2CBus {
    pub fn open(_path: &str) -> Result<Self, I2CError> {
        Err(I2CError("I2C is only supported on Linux".to_string()))
    }
}

#[cfg(not(target_os = "linux"))]
#[async_trait]
impl RegisterBus for I2CBus {
    async fn read_byte(&mut self, _address: u8, _reg: u8) -> SensorResult<u8> {
        Err(I2CError("I2C is only supported on Linux".to_string()).into())
    }

    async fn write_byte(&mut self, _address: u8, _reg: u8, _value: u8) -> SensorResult<()> {
        Err(I2CError("I2C is only supported on Linux".to_string()).into())
    }
}
