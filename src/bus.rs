pub mod i2c;

use crate::errors::SensorResult;
use async_trait::async_trait;

/// Byte-addressed register access on a two-wire bus.
///
/// The driver talks to the device only through this trait, so tests can
/// substitute an in-memory register map for real hardware.
#[async_trait]
pub trait RegisterBus: Send {
    async fn read_byte(&mut self, address: u8, reg: u8) -> SensorResult<u8>;
    async fn write_byte(&mut self, address: u8, reg: u8, value: u8) -> SensorResult<()>;
}

#[cfg(test)]
pub(crate) mod fake {
    use super::RegisterBus;
    use crate::errors::{SensorError, SensorResult};
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// In-memory register map standing in for real hardware.
    ///
    /// Reads and writes are logged in order so tests can assert on bus
    /// transaction sequences, and reads can be made to fail on demand.
    pub(crate) struct FakeBus {
        registers: HashMap<u8, u8>,
        pub reads: Vec<u8>,
        pub writes: Vec<(u8, u8)>,
        pub fail_reads: bool,
    }

    impl FakeBus {
        pub fn new() -> Self {
            let mut registers = HashMap::new();
            // WHO_AM_I answers with the L3GD20 chip ID unless a test says otherwise
            registers.insert(0x0F, 0xD4);
            Self {
                registers,
                reads: Vec::new(),
                writes: Vec::new(),
                fail_reads: false,
            }
        }

        pub fn set(&mut self, reg: u8, value: u8) {
            self.registers.insert(reg, value);
        }
    }

    #[async_trait]
    impl RegisterBus for FakeBus {
        async fn read_byte(&mut self, _address: u8, reg: u8) -> SensorResult<u8> {
            if self.fail_reads {
                return Err(SensorError::ReadError {
                    sensor: "fake".to_string(),
                    reason: "injected read failure".to_string(),
                });
            }
            self.reads.push(reg);
            Ok(self.registers.get(&reg).copied().unwrap_or(0))
        }

        async fn write_byte(&mut self, _address: u8, reg: u8, value: u8) -> SensorResult<()> {
            self.writes.push((reg, value));
            self.registers.insert(reg, value);
            Ok(())
        }
    }
}
