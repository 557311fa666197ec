use crate::bus::RegisterBus;
use crate::errors::SensorResult;
use crate::messages::GyroSample;
use crate::sensors::L3gd20;
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error, info};

/// Sample channel capacity. A consumer that falls behind exerts
/// backpressure on the sampling task instead of dropping records.
const CHANNEL_CAPACITY: usize = 64;

/// Spawn the sampling task and hand back the receiving end as a stream.
///
/// The stream is infinite while the sensor keeps answering. Dropping it
/// stops the task at its next send. A read failure is forwarded as the
/// final item, after which the stream ends. Without a configured
/// frequency the sampling rate is bounded only by bus transaction speed.
pub fn spawn_sampler(
    sensor: L3gd20,
    mut bus: Box<dyn RegisterBus>,
    frequency: Option<u32>,
) -> ReceiverStream<SensorResult<GyroSample>> {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let pace = frequency.map(|hz| Duration::from_millis((1000.0 / hz as f32) as u64));

    tokio::spawn(async move {
        match pace {
            Some(period) => info!("[{}] sampling task started, period {:?}", sensor.id(), period),
            None => info!("[{}] sampling task started, unpaced", sensor.id()),
        }

        loop {
            match sensor.read_sample(&mut *bus).await {
                Ok(sample) => {
                    if let Ok(json) = sample.to_json() {
                        debug!("[{}] {}", sensor.id(), json);
                    }
                    if tx.send(Ok(sample)).await.is_err() {
                        info!("[{}] consumer dropped, stopping sampler", sensor.id());
                        break;
                    }
                }
                Err(e) => {
                    error!("[{}] sample read failed: {}", sensor.id(), e);
                    let _ = tx.send(Err(e)).await;
                    break;
                }
            }

            if let Some(period) = pace {
                sleep(period).await;
            }
        }
    });

    ReceiverStream::new(rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::fake::FakeBus;
    use crate::sensors::l3gd20::{ChipSelect, GyroConfig};
    use tokio_stream::StreamExt;

    fn sensor() -> L3gd20 {
        L3gd20::new("gyro0".to_string(), ChipSelect::Gnd, GyroConfig::default())
    }

    #[tokio::test]
    async fn stream_yields_successive_samples() {
        let mut bus = FakeBus::new();
        bus.set(0x28, 0x01); // OUT_X_L: +1 LSB
        let mut stream = spawn_sampler(sensor(), Box::new(bus), Some(500));

        for _ in 0..3 {
            let sample = stream.next().await.unwrap().unwrap();
            assert!((sample.gyro_x - 0.00875).abs() < 1e-6);
        }
    }

    #[tokio::test]
    async fn read_failure_ends_the_stream() {
        let mut bus = FakeBus::new();
        bus.fail_reads = true;
        let mut stream = spawn_sampler(sensor(), Box::new(bus), None);

        assert!(stream.next().await.unwrap().is_err());
        assert!(stream.next().await.is_none());
    }
}
