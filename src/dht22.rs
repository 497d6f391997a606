//! DHT22/RHT03 access through the Linux IIO subsystem.
//!
//! The in-kernel `dht11` driver (it also speaks the DHT22/RHT03 wire
//! protocol) is bound to a GPIO with a device-tree overlay, e.g.
//! `dtoverlay=dht11,gpiopin=17`. Each read of `in_temp_input`
//! (millidegrees Celsius) or `in_humidityrelative_input` (milli-percent)
//! triggers a fresh conversion on the wire.

use crate::sensor::{Reading, Sensor, SensorError};
use std::future::Future;
use std::path::{Path, PathBuf};

const IIO_DEVICES: &str = "/sys/bus/iio/devices";
const IIO_DRIVER_NAME: &str = "dht11";

const HUMIDITY_CHANNEL: &str = "in_humidityrelative_input";
const TEMPERATURE_CHANNEL: &str = "in_temp_input";

#[derive(Debug)]
pub struct Dht22 {
    device: PathBuf,
}

impl Dht22 {
    /// Locate the IIO device backing the DHT sensor.
    ///
    /// The overlay, not this process, decides which GPIO the driver is
    /// bound to; `gpio` is only carried into the error message so the
    /// operator knows which overlay line to check.
    pub async fn open(gpio: u8) -> Result<Self, SensorError> {
        Self::open_in(Path::new(IIO_DEVICES), gpio).await
    }

    async fn open_in(root: &Path, gpio: u8) -> Result<Self, SensorError> {
        let mut entries = tokio::fs::read_dir(root)
            .await
            .map_err(|_| SensorError::NotFound(gpio))?;

        while let Some(entry) = entries.next_entry().await? {
            let Ok(name) = tokio::fs::read_to_string(entry.path().join("name")).await else {
                continue;
            };
            if name.trim() == IIO_DRIVER_NAME {
                return Ok(Self {
                    device: entry.path(),
                });
            }
        }

        Err(SensorError::NotFound(gpio))
    }

    async fn read_channel(&self, channel: &str) -> Result<f32, SensorError> {
        let raw = tokio::fs::read_to_string(self.device.join(channel))
            .await
            .map_err(map_read_error)?;
        let millis: f32 = raw
            .trim()
            .parse()
            .map_err(|_| SensorError::BadValue(raw.trim().to_string()))?;
        Ok(millis / 1000.0)
    }
}

// The driver reports a failed conversion (bad checksum, bit timing) as EIO
// and a sensor that never answered as ETIMEDOUT.
const EIO: i32 = 5;

fn map_read_error(err: std::io::Error) -> SensorError {
    if err.kind() == std::io::ErrorKind::TimedOut {
        SensorError::Timeout
    } else if err.raw_os_error() == Some(EIO) {
        SensorError::Checksum
    } else {
        SensorError::Io(err)
    }
}

impl Sensor for Dht22 {
    fn sample(&mut self) -> impl Future<Output = Result<Reading, SensorError>> + Send {
        async move {
            let humidity = self.read_channel(HUMIDITY_CHANNEL).await?;
            let temperature = self.read_channel(TEMPERATURE_CHANNEL).await?;
            Ok(Reading {
                humidity,
                temperature,
            })
        }
    }
}
