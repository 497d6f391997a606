use std::future::Future;
use thiserror::Error;

/// One humidity/temperature sample, in percent relative humidity and
/// degrees Celsius. Produced once per tick and consumed immediately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub humidity: f32,
    pub temperature: f32,
}

#[derive(Debug, Error)]
pub enum SensorError {
    #[error("timed out waiting for the sensor to answer")]
    Timeout,
    #[error("transfer failed its checksum or bit timing")]
    Checksum,
    #[error("sensor reported an unparseable value: '{0}'")]
    BadValue(String),
    #[error("no DHT device registered with the IIO subsystem for GPIO {0} (is the dht11 overlay loaded?)")]
    NotFound(u8),
    #[error("sensor I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Sensor trait for taking one humidity/temperature sample.
///
/// Implementations handle the physical access (kernel IIO driver, test
/// doubles) while the sampling loop owns cadence and emission.
pub trait Sensor {
    /// Take a single sample. Errors are transient: the caller logs them,
    /// skips the tick and tries again on the next one.
    fn sample(&mut self) -> impl Future<Output = Result<Reading, SensorError>> + Send;
}
