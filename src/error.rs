//! Per-boundary error types and their translation to process exit codes.
//!
//! Components signal failures with their own enums; only `main` turns them
//! into exit codes, one small distinct integer per failure class so wrapper
//! scripts can tell a bad label from a bad GPIO index. Numeric parse
//! failures exit with clap's own code (2) before any of these are reached.

use crate::labels::ValidationError;
use thiserror::Error;

/// Exit code when no DHT device can be found at startup.
pub const EXIT_SENSOR_UNAVAILABLE: i32 = 12;

/// Fatal startup problems with the command line.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid GPIO index '{0}', it should be between 0 and 27")]
    GpioOutOfRange(i64),
    #[error("invalid sampling wait time '{0}', the minimum allowable value is 2 seconds")]
    WaitTooShort(i64),
    #[error(transparent)]
    Label(#[from] ValidationError),
}

impl ConfigError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ConfigError::Label(ValidationError::MissingSeparator(_)) => 4,
            ConfigError::Label(ValidationError::InvalidName(_)) => 6,
            ConfigError::Label(ValidationError::InvalidValue(_)) => 8,
            ConfigError::GpioOutOfRange(_) => 10,
            ConfigError::WaitTooShort(_) => 11,
        }
    }
}

/// Fatal problems inside the sampling loop. Sensor read failures are not
/// among these; they are logged and the tick is skipped.
#[derive(Debug, Error)]
pub enum SamplerError {
    #[error("failed to write metrics to the output stream: {0}")]
    Write(#[from] std::io::Error),
}

impl SamplerError {
    pub fn exit_code(&self) -> i32 {
        match self {
            SamplerError::Write(_) => 13,
        }
    }
}
