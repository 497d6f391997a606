use crate::error::ConfigError;
use crate::labels::{Label, LabelSet};
use clap::Parser;
use std::time::Duration;

pub const DEFAULT_GPIO_INDEX: i64 = 17;
pub const MIN_GPIO_INDEX: i64 = 0;
pub const MAX_GPIO_INDEX: i64 = 27;

pub const DEFAULT_WAIT_SECONDS: i64 = 60;
/// The DHT22/RHT03 needs two seconds between conversions.
pub const MIN_WAIT_SECONDS: i64 = 2;

#[derive(Parser, Debug)]
#[command(name = "dht22-sampler")]
#[command(
    about = "Take samples from a RHT03/DHT22 sensor attached to a Raspberry Pi \
             and emit them for the Prometheus monitoring system's text collector"
)]
pub struct Args {
    /// GPIO index the sensor's data line is wired to
    #[arg(short = 'g', long = "gpio", default_value_t = DEFAULT_GPIO_INDEX, allow_negative_numbers = true)]
    pub gpio: i64,

    /// Seconds to wait between consecutive polls of the sensor
    #[arg(short = 'w', long = "wait", default_value_t = DEFAULT_WAIT_SECONDS, allow_negative_numbers = true)]
    pub wait_seconds: i64,

    /// Report temperature in Fahrenheit degrees (default: Celsius)
    #[arg(short = 'f', long = "fahrenheit")]
    pub fahrenheit: bool,

    /// Suffix each metric line with an epoch-millisecond timestamp
    /// (node_exporter 0.16+ text collectors reject these)
    #[arg(long)]
    pub timestamps: bool,

    /// Prometheus label="value" pairs to tag the output with. The double
    /// quotes around the value are part of the token, so protect it from
    /// the shell: 'zone="us-east"'
    #[arg(value_name = "LABEL")]
    pub labels: Vec<String>,
}

/// Immutable, process-lifetime settings. Built once from the parsed
/// arguments; the sampling loop only ever reads it.
#[derive(Debug, Clone)]
pub struct Config {
    pub gpio: u8,
    pub wait_seconds: u64,
    pub fahrenheit: bool,
    pub timestamps: bool,
    pub labels: LabelSet,
}

impl Config {
    /// Bounds-check the parsed arguments and validate the label tokens in
    /// the order given. The first invalid token aborts configuration; there
    /// is no best-effort acceptance.
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        if !(MIN_GPIO_INDEX..=MAX_GPIO_INDEX).contains(&args.gpio) {
            return Err(ConfigError::GpioOutOfRange(args.gpio));
        }
        if args.wait_seconds < MIN_WAIT_SECONDS {
            return Err(ConfigError::WaitTooShort(args.wait_seconds));
        }

        let mut labels = LabelSet::new();
        for token in &args.labels {
            labels.push(Label::parse(token)?);
        }

        Ok(Self {
            gpio: args.gpio as u8,
            wait_seconds: args.wait_seconds as u64,
            fahrenheit: args.fahrenheit,
            timestamps: args.timestamps,
            labels,
        })
    }

    pub fn period(&self) -> Duration {
        Duration::from_secs(self.wait_seconds)
    }
}
