//! Drift-corrected periodic sampling loop.
//!
//! The cadence source rebuilds timerfd semantics on tokio's monotonic
//! clock: deadlines stay aligned to the arming instant, so the long-run
//! average period equals the configured one no matter how long each
//! sample-and-emit cycle takes. A cycle that overruns whole periods is
//! reported once, and the loop still performs exactly one pass on the next
//! wake; catching up with extra passes would only emit stale sensor data.

use crate::config::Config;
use crate::error::SamplerError;
use crate::exposition;
use crate::sensor::Sensor;
use chrono::Utc;
use std::io::Write;
use std::time::Duration;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

/// Delay before the first tick after arming.
const ARM_DELAY: Duration = Duration::from_secs(1);

/// Repeating monotonic tick source with timerfd-style expiration counting.
pub struct TickClock {
    deadline: Instant,
    period: Duration,
}

impl TickClock {
    pub fn new(period: Duration) -> Self {
        debug_assert!(!period.is_zero());
        Self {
            deadline: Instant::now() + ARM_DELAY,
            period,
        }
    }

    /// Wait for the next deadline and return the number of expirations it
    /// consumed. 1 means the tick fired on time; a larger count means the
    /// previous cycle overran and `count - 1` scheduled ticks went by
    /// unserviced. The following deadline is advanced past all of them, so
    /// one slow cycle costs one warning and nothing else.
    pub async fn tick(&mut self) -> u64 {
        sleep_until(self.deadline).await;
        let late = Instant::now().saturating_duration_since(self.deadline);
        let expirations = 1 + (late.as_nanos() / self.period.as_nanos()) as u64;
        self.deadline += self.period * expirations as u32;
        expirations
    }
}

/// Run the sample-and-emit loop until cancelled.
///
/// Sensor failures are logged to stderr and skip the tick's emission; the
/// next scheduled tick is the retry. Only an output-stream failure ends
/// the loop early.
pub async fn run<S, W>(
    sensor: &mut S,
    config: &Config,
    out: &mut W,
    cancel: CancellationToken,
) -> Result<(), SamplerError>
where
    S: Sensor,
    W: Write,
{
    let mut clock = TickClock::new(config.period());

    loop {
        let expirations = tokio::select! {
            n = clock.tick() => n,
            _ = cancel.cancelled() => {
                tracing::info!("Sampler stopping");
                return Ok(());
            }
        };

        if expirations > 1 {
            tracing::warn!(
                "Sampling was slow enough to miss {} ticks when sampling every {}s \
                 (use -w to lengthen the sampling period)",
                expirations - 1,
                config.wait_seconds
            );
        }

        match sensor.sample().await {
            Ok(reading) => {
                if !(0.0..=100.0).contains(&reading.humidity) {
                    tracing::debug!(
                        "Humidity {:.1}% is outside [0, 100]; emitting it unmodified",
                        reading.humidity
                    );
                }
                let timestamp = config
                    .timestamps
                    .then(|| Utc::now().timestamp_millis());
                exposition::write_reading(out, &reading, config, timestamp)?;
            }
            Err(e) => {
                tracing::warn!("Couldn't read DHT22 sensor data: {}", e);
            }
        }
    }
}
