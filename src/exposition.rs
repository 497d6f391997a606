//! Serialization of sampled readings into the Prometheus text format.
//!
//! Every tick emits two gauge blocks (relative humidity, temperature), each
//! a `# TYPE` line, a `# HELP` line and one data line. Both blocks are
//! rendered into a single buffer and handed to the writer with one
//! `write_all`, so a failing output stream can never leave a partial line
//! behind for the scraper to choke on.

use crate::config::Config;
use crate::sensor::Reading;
use std::io::{self, Write};

pub const HUMIDITY_METRIC: &str = "dht22_relat_humidity";
pub const TEMPERATURE_METRIC_CELSIUS: &str = "dht22_temperature_celsius";
// Spelling kept for continuity with dashboards scraping the C exporter.
pub const TEMPERATURE_METRIC_FAHRENHEIT: &str = "dht22_temperature_farenheit";

const HUMIDITY_HELP: &str = "Relative humidity percentage in the RHT03/DHT22 sensor";
const TEMPERATURE_HELP: &str = "Temperature in the RHT03/DHT22 sensor";

pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * (9.0 / 5.0) + 32.0
}

fn render_gauge(
    name: &str,
    help: &str,
    value: f32,
    config: &Config,
    timestamp_ms: Option<i64>,
) -> String {
    let mut block = format!(
        "# TYPE {} gauge\n# HELP {} {}\n{}{} {:.2}",
        name, name, help, name, config.labels, value
    );
    if let Some(ts) = timestamp_ms {
        block.push_str(&format!(" {}", ts));
    }
    block.push('\n');
    block
}

/// Write the humidity and temperature blocks for one reading.
///
/// Temperature is converted to Fahrenheit (and the metric renamed to match)
/// when the configuration asks for it. `timestamp_ms` is appended to each
/// data line when present; node_exporter 0.16+ text collectors reject
/// timestamped lines, so the caller only passes one when configured to.
pub fn write_reading<W: Write>(
    out: &mut W,
    reading: &Reading,
    config: &Config,
    timestamp_ms: Option<i64>,
) -> io::Result<()> {
    let (temperature_metric, temperature) = if config.fahrenheit {
        (
            TEMPERATURE_METRIC_FAHRENHEIT,
            celsius_to_fahrenheit(reading.temperature),
        )
    } else {
        (TEMPERATURE_METRIC_CELSIUS, reading.temperature)
    };

    let mut buf = render_gauge(
        HUMIDITY_METRIC,
        HUMIDITY_HELP,
        reading.humidity,
        config,
        timestamp_ms,
    );
    buf.push_str(&render_gauge(
        temperature_metric,
        TEMPERATURE_HELP,
        temperature,
        config,
        timestamp_ms,
    ));

    out.write_all(buf.as_bytes())?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::labels::{Label, LabelSet};

    fn config(fahrenheit: bool, labels: LabelSet) -> Config {
        Config {
            gpio: 17,
            wait_seconds: 60,
            fahrenheit,
            timestamps: false,
            labels,
        }
    }

    fn labeled(tokens: &[&str]) -> LabelSet {
        tokens.iter().map(|t| Label::parse(t).unwrap()).collect()
    }

    #[test]
    fn celsius_blocks_with_labels() {
        let config = config(false, labeled(&[r#"zone="us-east""#]));
        let reading = Reading {
            humidity: 55.3,
            temperature: 21.7,
        };
        let mut out = Vec::new();
        write_reading(&mut out, &reading, &config, None).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "# TYPE dht22_relat_humidity gauge\n\
             # HELP dht22_relat_humidity Relative humidity percentage in the RHT03/DHT22 sensor\n\
             dht22_relat_humidity{zone=\"us-east\"} 55.30\n\
             # TYPE dht22_temperature_celsius gauge\n\
             # HELP dht22_temperature_celsius Temperature in the RHT03/DHT22 sensor\n\
             dht22_temperature_celsius{zone=\"us-east\"} 21.70\n"
        );
    }

    #[test]
    fn empty_label_set_omits_braces() {
        let config = config(false, LabelSet::new());
        let reading = Reading {
            humidity: 40.0,
            temperature: 20.0,
        };
        let mut out = Vec::new();
        write_reading(&mut out, &reading, &config, None).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("dht22_relat_humidity 40.00\n"));
        assert!(!text.contains("{}"));
    }

    #[test]
    fn multiple_labels_get_exactly_one_comma_between() {
        let config = config(false, labeled(&[r#"a="1""#, r#"b="2""#]));
        let reading = Reading {
            humidity: 40.0,
            temperature: 20.0,
        };
        let mut out = Vec::new();
        write_reading(&mut out, &reading, &config, None).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(r#"dht22_relat_humidity{a="1", b="2"} 40.00"#));
    }

    #[test]
    fn fahrenheit_conversion_is_exact_and_renames_the_metric() {
        let config = config(true, LabelSet::new());
        let mut out = Vec::new();
        write_reading(
            &mut out,
            &Reading {
                humidity: 50.0,
                temperature: 0.0,
            },
            &config,
            None,
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("dht22_temperature_farenheit 32.00\n"));
        assert!(!text.contains("celsius"));

        let mut out = Vec::new();
        write_reading(
            &mut out,
            &Reading {
                humidity: 50.0,
                temperature: 100.0,
            },
            &config,
            None,
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("dht22_temperature_farenheit 212.00\n"));
    }

    #[test]
    fn timestamp_suffix_lands_on_data_lines_only() {
        let config = config(false, LabelSet::new());
        let mut out = Vec::new();
        write_reading(
            &mut out,
            &Reading {
                humidity: 40.0,
                temperature: 20.0,
            },
            &config,
            Some(1714857600123),
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("dht22_relat_humidity 40.00 1714857600123\n"));
        assert!(text.contains("dht22_temperature_celsius 20.00 1714857600123\n"));
        for line in text.lines().filter(|l| l.starts_with('#')) {
            assert!(!line.ends_with("1714857600123"));
        }
    }
}
