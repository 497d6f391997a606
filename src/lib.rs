pub mod config;
pub mod dht22;
pub mod error;
pub mod exposition;
pub mod labels;
pub mod sampler;
pub mod sensor;

pub use config::{Args, Config};
pub use error::{ConfigError, SamplerError};
pub use labels::{Label, LabelSet, ValidationError};
pub use sampler::TickClock;
pub use sensor::{Reading, Sensor, SensorError};
