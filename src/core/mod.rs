pub mod config;
pub mod error;
pub mod types;

pub use config::{AsteroidFieldConfig, MatchConfig};
pub use error::{ArmadaError, ConfigError, Result, SetupError, ValidationError};
pub use types::{GameId, PixelOffset, VesselId};
