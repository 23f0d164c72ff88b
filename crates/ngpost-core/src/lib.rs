pub mod app_config;
pub mod bounds;
pub mod config;
pub mod error;
pub mod location;
pub mod table;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, ViabilityThresholds};
pub use bounds::{is_within_nigeria, Bounds, NIGERIA_BOUNDS};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ErrorKind, TableError};
pub use location::{Coordinates, LocationResult, LocationSource, MAX_CONFIDENCE};
pub use table::{PostalCodeRecord, PostalCodeTable};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
