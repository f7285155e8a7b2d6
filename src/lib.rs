pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::nominatim::NominatimGeocoder;
pub use adapters::rate_limit::{FixedIntervalLimiter, NoDelay};
pub use config::cli::LocalStorage;
#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use core::{etl::EtlEngine, pipeline::GeocodePipeline};
pub use domain::model::{Coordinates, Crs, GeoTable, GeocodeOutcome, MissPolicy};
pub use utils::error::{GeocodeError, Result};
