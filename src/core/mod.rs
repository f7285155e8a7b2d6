pub mod assemble;
pub mod etl;
pub mod geocode;
pub mod geometry;
pub mod loader;
pub mod pipeline;
pub mod shapefile_writer;

pub use crate::domain::model::{
    Coordinates, Crs, EnrichedTable, GeoTable, GeocodeOutcome, MissPolicy, Table,
    LATITUDE_COLUMN, LONGITUDE_COLUMN,
};
pub use crate::domain::ports::{ConfigProvider, Geocoder, Pipeline, RateLimiter, Storage};
pub use crate::utils::error::Result;
