use crate::core::{Crs, EnrichedTable, GeoTable};
use crate::utils::error::{GeocodeError, Result};
use geo::Point;

/// Pairs each row with its point and tags the table as WGS 84.
///
/// The CRS is asserted, not derived: coordinates are neither checked nor transformed.
pub fn to_geo_table(data: EnrichedTable, points: Vec<Option<Point<f64>>>) -> Result<GeoTable> {
    if data.len() != points.len() {
        return Err(GeocodeError::ProcessingError {
            message: format!(
                "Row count ({}) does not match geometry count ({})",
                data.len(),
                points.len()
            ),
        });
    }

    Ok(GeoTable {
        data,
        geometry: points,
        crs: Crs::wgs84(),
    })
}
