use crate::core::{Coordinates, EnrichedTable, GeocodeOutcome, Geocoder, MissPolicy, RateLimiter, Table};
use crate::utils::error::{GeocodeError, Result};
use crate::utils::progress;

/// Looks up every row's place name, one request at a time, and returns a copy of
/// `table` with one coordinate pair per row.
///
/// `limiter` is awaited before each lookup. Under [`MissPolicy::Abort`] the first
/// row without a match ends the run with [`GeocodeError::GeocodeMissError`]; under
/// [`MissPolicy::Skip`] that row gets `None` and the loop continues. Row numbers in
/// errors and logs are 1-based data rows.
pub async fn get_coordinates(
    table: &Table,
    name_column: &str,
    geocoder: &dyn Geocoder,
    limiter: &dyn RateLimiter,
    policy: MissPolicy,
    show_progress: bool,
) -> Result<EnrichedTable> {
    let name_idx = table.column_index(name_column).ok_or_else(|| {
        GeocodeError::parse(format!("Required column {:?} not found", name_column))
    })?;

    let pb = progress::create_progress_bar(table.len() as u64, "Geocoding", show_progress);
    let mut coordinates: Vec<Option<Coordinates>> = Vec::with_capacity(table.len());

    for (i, row) in table.rows.iter().enumerate() {
        let row_number = i + 1;
        let query = row.get(name_idx).map(String::as_str).unwrap_or_default();

        limiter.wait().await;
        tracing::debug!("Geocoding row {}: {:?}", row_number, query);

        let outcome = match geocoder.geocode(query).await {
            Ok(outcome) => outcome,
            Err(e) => {
                progress::finish_error(&pb, &format!("failed at row {}", row_number));
                return Err(e);
            }
        };

        match outcome {
            GeocodeOutcome::Found(coords) => {
                tracing::debug!(
                    "Row {} -> ({}, {})",
                    row_number,
                    coords.longitude,
                    coords.latitude
                );
                coordinates.push(Some(coords));
            }
            GeocodeOutcome::NotFound => match policy {
                MissPolicy::Abort => {
                    progress::finish_error(&pb, &format!("no match at row {}", row_number));
                    return Err(GeocodeError::GeocodeMissError {
                        row: row_number,
                        query: query.to_string(),
                    });
                }
                MissPolicy::Skip => {
                    tracing::warn!("No match for row {} ({:?}), skipping", row_number, query);
                    coordinates.push(None);
                }
            },
        }

        pb.inc(1);
    }

    progress::finish_success(&pb, &format!("Geocoded {} rows", table.len()));

    Ok(EnrichedTable {
        table: table.clone(),
        coordinates,
    })
}
