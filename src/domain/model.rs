use geo::Point;
use serde::{Deserialize, Serialize};

pub const LONGITUDE_COLUMN: &str = "longitude";
pub const LATITUDE_COLUMN: &str = "latitude";

/// Rows as read from the input file, in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeocodeOutcome {
    Found(Coordinates),
    NotFound,
}

/// What to do with a row whose place name has no match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum MissPolicy {
    #[default]
    Abort,
    Skip,
}

/// Input table plus one coordinate pair per row. `None` marks a skipped miss.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedTable {
    pub table: Table,
    pub coordinates: Vec<Option<Coordinates>>,
}

impl EnrichedTable {
    /// Input columns that are carried through; existing longitude/latitude columns are replaced.
    pub fn attribute_columns(&self) -> Vec<(usize, &str)> {
        self.table
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.as_str() != LONGITUDE_COLUMN && c.as_str() != LATITUDE_COLUMN)
            .map(|(i, c)| (i, c.as_str()))
            .collect()
    }

    pub fn columns(&self) -> Vec<String> {
        self.attribute_columns()
            .into_iter()
            .map(|(_, c)| c.to_string())
            .chain([LONGITUDE_COLUMN.to_string(), LATITUDE_COLUMN.to_string()])
            .collect()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.coordinates.iter().filter(|c| c.is_none()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crs {
    pub epsg: u32,
    pub name: String,
}

impl Default for Crs {
    fn default() -> Self {
        Self::wgs84()
    }
}

impl Crs {
    pub fn new(epsg: u32, name: impl Into<String>) -> Self {
        Self {
            epsg,
            name: name.into(),
        }
    }

    /// WGS 84 (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::new(4326, "WGS 84")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeoTable {
    pub data: EnrichedTable,
    pub geometry: Vec<Option<Point<f64>>>,
    pub crs: Crs,
}

impl GeoTable {
    pub fn len(&self) -> usize {
        self.geometry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enriched_columns_replace_existing_coordinates() {
        let table = Table::new(
            vec![
                "name".to_string(),
                "latitude".to_string(),
                "population".to_string(),
            ],
            vec![vec!["Texas".to_string(), "".to_string(), "29000000".to_string()]],
        );
        let enriched = EnrichedTable {
            table,
            coordinates: vec![Some(Coordinates::new(-99.9, 31.9))],
        };

        assert_eq!(
            enriched.columns(),
            vec!["name", "population", "longitude", "latitude"]
        );
        assert_eq!(enriched.attribute_columns(), vec![(0, "name"), (2, "population")]);
    }

    #[test]
    fn test_missing_count() {
        let enriched = EnrichedTable {
            table: Table::new(
                vec!["name".to_string()],
                vec![vec!["A".to_string()], vec!["B".to_string()]],
            ),
            coordinates: vec![None, Some(Coordinates::new(1.0, 2.0))],
        };
        assert_eq!(enriched.missing_count(), 1);
    }

    #[test]
    fn test_crs_default_is_wgs84() {
        assert_eq!(Crs::default().epsg, 4326);
        assert_eq!(Crs::default().name, "WGS 84");
    }
}
