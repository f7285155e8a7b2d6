use crate::core::EnrichedTable;
use geo::Point;

/// One point per row, `x` = longitude and `y` = latitude. Skipped rows stay `None`.
pub fn get_points(data: &EnrichedTable) -> Vec<Option<Point<f64>>> {
    data.coordinates
        .iter()
        .map(|c| c.map(|c| Point::new(c.longitude, c.latitude)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Coordinates, Table};

    #[test]
    fn test_points_follow_row_order_and_axis_order() {
        let data = EnrichedTable {
            table: Table::new(
                vec!["name".to_string()],
                vec![
                    vec!["California".to_string()],
                    vec!["Nowhere".to_string()],
                    vec!["Texas".to_string()],
                ],
            ),
            coordinates: vec![
                Some(Coordinates::new(-119.4, 36.7)),
                None,
                Some(Coordinates::new(-99.9, 31.9)),
            ],
        };

        let points = get_points(&data);

        assert_eq!(points.len(), 3);
        let first = points[0].unwrap();
        assert_eq!(first.x(), -119.4);
        assert_eq!(first.y(), 36.7);
        assert!(points[1].is_none());
        assert_eq!(points[2], Some(Point::new(-99.9, 31.9)));
    }
}
