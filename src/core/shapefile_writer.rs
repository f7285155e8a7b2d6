//! Encodes a [`GeoTable`] as an ESRI shapefile.
//!
//! Everything is encoded in memory; callers hand the resulting component files to
//! [`Storage::write_files`](crate::core::Storage::write_files) so that a failed run
//! leaves nothing behind.

use crate::core::{Crs, GeoTable};
use crate::utils::error::{GeocodeError, Result};
use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::{ShapeWriter, Writer};
use std::collections::HashSet;
use std::io::Cursor;
use std::path::{Path, PathBuf};

const MAX_FIELD_NAME_LEN: usize = 10;
const MAX_CHARACTER_LEN: usize = 254;
// The DBF copies of longitude/latitude are rounded to 11 decimal places (about a
// micrometre on the ground). Point geometries in the .shp keep the full f64 values.
const COORD_FIELD_LEN: u8 = 19;
const COORD_DECIMALS: u8 = 11;

pub const WGS84_PRJ: &str = concat!(
    r#"GEOGCS["WGS 84","#,
    r#"DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],"#,
    r#"PRIMEM["Greenwich",0,AUTHORITY["EPSG","8901"]],"#,
    r#"UNIT["degree",0.0174532925199433,AUTHORITY["EPSG","9122"]],"#,
    r#"AUTHORITY["EPSG","4326"]]"#
);

/// The four component files of one shapefile.
#[derive(Debug, Clone)]
pub struct ShapefileBundle {
    pub shp: Vec<u8>,
    pub shx: Vec<u8>,
    pub dbf: Vec<u8>,
    pub prj: Vec<u8>,
    pub feature_count: usize,
}

impl ShapefileBundle {
    /// Pairs each component with its path, all sharing `shp_path`'s stem.
    pub fn into_files(self, shp_path: &Path) -> Vec<(PathBuf, Vec<u8>)> {
        vec![
            (shp_path.with_extension("shp"), self.shp),
            (shp_path.with_extension("shx"), self.shx),
            (shp_path.with_extension("dbf"), self.dbf),
            (shp_path.with_extension("prj"), self.prj),
        ]
    }
}

/// `out/states` and `out/states.shp` both name `out/states.shp`.
pub fn shp_path(output: &str) -> PathBuf {
    let path = Path::new(output);
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("shp") => path.to_path_buf(),
        _ => path.with_extension("shp"),
    }
}

pub fn prj_for(crs: &Crs) -> Result<&'static str> {
    match crs.epsg {
        4326 => Ok(WGS84_PRJ),
        other => Err(GeocodeError::ProcessingError {
            message: format!("No projection definition for EPSG:{}", other),
        }),
    }
}

/// dBase field names: at most 10 ASCII characters, unique, never empty.
pub fn dbf_field_names(columns: &[String]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(columns.len());

    for column in columns {
        let mut base: String = column
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .take(MAX_FIELD_NAME_LEN)
            .collect();
        if base.is_empty() {
            base = "field".to_string();
        }

        let mut candidate = base.clone();
        let mut n = 1;
        while used.contains(&candidate.to_ascii_lowercase()) {
            let suffix = format!("_{}", n);
            let keep = MAX_FIELD_NAME_LEN.saturating_sub(suffix.len()).min(base.len());
            candidate = format!("{}{}", &base[..keep], suffix);
            n += 1;
        }

        used.insert(candidate.to_ascii_lowercase());
        names.push(candidate);
    }

    names
}

fn truncate_to_bytes(value: &str, max: usize) -> &str {
    if value.len() <= max {
        return value;
    }
    let mut end = max;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

fn cell(geo: &GeoTable, row: usize, col: usize) -> &str {
    geo.data
        .table
        .rows
        .get(row)
        .and_then(|r| r.get(col))
        .map(String::as_str)
        .unwrap_or_default()
}

fn field_name(name: &str) -> Result<FieldName> {
    FieldName::try_from(name).map_err(|_| GeocodeError::ProcessingError {
        message: format!("Invalid dBase field name {:?}", name),
    })
}

/// Encodes rows that have a geometry; rows without one are left out.
pub fn encode(geo: &GeoTable) -> Result<ShapefileBundle> {
    let prj = prj_for(&geo.crs)?;
    let attributes = geo.data.attribute_columns();

    let rows: Vec<(usize, shapefile::Point)> = geo
        .geometry
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.map(|p| (i, shapefile::Point::new(p.x(), p.y()))))
        .collect();

    if rows.is_empty() {
        return Err(GeocodeError::ProcessingError {
            message: "No rows with coordinates to write".to_string(),
        });
    }

    let skipped = geo.len() - rows.len();
    if skipped > 0 {
        tracing::warn!("Leaving {} rows without coordinates out of the shapefile", skipped);
    }

    let column_names: Vec<String> = geo.data.columns();
    let field_names = dbf_field_names(&column_names);
    let (attribute_fields, coord_fields) = field_names.split_at(attributes.len());

    let mut builder = TableWriterBuilder::new();
    for ((col_idx, _), name) in attributes.iter().zip(attribute_fields) {
        let width = rows
            .iter()
            .map(|(row_idx, _)| cell(geo, *row_idx, *col_idx).len())
            .max()
            .unwrap_or(0)
            .clamp(1, MAX_CHARACTER_LEN);
        builder = builder.add_character_field(field_name(name)?, width as u8);
    }
    for name in coord_fields {
        builder = builder.add_numeric_field(field_name(name)?, COORD_FIELD_LEN, COORD_DECIMALS);
    }

    let mut shp = Cursor::new(Vec::new());
    let mut shx = Cursor::new(Vec::new());
    let mut dbf = Cursor::new(Vec::new());
    {
        let shape_writer = ShapeWriter::with_shx(&mut shp, &mut shx);
        let dbase_writer = builder.build_with_dest(&mut dbf);
        let mut writer = Writer::new(shape_writer, dbase_writer);

        for (row_idx, point) in &rows {
            let mut record = Record::default();
            for ((col_idx, _), name) in attributes.iter().zip(attribute_fields) {
                let value = truncate_to_bytes(cell(geo, *row_idx, *col_idx), MAX_CHARACTER_LEN);
                record.insert(name.clone(), FieldValue::Character(Some(value.to_string())));
            }
            record.insert(coord_fields[0].clone(), FieldValue::Numeric(Some(point.x)));
            record.insert(coord_fields[1].clone(), FieldValue::Numeric(Some(point.y)));

            writer.write_shape_and_record(point, &record)?;
        }
        // Headers are finalized when the writer drops.
    }

    tracing::debug!(
        "Encoded {} features ({}, {} fields)",
        rows.len(),
        geo.crs.name,
        field_names.len()
    );

    Ok(ShapefileBundle {
        shp: shp.into_inner(),
        shx: shx.into_inner(),
        dbf: dbf.into_inner(),
        prj: prj.as_bytes().to_vec(),
        feature_count: rows.len(),
    })
}
