use crate::core::Table;
use crate::utils::error::{GeocodeError, Result};

/// Parses comma-separated text with a header row into a [`Table`].
///
/// Fails with a parse error when rows have inconsistent widths, the text is not
/// UTF-8, or `name_column` is not among the headers.
pub fn load_table(bytes: &[u8], name_column: &str) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| GeocodeError::parse(format!("Invalid CSV header: {}", e)))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if !columns.iter().any(|c| c == name_column) {
        return Err(GeocodeError::parse(format!(
            "Required column {:?} not found (columns: {})",
            name_column,
            columns.join(", ")
        )));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| GeocodeError::parse(format!("Invalid CSV row: {}", e)))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    tracing::debug!("Loaded {} rows with columns {:?}", rows.len(), columns);
    Ok(Table::new(columns, rows))
}
