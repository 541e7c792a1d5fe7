use crate::core::{ColumnIndices, Record, Storage, Table};
use crate::utils::error::{DeckError, Result};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Reads the input table through `storage`.
///
/// Existence is checked up front so a missing file is reported as such rather
/// than as a generic read failure. Anything that goes wrong afterwards, from the
/// read itself to malformed CSV, is wrapped in [`DeckError::ParseError`].
pub fn load_table<S: Storage>(storage: &S, path: &str, delimiter: u8) -> Result<Table> {
    if !storage.exists(path) {
        return Err(DeckError::MissingInputFile {
            path: path.to_string(),
        });
    }

    let data = storage
        .read_file(path)
        .map_err(|e| DeckError::parse(path, e))?;

    parse_table(&data, delimiter).map_err(|e| DeckError::parse(path, e))
}

pub fn parse_table(data: &[u8], delimiter: u8) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, header)| {
            if i == 0 {
                header.trim_start_matches(BYTE_ORDER_MARK).to_string()
            } else {
                header.to_string()
            }
        })
        .collect();

    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result?;
        let number = index + 1;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(number as u64 + 1);

        records.push(Record {
            number,
            line,
            values: record.iter().map(str::to_string).collect(),
        });
    }

    tracing::debug!("Parsed {} data rows", records.len());
    Ok(Table { headers, records })
}

/// Both required columns must be present in the header; extra columns are ignored.
pub fn validate_columns(table: &Table, front: &str, back: &str) -> Result<ColumnIndices> {
    match (table.column_index(front), table.column_index(back)) {
        (Some(front), Some(back)) => Ok(ColumnIndices { front, back }),
        (front_idx, back_idx) => {
            let mut missing = Vec::new();
            if front_idx.is_none() {
                missing.push(front.to_string());
            }
            if back_idx.is_none() {
                missing.push(back.to_string());
            }
            Err(DeckError::SchemaError { missing })
        }
    }
}
