use crate::error::DatasetError;
use chrono::NaiveDate;
use core_types::Observation;
use csv::StringRecord;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const REQUIRED_COLUMNS: [&str; 3] = ["series_id", "date", "value"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: parsed observations plus the rows that were rejected.
#[derive(Debug, Clone)]
pub struct IngestedObservations {
    pub observations: Vec<Observation>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Reads long-format observations (`series_id,date,value`) from a CSV file.
pub fn read_observations(path: impl AsRef<Path>) -> Result<IngestedObservations, DatasetError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_observations_from(file)
}

/// Reads long-format observations from any reader.
///
/// Bad rows are skipped and reported in `row_errors`; the call only fails when
/// the header is unusable or no row survives.
pub fn read_observations_from<R: Read>(reader: R) -> Result<IngestedObservations, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let columns = column_indices(&headers)?;

    let mut observations = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // records() starts on the line after the header, and lines are 1-based
        let line = idx + 2;
        rows_read += 1;

        let parsed = result
            .map_err(|e| format!("CSV parse error: {e}"))
            .and_then(|record| parse_row(&record, &columns));

        match parsed {
            Ok(obs) => observations.push(obs),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    for err in &row_errors {
        tracing::warn!(line = err.line, "Skipping row: {}", err.message);
    }

    if observations.is_empty() {
        return Err(DatasetError::EmptyDataset { rows_read });
    }

    tracing::info!(
        rows_read,
        observations = observations.len(),
        rejected = row_errors.len(),
        "Observations loaded"
    );

    Ok(IngestedObservations {
        observations,
        row_errors,
        rows_read,
    })
}

struct Columns {
    series_id: usize,
    date: usize,
    value: usize,
}

fn column_indices(headers: &StringRecord) -> Result<Columns, DatasetError> {
    let map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !map.contains_key(**c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DatasetError::MissingColumns(missing));
    }

    Ok(Columns {
        series_id: map["series_id"],
        date: map["date"],
        value: map["value"],
    })
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase()
}

fn parse_row(record: &StringRecord, columns: &Columns) -> Result<Observation, String> {
    let field = |idx: usize| record.get(idx).unwrap_or("");

    let series_id = field(columns.series_id);
    if series_id.is_empty() {
        return Err("empty series_id".to_string());
    }
    let date = parse_date(field(columns.date))?;
    let value = parse_value(field(columns.value))?;

    Ok(Observation::new(series_id, date, value))
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM`, or a timestamp whose first ten characters are a date.
fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d") {
        return Ok(date);
    }
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        .ok_or_else(|| format!("invalid date '{raw}'"))
}

fn parse_value(raw: &str) -> Result<Option<f64>, String> {
    match raw.to_ascii_lowercase().as_str() {
        "" | "nan" | "na" | "n/a" | "null" | "." => Ok(None),
        _ => raw
            .parse::<f64>()
            .map(Some)
            .map_err(|_| format!("invalid value '{raw}'")),
    }
}
