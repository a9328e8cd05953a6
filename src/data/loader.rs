use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Dataset, RawPosting};
use super::normalize::normalize_rows;
use crate::error::InsightsError;

pub const COMPANY_COLUMN: &str = "company_name";
pub const SKILL_COLUMN: &str = "skill_required";
pub const LOCATION_COLUMN: &str = "location";
pub const CTC_COLUMN: &str = "ctc";

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and normalize the working dataset from a file.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let rows = load_file(path).with_context(|| format!("loading {}", path.display()))?;
    let dataset = normalize_rows(&rows);
    let report = dataset.report();
    log::info!(
        "Loaded {} postings from {} ({} rows read, {} without compensation, {} missing a key)",
        dataset.len(),
        path.display(),
        report.rows_read,
        report.dropped_compensation,
        report.dropped_missing_key,
    );
    Ok(dataset)
}

/// Read raw postings from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the four posting columns (extra columns ignored)
/// * `.json`    – `[{ "company_name": ..., "skill_required": ..., ... }, ...]`
/// * `.parquet` – flat columns named like the CSV headers
pub fn load_file(path: &Path) -> Result<Vec<RawPosting>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(InsightsError::UnsupportedFormat(other.to_string()).into()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Company, skill and location are kept as text exactly as written. The
/// `ctc` column is typed as a whole: numeric only when every non-empty cell
/// is a number, otherwise every cell stays text for [`parse_ctc`].
///
/// [`parse_ctc`]: super::normalize::parse_ctc
fn load_csv(path: &Path) -> Result<Vec<RawPosting>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let [company, skill, location, ctc] = column_positions(|name| {
        headers.iter().position(|h| h == name)
    })?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        records.push(result.with_context(|| format!("CSV row {row_no}"))?);
    }

    let ctc_is_numeric = records
        .iter()
        .filter_map(|r| r.get(ctc))
        .filter(|s| !s.trim().is_empty())
        .all(|s| s.trim().parse::<f64>().is_ok());

    let rows = records
        .iter()
        .map(|record| {
            let field = |idx: usize| record.get(idx).unwrap_or("");
            RawPosting {
                company_name: text_cell(field(company)),
                skill_required: text_cell(field(skill)),
                location: text_cell(field(location)),
                ctc: if ctc_is_numeric {
                    number_cell(field(ctc))
                } else {
                    text_cell(field(ctc))
                },
            }
        })
        .collect();

    Ok(rows)
}

fn text_cell(s: &str) -> CellValue {
    if s.trim().is_empty() {
        CellValue::Null
    } else {
        CellValue::Text(s.to_string())
    }
}

fn number_cell(s: &str) -> CellValue {
    let s = s.trim();
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    s.parse::<f64>().map(CellValue::Float).unwrap_or(CellValue::Null)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
/// A missing key reads as `Null`.
fn load_json(path: &Path) -> Result<Vec<RawPosting>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let obj = rec
                .as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))?;
            let cell = |key: &str| obj.get(key).map(json_to_cell).unwrap_or(CellValue::Null);

            Ok(RawPosting {
                company_name: cell(COMPANY_COLUMN),
                skill_required: cell(SKILL_COLUMN),
                location: cell(LOCATION_COLUMN),
                ctc: cell(CTC_COLUMN),
            })
        })
        .collect()
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load postings from a Parquet file written by Pandas (`df.to_parquet()`)
/// or Polars (`df.write_parquet()`). A numeric `ctc` column is kept numeric.
fn load_parquet(path: &Path) -> Result<Vec<RawPosting>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let [company, skill, location, ctc] =
            column_positions(|name| schema.index_of(name).ok())?;

        for row in 0..batch.num_rows() {
            rows.push(RawPosting {
                company_name: extract_cell(batch.column(company), row),
                skill_required: extract_cell(batch.column(skill), row),
                location: extract_cell(batch.column(location), row),
                ctc: extract_cell(batch.column(ctc), row),
            });
        }
    }

    Ok(rows)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let any = col.as_any();
    let cell = match col.data_type() {
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .map(|a| CellValue::Text(a.value(row).to_string())),
        DataType::LargeUtf8 => Some(CellValue::Text(col.as_string::<i64>().value(row).to_string())),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| CellValue::Integer(a.value(row) as i64)),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| CellValue::Integer(a.value(row))),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| CellValue::Float(a.value(row) as f64)),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map(|a| CellValue::Float(a.value(row))),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map(|a| CellValue::Bool(a.value(row))),
        other => Some(CellValue::Text(format!("{other:?}"))),
    };
    cell.unwrap_or(CellValue::Null)
}

// -- helpers --

/// Positions of the company, skill, location and ctc columns, in that order.
fn column_positions(find: impl Fn(&str) -> Option<usize>) -> Result<[usize; 4]> {
    let mut positions = [0usize; 4];
    for (slot, name) in positions
        .iter_mut()
        .zip([COMPANY_COLUMN, SKILL_COLUMN, LOCATION_COLUMN, CTC_COLUMN])
    {
        *slot = find(name).ok_or_else(|| InsightsError::MissingColumn(name.to_string()))?;
    }
    Ok(positions)
}
