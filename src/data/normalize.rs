use std::sync::OnceLock;

use regex::Regex;

use super::model::{CellValue, Dataset, DropReason, LoadReport, RawPosting, Record};

// ---------------------------------------------------------------------------
// Compensation
// ---------------------------------------------------------------------------

/// Optional rupee glyph, optional space, a digit run with `,` separators,
/// optionally followed by `-` and a second digit run.
const CTC_PATTERN: &str = r"₹?\s?[0-9,]+(?:\s?-\s?[0-9,]+)?";

fn ctc_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(CTC_PATTERN).expect("CTC_PATTERN is a valid regex"))
}

/// Parse a compensation cell into a single number.
///
/// Only text is parsed. The first amount or range in the text wins, and a
/// range collapses to its midpoint:
///
/// * `"₹ 3,00,000 - 4,60,000 /year"` → `380000.0`
/// * `"₹5,00,000"` → `500000.0`
/// * `"Not disclosed"` → `None`
pub fn parse_ctc(value: &CellValue) -> Option<f64> {
    value.as_text().and_then(parse_ctc_text)
}

/// Text half of [`parse_ctc`].
pub fn parse_ctc_text(text: &str) -> Option<f64> {
    let token = ctc_pattern().find(text)?.as_str();
    let token = token.replace('₹', "");

    let sides: Vec<f64> = token
        .trim()
        .split('-')
        .filter_map(|side| side.replace(',', "").trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .collect();

    match sides.as_slice() {
        [] => None,
        [single] => Some(*single),
        many => Some(many.iter().sum::<f64>() / many.len() as f64),
    }
}

/// Compensation for a raw cell: numbers are taken as-is, text goes through
/// [`parse_ctc`]. Negative or non-finite results are rejected.
pub fn ctc_value(value: &CellValue) -> Option<f64> {
    let ctc = match value {
        CellValue::Integer(_) | CellValue::Float(_) => value.as_f64(),
        other => parse_ctc(other),
    }?;
    (ctc.is_finite() && ctc >= 0.0).then_some(ctc)
}

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// Keep the part of a location before the first comma, trimmed.
/// Non-text cells pass through unchanged.
pub fn normalize_location(value: &CellValue) -> CellValue {
    match value {
        CellValue::Text(s) => {
            let head = s.split(',').next().unwrap_or_default();
            CellValue::Text(head.trim().to_string())
        }
        other => other.clone(),
    }
}

// ---------------------------------------------------------------------------
// Rows → working dataset
// ---------------------------------------------------------------------------

/// Normalize one raw row into a [`Record`].
pub fn normalize_row(raw: &RawPosting) -> Result<Record, DropReason> {
    let ctc = ctc_value(&raw.ctc).ok_or(DropReason::Compensation)?;
    let company_name = raw.company_name.as_key().ok_or(DropReason::MissingKey)?;
    let skill_required = raw.skill_required.as_key().ok_or(DropReason::MissingKey)?;
    let location = normalize_location(&raw.location)
        .as_key()
        .ok_or(DropReason::MissingKey)?;

    Ok(Record {
        company_name,
        skill_required,
        location,
        ctc,
    })
}

/// Build the working dataset, dropping rows that fail to normalize.
pub fn normalize_rows(rows: &[RawPosting]) -> Dataset {
    let mut report = LoadReport {
        rows_read: rows.len(),
        ..LoadReport::default()
    };
    let mut records = Vec::with_capacity(rows.len());

    for (row_no, raw) in rows.iter().enumerate() {
        match normalize_row(raw) {
            Ok(record) => records.push(record),
            Err(reason) => {
                log::debug!("Dropping row {row_no} ({reason:?}): ctc={}", raw.ctc);
                report.record_drop(reason);
            }
        }
    }

    if records.is_empty() && !rows.is_empty() {
        log::warn!("All {} rows were dropped during normalization", rows.len());
    }

    Dataset::new(records, report)
}
