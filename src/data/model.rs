use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the source table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a tabular source can carry.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Numeric view of the cell, if it is already a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The cell as a grouping key. `Null` and blank text have no key.
    pub fn as_key(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::Text(s) if s.trim().is_empty() => None,
            other => Some(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// RawPosting – one row as read from the source, before normalization
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RawPosting {
    pub company_name: CellValue,
    pub skill_required: CellValue,
    pub location: CellValue,
    pub ctc: CellValue,
}

// ---------------------------------------------------------------------------
// Record – one row of the working dataset
// ---------------------------------------------------------------------------

/// A normalized job posting. `ctc` is always finite and non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub company_name: String,
    pub skill_required: String,
    /// Leading comma-delimited segment of the source location.
    pub location: String,
    pub ctc: f64,
}

// ---------------------------------------------------------------------------
// Dataset – the working dataset plus what was dropped on the way in
// ---------------------------------------------------------------------------

/// Why a raw row did not make it into the working dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Compensation did not normalize to a value.
    Compensation,
    /// Company, skill or location was empty.
    MissingKey,
}

/// Counts collected while building a [`Dataset`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub rows_read: usize,
    pub dropped_compensation: usize,
    pub dropped_missing_key: usize,
}

impl LoadReport {
    pub fn dropped(&self) -> usize {
        self.dropped_compensation + self.dropped_missing_key
    }

    pub(crate) fn record_drop(&mut self, reason: DropReason) {
        match reason {
            DropReason::Compensation => self.dropped_compensation += 1,
            DropReason::MissingKey => self.dropped_missing_key += 1,
        }
    }
}

/// The immutable working dataset, in source row order.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
    report: LoadReport,
}

impl Dataset {
    pub(crate) fn new(records: Vec<Record>, report: LoadReport) -> Self {
        Dataset { records, report }
    }

    /// Build a dataset from records that are already normalized.
    pub fn from_records(records: Vec<Record>) -> Self {
        let report = LoadReport {
            rows_read: records.len(),
            ..LoadReport::default()
        };
        Dataset { records, report }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn report(&self) -> LoadReport {
        self.report
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
