use std::collections::BTreeSet;

use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Row selection
// ---------------------------------------------------------------------------

/// Allowed skills and locations. A row passes only when both its skill and
/// its location are in the respective set.
#[derive(Debug, Clone, Default)]
pub struct RowFilter {
    pub skills: BTreeSet<String>,
    pub locations: BTreeSet<String>,
}

impl RowFilter {
    pub fn new(skills: &[String], locations: &[String]) -> Self {
        RowFilter {
            skills: skills.iter().cloned().collect(),
            locations: locations.iter().cloned().collect(),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.skills.contains(&record.skill_required) && self.locations.contains(&record.location)
    }
}

/// Records passing `filter`, in dataset order.
pub fn filtered_records<'a>(dataset: &'a Dataset, filter: &RowFilter) -> Vec<&'a Record> {
    dataset
        .records()
        .iter()
        .filter(|r| filter.matches(r))
        .collect()
}

/// The `n` records with the highest compensation, highest first.
/// Equal compensation keeps dataset order.
pub fn top_by_ctc(dataset: &Dataset, n: usize) -> Vec<&Record> {
    let mut records: Vec<&Record> = dataset.records().iter().collect();
    records.sort_by(|a, b| b.ctc.total_cmp(&a.ctc));
    records.truncate(n);
    records
}
