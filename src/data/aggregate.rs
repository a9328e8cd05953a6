use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Key extractors
// ---------------------------------------------------------------------------

pub fn by_skill(r: &Record) -> &str {
    &r.skill_required
}

pub fn by_location(r: &Record) -> &str {
    &r.location
}

pub fn by_company(r: &Record) -> &str {
    &r.company_name
}

// ---------------------------------------------------------------------------
// Table – dense labelled 2-D result of a pivot or cross-tab
// ---------------------------------------------------------------------------

/// Rows and columns are sorted by label; every cell is filled.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<T> {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub cells: Vec<Vec<T>>,
}

impl<T: Copy + Default> Table<T> {
    fn from_cells(cells: BTreeMap<(String, String), T>) -> Self {
        let rows: Vec<String> = cells
            .keys()
            .map(|(r, _)| r.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let columns: Vec<String> = cells
            .keys()
            .map(|(_, c)| c.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut dense = vec![vec![T::default(); columns.len()]; rows.len()];
        for ((r, c), value) in cells {
            // Both labels came from `cells`, so the lookups always hit.
            if let (Ok(i), Ok(j)) = (rows.binary_search(&r), columns.binary_search(&c)) {
                dense[i][j] = value;
            }
        }

        Table {
            rows,
            columns,
            cells: dense,
        }
    }

    /// Cell at (`row`, `column`), if both labels exist.
    pub fn get(&self, row: &str, column: &str) -> Option<T> {
        let i = self.rows.iter().position(|r| r == row)?;
        let j = self.columns.iter().position(|c| c == column)?;
        Some(self.cells[i][j])
    }

    /// Sub-table with the given rows and columns, in the given order.
    /// Labels absent from this table read as `T::default()`.
    pub fn select(&self, rows: &[String], columns: &[String]) -> Table<T> {
        let cells = rows
            .iter()
            .map(|r| {
                columns
                    .iter()
                    .map(|c| self.get(r, c).unwrap_or_default())
                    .collect()
            })
            .collect();

        Table {
            rows: rows.to_vec(),
            columns: columns.to_vec(),
            cells,
        }
    }
}

// ---------------------------------------------------------------------------
// Grouping primitives
// ---------------------------------------------------------------------------

/// Mean compensation per group.
pub fn group_mean<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    key: impl Fn(&Record) -> &str,
) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<String, (f64, u64)> = BTreeMap::new();
    for r in records {
        let entry = sums.entry(key(r).to_string()).or_default();
        entry.0 += r.ctc;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(k, (sum, n))| (k, sum / n as f64))
        .collect()
}

/// Number of records per group.
pub fn group_count<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    key: impl Fn(&Record) -> &str,
) -> BTreeMap<String, u64> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for r in records {
        *counts.entry(key(r).to_string()).or_default() += 1;
    }
    counts
}

/// Number of distinct `member` values per group.
pub fn distinct_count<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    key: impl Fn(&Record) -> &str,
    member: impl Fn(&Record) -> &str,
) -> BTreeMap<String, u64> {
    let mut members: BTreeMap<&'a str, BTreeSet<&'a str>> = BTreeMap::new();
    for r in records {
        members.entry(key(r)).or_default().insert(member(r));
    }
    members
        .into_iter()
        .map(|(k, set)| (k.to_string(), set.len() as u64))
        .collect()
}

/// Individual compensation values per group, in record order.
pub fn group_values<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    key: impl Fn(&Record) -> &str,
) -> BTreeMap<String, Vec<f64>> {
    let mut values: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for r in records {
        values.entry(key(r).to_string()).or_default().push(r.ctc);
    }
    values
}

/// Mean compensation per (row, column) pair. Empty pairs are `0.0`.
pub fn pivot_mean<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    row: impl Fn(&Record) -> &str,
    column: impl Fn(&Record) -> &str,
) -> Table<f64> {
    let mut sums: BTreeMap<(String, String), (f64, u64)> = BTreeMap::new();
    for r in records {
        let entry = sums
            .entry((row(r).to_string(), column(r).to_string()))
            .or_default();
        entry.0 += r.ctc;
        entry.1 += 1;
    }
    Table::from_cells(
        sums.into_iter()
            .map(|(k, (sum, n))| (k, sum / n as f64))
            .collect(),
    )
}

/// Record count per (row, column) pair. Empty pairs are `0`.
pub fn crosstab<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    row: impl Fn(&Record) -> &str,
    column: impl Fn(&Record) -> &str,
) -> Table<u64> {
    let mut counts: BTreeMap<(String, String), u64> = BTreeMap::new();
    for r in records {
        *counts
            .entry((row(r).to_string(), column(r).to_string()))
            .or_default() += 1;
    }
    Table::from_cells(counts)
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Total order used by every ranking, so counts and means sort alike.
pub trait RankValue: Copy {
    fn rank_cmp(&self, other: &Self) -> Ordering;
}

impl RankValue for f64 {
    fn rank_cmp(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

impl RankValue for u64 {
    fn rank_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

/// Entries sorted by value, largest first. The sort is stable, so equal
/// values keep key order.
pub fn ranked<V: RankValue>(map: &BTreeMap<String, V>) -> Vec<(String, V)> {
    let mut entries: Vec<(String, V)> = map.iter().map(|(k, v)| (k.clone(), *v)).collect();
    entries.sort_by(|a, b| b.1.rank_cmp(&a.1));
    entries
}

/// Entries sorted by value, smallest first; stable like [`ranked`].
pub fn ranked_ascending<V: RankValue>(map: &BTreeMap<String, V>) -> Vec<(String, V)> {
    let mut entries: Vec<(String, V)> = map.iter().map(|(k, v)| (k.clone(), *v)).collect();
    entries.sort_by(|a, b| a.1.rank_cmp(&b.1));
    entries
}

/// Keys of the `n` largest entries, largest first.
pub fn top_keys<V: RankValue>(map: &BTreeMap<String, V>, n: usize) -> Vec<String> {
    ranked(map).into_iter().take(n).map(|(k, _)| k).collect()
}

// ---------------------------------------------------------------------------
// Aggregates – everything the views need, computed once
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CtcRange {
    pub min: f64,
    pub max: f64,
}

impl CtcRange {
    /// Min/max compensation of `records`; `None` when there are none.
    pub fn of<'a>(records: impl IntoIterator<Item = &'a Record>) -> Option<CtcRange> {
        records.into_iter().fold(None, |range, r| {
            Some(match range {
                None => CtcRange { min: r.ctc, max: r.ctc },
                Some(CtcRange { min, max }) => CtcRange {
                    min: min.min(r.ctc),
                    max: max.max(r.ctc),
                },
            })
        })
    }
}

/// Grouped statistics over the working dataset.
#[derive(Debug, Clone)]
pub struct Aggregates {
    pub skill_mean: BTreeMap<String, f64>,
    pub location_mean: BTreeMap<String, f64>,
    pub skill_count: BTreeMap<String, u64>,
    pub location_count: BTreeMap<String, u64>,
    pub skill_companies: BTreeMap<String, u64>,
    pub location_companies: BTreeMap<String, u64>,
    /// skill × location mean compensation.
    pub skill_location_mean: Table<f64>,
    /// location × skill posting count.
    pub location_skill_count: Table<u64>,
    pub skill_values: BTreeMap<String, Vec<f64>>,
    pub location_values: BTreeMap<String, Vec<f64>>,
    pub ctc_range: Option<CtcRange>,
}

impl Aggregates {
    pub fn compute(dataset: &Dataset) -> Self {
        let records = dataset.records();
        Aggregates {
            skill_mean: group_mean(records, by_skill),
            location_mean: group_mean(records, by_location),
            skill_count: group_count(records, by_skill),
            location_count: group_count(records, by_location),
            skill_companies: distinct_count(records, by_skill, by_company),
            location_companies: distinct_count(records, by_location, by_company),
            skill_location_mean: pivot_mean(records, by_skill, by_location),
            location_skill_count: crosstab(records, by_location, by_skill),
            skill_values: group_values(records, by_skill),
            location_values: group_values(records, by_location),
            ctc_range: CtcRange::of(records),
        }
    }
}
