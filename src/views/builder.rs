use std::collections::BTreeSet;

use super::{BubblePoint, Heatmap, ScatterPoint, Series, StackedBar, ViewId, ViewPayload};
use crate::data::aggregate::{
    by_location, by_skill, crosstab, ranked, ranked_ascending, top_keys, Aggregates, CtcRange,
};
use crate::data::filter::{filtered_records, top_by_ctc, RowFilter};
use crate::data::model::{Dataset, Record};

pub const TOP_SKILLS_BY_CTC: usize = 9;
/// Rank 1 is skipped; ranks 2..=15 are shown.
pub const SKILL_COMPANY_RANKS: std::ops::Range<usize> = 1..15;
pub const TOP_LOCATIONS_BY_COMPANIES: usize = 10;
/// Share of all postings a skill needs for its own pie slice.
pub const SKILL_SLICE_THRESHOLD: f64 = 0.02;
pub const PIE_LOCATIONS: usize = 8;
pub const TOP_ROWS: usize = 100;
pub const HEATMAP_LOCATIONS: usize = 10;
pub const HEATMAP_SKILLS: usize = 15;
pub const STACKED_SKILLS: usize = 10;
pub const STACKED_LOCATIONS: usize = 8;

pub const BUBBLE_MIN_SIZE: f64 = 50.0;
pub const BUBBLE_SIZE_SPAN: f64 = 500.0;

pub const OTHER_LABEL: &str = "Other";
pub const LISTINGS_TOOLTIP: &str = "Job Listings";

/// Build the payload for `id`.
pub fn build(id: ViewId, dataset: &Dataset, agg: &Aggregates) -> ViewPayload {
    match id {
        ViewId::AvgCtcPerSkill => ViewPayload::Means(avg_ctc_per_skill(agg)),
        ViewId::CompanyCountPerSkill => ViewPayload::Counts(company_count_per_skill(agg)),
        ViewId::CompanyCountPerLocation => ViewPayload::Counts(company_count_per_location(agg)),
        ViewId::BoxplotCtcPerSkill => ViewPayload::Distribution(agg.skill_values.clone()),
        ViewId::BoxplotCtcPerLocation => ViewPayload::Distribution(agg.location_values.clone()),
        ViewId::LineAvgCtcSkills => ViewPayload::Means(avg_ctc_skills_ascending(agg)),
        ViewId::PieSkillDemand => ViewPayload::Counts(pie_skill_demand(agg)),
        ViewId::PieLocationDistribution => ViewPayload::Counts(pie_location_distribution(agg)),
        ViewId::AvgCtcPerLocation => ViewPayload::Means(avg_ctc_per_location(agg)),
        ViewId::ScatterCtcVsAvg => ViewPayload::Scatter(scatter_top_ctc_vs_avg(dataset, agg)),
        ViewId::HeatmapSkillLocation => ViewPayload::Heatmap(heatmap_skill_location(agg)),
        ViewId::StackedSkillsLocation => {
            ViewPayload::StackedBar(stacked_skills_location(dataset, agg))
        }
        ViewId::BubbleCompanyCtc => ViewPayload::Bubbles(bubbles_top_ctc(dataset)),
        ViewId::BubbleAll => ViewPayload::Bubbles(bubbles_all(dataset, agg)),
        ViewId::ScatterAll => ViewPayload::Scatter(scatter_all(dataset, agg)),
    }
}

// ---------------------------------------------------------------------------
// Label/value views
// ---------------------------------------------------------------------------

/// Nine skills with the highest mean compensation.
pub fn avg_ctc_per_skill(agg: &Aggregates) -> Series<f64> {
    Series::from_pairs(ranked(&agg.skill_mean).into_iter().take(TOP_SKILLS_BY_CTC))
}

/// Skills by distinct hiring companies, without the single top skill.
pub fn company_count_per_skill(agg: &Aggregates) -> Series<u64> {
    let ranks = SKILL_COMPANY_RANKS;
    Series::from_pairs(
        ranked(&agg.skill_companies)
            .into_iter()
            .skip(ranks.start)
            .take(ranks.end - ranks.start),
    )
}

pub fn company_count_per_location(agg: &Aggregates) -> Series<u64> {
    Series::from_pairs(
        ranked(&agg.location_companies)
            .into_iter()
            .take(TOP_LOCATIONS_BY_COMPANIES),
    )
}

/// Every skill's mean compensation, lowest first.
pub fn avg_ctc_skills_ascending(agg: &Aggregates) -> Series<f64> {
    Series::from_pairs(ranked_ascending(&agg.skill_mean))
}

/// Skills at or above 2% of postings get a slice; the rest share "Other".
pub fn pie_skill_demand(agg: &Aggregates) -> Series<u64> {
    let total: u64 = agg.skill_count.values().sum();
    let threshold = SKILL_SLICE_THRESHOLD * total as f64;

    let mut slices = Vec::new();
    let mut other = 0u64;
    for (skill, count) in ranked(&agg.skill_count) {
        if count as f64 >= threshold {
            slices.push((skill, count));
        } else {
            other += count;
        }
    }
    if other > 0 {
        slices.push((OTHER_LABEL.to_string(), other));
    }
    Series::from_pairs(slices)
}

/// Eight busiest locations, the rest folded into "Other".
pub fn pie_location_distribution(agg: &Aggregates) -> Series<u64> {
    let mut slices = ranked(&agg.location_count);
    let other: u64 = slices
        .split_off(PIE_LOCATIONS.min(slices.len()))
        .iter()
        .map(|(_, count)| count)
        .sum();
    if other > 0 {
        slices.push((OTHER_LABEL.to_string(), other));
    }
    Series::from_pairs(slices).with_tooltip(LISTINGS_TOOLTIP)
}

pub fn avg_ctc_per_location(agg: &Aggregates) -> Series<f64> {
    Series::from_pairs(agg.location_mean.iter().map(|(k, v)| (k.clone(), *v)))
}

// ---------------------------------------------------------------------------
// Matrix views
// ---------------------------------------------------------------------------

/// Pivot rows for the 15 best-paid skills (pivot order) against the 10
/// busiest locations (busiest first).
pub fn heatmap_skill_location(agg: &Aggregates) -> Heatmap {
    let locations = top_keys(&agg.location_count, HEATMAP_LOCATIONS);
    let top_skills: BTreeSet<String> = top_keys(&agg.skill_mean, HEATMAP_SKILLS)
        .into_iter()
        .collect();
    let skills: Vec<String> = agg
        .skill_location_mean
        .rows
        .iter()
        .filter(|s| top_skills.contains(*s))
        .cloned()
        .collect();

    let table = agg.skill_location_mean.select(&skills, &locations);
    Heatmap {
        skills: table.rows,
        locations: table.columns,
        matrix: table.cells,
    }
}

/// Location × skill counts over only the rows whose skill is among the 10
/// most posted and whose location is among the 8 busiest.
pub fn stacked_skills_location(dataset: &Dataset, agg: &Aggregates) -> StackedBar {
    let filter = RowFilter::new(
        &top_keys(&agg.skill_count, STACKED_SKILLS),
        &top_keys(&agg.location_count, STACKED_LOCATIONS),
    );
    let table = crosstab(
        filtered_records(dataset, &filter),
        by_location,
        by_skill,
    );
    StackedBar {
        locations: table.rows,
        skills: table.columns,
        values: table.cells,
        tooltip_label: LISTINGS_TOOLTIP.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Row views
// ---------------------------------------------------------------------------

/// The 100 best-paid postings against their skill's mean.
pub fn scatter_top_ctc_vs_avg(dataset: &Dataset, agg: &Aggregates) -> Vec<ScatterPoint> {
    top_by_ctc(dataset, TOP_ROWS)
        .into_iter()
        .filter_map(|r| {
            let avg_ctc = *agg.skill_mean.get(&r.skill_required)?;
            Some(ScatterPoint {
                company: Some(r.company_name.clone()),
                skill: r.skill_required.clone(),
                ctc: r.ctc,
                avg_ctc,
            })
        })
        .collect()
}

pub fn scatter_all(dataset: &Dataset, agg: &Aggregates) -> Vec<ScatterPoint> {
    dataset
        .records()
        .iter()
        .filter_map(|r| {
            let avg_ctc = *agg.skill_mean.get(&r.skill_required)?;
            Some(ScatterPoint {
                company: None,
                skill: r.skill_required.clone(),
                ctc: r.ctc,
                avg_ctc,
            })
        })
        .collect()
}

/// `50 + 500 * (ctc - min) / (max - min)`, or 50 when the range is empty.
pub fn bubble_size(ctc: f64, range: CtcRange) -> f64 {
    let span = range.max - range.min;
    if span > 0.0 {
        BUBBLE_MIN_SIZE + (ctc - range.min) / span * BUBBLE_SIZE_SPAN
    } else {
        BUBBLE_MIN_SIZE
    }
}

fn bubbles<'a>(records: impl IntoIterator<Item = &'a Record>, range: CtcRange) -> Vec<BubblePoint> {
    records
        .into_iter()
        .map(|r| BubblePoint {
            company_name: r.company_name.clone(),
            ctc: r.ctc,
            skill_required: r.skill_required.clone(),
            bubble_size: bubble_size(r.ctc, range),
        })
        .collect()
}

/// Every posting, sized against the whole dataset's compensation range.
pub fn bubbles_all(dataset: &Dataset, agg: &Aggregates) -> Vec<BubblePoint> {
    match agg.ctc_range {
        Some(range) => bubbles(dataset.records(), range),
        None => Vec::new(),
    }
}

/// The 100 best-paid postings, sized against their own range.
pub fn bubbles_top_ctc(dataset: &Dataset) -> Vec<BubblePoint> {
    let top = top_by_ctc(dataset, TOP_ROWS);
    match CtcRange::of(top.iter().copied()) {
        Some(range) => bubbles(top, range),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(company: &str, skill: &str, location: &str, ctc: f64) -> Record {
        Record {
            company_name: company.into(),
            skill_required: skill.into(),
            location: location.into(),
            ctc,
        }
    }

    /// `n` postings for `skill` at `location`, one company per posting.
    fn postings(skill: &str, location: &str, n: usize, ctc: f64) -> Vec<Record> {
        (0..n)
            .map(|i| rec(&format!("{skill}-co-{i}"), skill, location, ctc))
            .collect()
    }

    fn build_all(records: Vec<Record>) -> (Dataset, Aggregates) {
        let dataset = Dataset::from_records(records);
        let agg = Aggregates::compute(&dataset);
        (dataset, agg)
    }

    #[test]
    fn avg_ctc_per_skill_takes_nine_highest() {
        let records = (0..12)
            .map(|i| rec("Acme", &format!("skill{i:02}"), "Pune", 1000.0 * i as f64))
            .collect();
        let (_, agg) = build_all(records);
        let series = avg_ctc_per_skill(&agg);
        assert_eq!(series.labels.len(), 9);
        assert_eq!(series.labels[0], "skill11");
        assert_eq!(series.values[8], 3000.0);
        assert!(series.values.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn avg_ctc_ties_keep_grouping_order() {
        let (_, agg) = build_all(vec![
            rec("A", "Zig", "Pune", 10.0),
            rec("B", "Ada", "Pune", 10.0),
            rec("C", "Go", "Pune", 20.0),
        ]);
        assert_eq!(avg_ctc_per_skill(&agg).labels, vec!["Go", "Ada", "Zig"]);
    }

    #[test]
    fn company_count_per_skill_drops_the_leader() {
        let mut records = Vec::new();
        for i in 0..20 {
            records.extend(postings(&format!("skill{i:02}"), "Pune", i + 1, 100.0));
        }
        let (_, agg) = build_all(records);
        let series = company_count_per_skill(&agg);

        assert_eq!(series.labels.len(), 14);
        assert!(!series.labels.contains(&"skill19".to_string()));
        assert_eq!(series.labels[0], "skill18");
        assert_eq!(series.values[0], 19);
        assert_eq!(series.labels[13], "skill05");
    }

    #[test]
    fn company_count_per_skill_with_one_skill_is_empty() {
        let (_, agg) = build_all(postings("Rust", "Pune", 3, 100.0));
        assert!(company_count_per_skill(&agg).labels.is_empty());
    }

    #[test]
    fn company_count_per_location_counts_distinct_companies() {
        let (_, agg) = build_all(vec![
            rec("A", "Rust", "Pune", 1.0),
            rec("A", "Go", "Pune", 1.0),
            rec("B", "Go", "Delhi", 1.0),
            rec("C", "Go", "Delhi", 1.0),
        ]);
        let series = company_count_per_location(&agg);
        assert_eq!(series.labels, vec!["Delhi", "Pune"]);
        assert_eq!(series.values, vec![2, 1]);
    }

    #[test]
    fn ascending_line_has_every_skill() {
        let (_, agg) = build_all(vec![
            rec("A", "Rust", "Pune", 30.0),
            rec("B", "Go", "Pune", 10.0),
            rec("C", "Ada", "Pune", 20.0),
        ]);
        let series = avg_ctc_skills_ascending(&agg);
        assert_eq!(series.labels, vec!["Go", "Ada", "Rust"]);
        assert_eq!(series.values, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn skill_pie_folds_small_skills_into_other() {
        let mut records = postings("Rust", "Pune", 60, 1.0);
        records.extend(postings("Go", "Pune", 39, 1.0));
        records.extend(postings("Zig", "Pune", 1, 1.0));
        let (_, agg) = build_all(records);

        let pie = pie_skill_demand(&agg);
        assert_eq!(pie.labels, vec!["Rust", "Go", "Other"]);
        assert_eq!(pie.values, vec![60, 39, 1]);
        let total: u64 = pie.values.iter().sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn skill_pie_threshold_is_inclusive() {
        let mut records = postings("Rust", "Pune", 98, 1.0);
        records.extend(postings("Go", "Pune", 2, 1.0));
        let (_, agg) = build_all(records);

        let pie = pie_skill_demand(&agg);
        assert_eq!(pie.labels, vec!["Rust", "Go"]);
        assert!(!pie.labels.contains(&OTHER_LABEL.to_string()));
    }

    #[test]
    fn location_pie_keeps_eight_and_sums_the_rest() {
        let mut records = Vec::new();
        for i in 0..10 {
            records.extend(postings("Rust", &format!("city{i}"), 20 - i, 1.0));
        }
        let (_, agg) = build_all(records);

        let pie = pie_location_distribution(&agg);
        assert_eq!(pie.labels.len(), 9);
        assert_eq!(pie.labels[0], "city0");
        assert_eq!(pie.labels[8], OTHER_LABEL);
        assert_eq!(pie.values[8], 12 + 11);
        assert_eq!(pie.tooltip_label.as_deref(), Some(LISTINGS_TOOLTIP));
    }

    #[test]
    fn location_pie_without_remainder_has_no_other() {
        let (_, agg) = build_all(postings("Rust", "Pune", 3, 1.0));
        let pie = pie_location_distribution(&agg);
        assert_eq!(pie.labels, vec!["Pune"]);
    }

    #[test]
    fn heatmap_restricts_and_zero_fills() {
        let mut records = Vec::new();
        for s in 0..20 {
            // Skill sNN earns NN * 1000 in the city matching its parity.
            let city = if s % 2 == 0 { "Even" } else { "Odd" };
            records.push(rec("A", &format!("s{s:02}"), city, 1000.0 * s as f64));
        }
        for i in 0..12 {
            records.extend(postings("s00", &format!("far{i:02}"), 1, 1.0));
        }
        let (_, agg) = build_all(records);

        let heatmap = heatmap_skill_location(&agg);
        assert_eq!(heatmap.locations.len(), 10);
        assert_eq!(heatmap.locations[0], "Even");
        assert_eq!(heatmap.locations[1], "Odd");
        assert_eq!(heatmap.skills.len(), 15);
        assert_eq!(heatmap.skills[0], "s05");
        assert_eq!(heatmap.matrix.len(), 15);
        assert!(heatmap.matrix.iter().all(|row| row.len() == 10));
        // s05 only posts in "Odd".
        assert_eq!(heatmap.matrix[0][0], 0.0);
        assert_eq!(heatmap.matrix[0][1], 5000.0);
    }

    #[test]
    fn stacked_bar_recounts_only_matching_rows() {
        let mut records = Vec::new();
        for i in 0..10 {
            records.extend(postings(&format!("skill{i:02}"), "Pune", 30 - i, 1.0));
        }
        for i in 0..8 {
            records.extend(postings("skill00", &format!("city{i}"), 10 - i, 1.0));
        }
        // Eleventh skill, posted once in a top location.
        records.push(rec("Solo", "skill10", "city0", 1.0));
        let (dataset, agg) = build_all(records);

        // The full cross-tab still sees the excluded skill and location.
        assert_eq!(agg.location_skill_count.get("city0", "skill10"), Some(1));
        assert_eq!(agg.location_skill_count.get("city7", "skill00"), Some(3));

        let bar = stacked_skills_location(&dataset, &agg);
        assert_eq!(bar.tooltip_label, LISTINGS_TOOLTIP);
        assert_eq!(bar.locations.len(), 8);
        assert_eq!(bar.locations[0], "Pune");
        assert!(!bar.locations.contains(&"city7".to_string()));
        assert_eq!(bar.skills.len(), 10);
        assert!(!bar.skills.contains(&"skill10".to_string()));

        let pune: Vec<u64> = (0..10).map(|i| 30 - i).collect();
        assert_eq!(bar.values[0], pune);
        assert_eq!(bar.values[1][0], 10);
        assert!(bar.values[1][1..].iter().all(|&v| v == 0));
    }

    #[test]
    fn scatter_uses_top_rows_and_skill_means() {
        let mut records = postings("Rust", "Pune", 150, 100.0);
        records.push(rec("Top", "Go", "Pune", 900.0));
        records.push(rec("Low", "Go", "Pune", 100.0));
        let (dataset, agg) = build_all(records);

        let points = scatter_top_ctc_vs_avg(&dataset, &agg);
        assert_eq!(points.len(), 100);
        assert_eq!(points[0].company.as_deref(), Some("Top"));
        assert_eq!(points[0].avg_ctc, 500.0);
        assert_eq!(points[1].company.as_deref(), Some("Rust-co-0"));

        let all = scatter_all(&dataset, &agg);
        assert_eq!(all.len(), dataset.len());
        assert!(all.iter().all(|p| p.company.is_none()));
    }

    #[test]
    fn bubble_size_spans_fifty_to_five_fifty() {
        let range = CtcRange { min: 100.0, max: 300.0 };
        assert_eq!(bubble_size(100.0, range), 50.0);
        assert_eq!(bubble_size(200.0, range), 300.0);
        assert_eq!(bubble_size(300.0, range), 550.0);
    }

    #[test]
    fn equal_compensation_gives_uniform_minimum_size() {
        let (dataset, agg) = build_all(postings("Rust", "Pune", 5, 42.0));
        let sizes: Vec<f64> = bubbles_all(&dataset, &agg)
            .iter()
            .map(|b| b.bubble_size)
            .collect();
        assert_eq!(sizes, vec![BUBBLE_MIN_SIZE; 5]);
        assert!(bubbles_top_ctc(&dataset).iter().all(|b| b.bubble_size == 50.0));
    }

    #[test]
    fn top_bubbles_normalize_over_their_own_range() {
        let mut records: Vec<Record> = (0..120)
            .map(|i| rec(&format!("co{i}"), "Rust", "Pune", 1000.0 + i as f64))
            .collect();
        records.push(rec("floor", "Go", "Pune", 0.0));
        let (dataset, agg) = build_all(records);

        let global = bubbles_all(&dataset, &agg);
        let top = bubbles_top_ctc(&dataset);
        assert_eq!(top.len(), 100);
        // Highest row maxes out in both views.
        assert_eq!(top[0].bubble_size, 550.0);
        // The 100th row is the floor of the top view, but not of the global one.
        assert_eq!(top[99].ctc, 1020.0);
        assert_eq!(top[99].bubble_size, 50.0);
        let same_row = global.iter().find(|b| b.ctc == 1020.0).map(|b| b.bubble_size);
        assert!(same_row.is_some_and(|s| s > 500.0));

        for view in [&global, &top] {
            assert!(view.iter().all(|b| (50.0..=550.0).contains(&b.bubble_size)));
            let mut by_ctc: Vec<&BubblePoint> = view.iter().collect();
            by_ctc.sort_by(|a, b| a.ctc.total_cmp(&b.ctc));
            assert!(by_ctc.windows(2).all(|w| w[0].bubble_size <= w[1].bubble_size));
        }
    }

    #[test]
    fn empty_dataset_builds_empty_views() {
        let (dataset, agg) = build_all(Vec::new());
        for id in ViewId::ALL {
            let payload = build(id, &dataset, &agg);
            let json = serde_json::to_value(&payload).unwrap();
            assert!(!json.is_null(), "{id} serialized to null");
        }
        assert!(bubbles_all(&dataset, &agg).is_empty());
        assert!(pie_skill_demand(&agg).labels.is_empty());
    }
}
