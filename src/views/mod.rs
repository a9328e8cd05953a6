//! Chart-ready view payloads and the route names they are served under.

pub mod builder;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::InsightsError;

// ---------------------------------------------------------------------------
// ViewId – the fixed set of views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ViewId {
    AvgCtcPerSkill,
    CompanyCountPerSkill,
    CompanyCountPerLocation,
    BoxplotCtcPerSkill,
    BoxplotCtcPerLocation,
    LineAvgCtcSkills,
    PieSkillDemand,
    PieLocationDistribution,
    AvgCtcPerLocation,
    ScatterCtcVsAvg,
    HeatmapSkillLocation,
    StackedSkillsLocation,
    BubbleCompanyCtc,
    BubbleAll,
    ScatterAll,
}

impl ViewId {
    pub const ALL: [ViewId; 15] = [
        ViewId::AvgCtcPerSkill,
        ViewId::CompanyCountPerSkill,
        ViewId::CompanyCountPerLocation,
        ViewId::BoxplotCtcPerSkill,
        ViewId::BoxplotCtcPerLocation,
        ViewId::LineAvgCtcSkills,
        ViewId::PieSkillDemand,
        ViewId::PieLocationDistribution,
        ViewId::AvgCtcPerLocation,
        ViewId::ScatterCtcVsAvg,
        ViewId::HeatmapSkillLocation,
        ViewId::StackedSkillsLocation,
        ViewId::BubbleCompanyCtc,
        ViewId::BubbleAll,
        ViewId::ScatterAll,
    ];

    /// Position in [`ViewId::ALL`], which lists variants in declaration order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stable route name, e.g. `7_pie_skill_demand`.
    pub fn route(self) -> &'static str {
        match self {
            ViewId::AvgCtcPerSkill => "1_avg_ctc_per_skill",
            ViewId::CompanyCountPerSkill => "2_company_count_per_skill",
            ViewId::CompanyCountPerLocation => "3_company_count_per_location",
            ViewId::BoxplotCtcPerSkill => "4_boxplot_ctc_per_skill",
            ViewId::BoxplotCtcPerLocation => "5_boxplot_ctc_per_location",
            ViewId::LineAvgCtcSkills => "6_line_avg_ctc_skills",
            ViewId::PieSkillDemand => "7_pie_skill_demand",
            ViewId::PieLocationDistribution => "8_pie_location_distribution",
            ViewId::AvgCtcPerLocation => "9_avg_ctc_per_location",
            ViewId::ScatterCtcVsAvg => "10_scatter_ctc_vs_avg",
            ViewId::HeatmapSkillLocation => "11_heatmap_skill_location",
            ViewId::StackedSkillsLocation => "12_stacked_skills_location",
            ViewId::BubbleCompanyCtc => "13_bubble_company_ctc",
            ViewId::BubbleAll => "bubble_all",
            ViewId::ScatterAll => "scatter_all",
        }
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route())
    }
}

impl FromStr for ViewId {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewId::ALL
            .into_iter()
            .find(|id| id.route() == s)
            .ok_or_else(|| InsightsError::UnknownView(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Payload shapes
// ---------------------------------------------------------------------------

/// `{"labels": [...], "values": [...]}` with an optional tooltip label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series<V> {
    pub labels: Vec<String>,
    pub values: Vec<V>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip_label: Option<String>,
}

impl<V> Series<V> {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, V)>) -> Self {
        let (labels, values) = pairs.into_iter().unzip();
        Series {
            labels,
            values,
            tooltip_label: None,
        }
    }

    pub fn with_tooltip(mut self, label: &str) -> Self {
        self.tooltip_label = Some(label.to_string());
        self
    }
}

/// Mean compensation for each (skill, location); rows are skills.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    pub skills: Vec<String>,
    pub locations: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
}

/// Posting counts for each (location, skill); rows are locations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackedBar {
    pub locations: Vec<String>,
    pub skills: Vec<String>,
    pub values: Vec<Vec<u64>>,
    pub tooltip_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub skill: String,
    pub ctc: f64,
    pub avg_ctc: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubblePoint {
    pub company_name: String,
    pub ctc: f64,
    pub skill_required: String,
    pub bubble_size: f64,
}

/// Any view's payload; serializes to the bare inner shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ViewPayload {
    Means(Series<f64>),
    Counts(Series<u64>),
    Distribution(BTreeMap<String, Vec<f64>>),
    Heatmap(Heatmap),
    StackedBar(StackedBar),
    Scatter(Vec<ScatterPoint>),
    Bubbles(Vec<BubblePoint>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_round_trip_through_from_str() {
        for id in ViewId::ALL {
            assert_eq!(id.route().parse::<ViewId>().unwrap(), id);
        }
    }

    #[test]
    fn index_matches_position_in_all() {
        for (i, id) in ViewId::ALL.into_iter().enumerate() {
            assert_eq!(id.index(), i, "{id}");
        }
    }

    #[test]
    fn unknown_route_is_not_found() {
        let err = "14_nothing_here".parse::<ViewId>().unwrap_err();
        assert!(matches!(err, InsightsError::UnknownView(r) if r == "14_nothing_here"));
    }

    #[test]
    fn series_omits_absent_tooltip() {
        let series = Series::from_pairs(vec![("Rust".to_string(), 3u64)]);
        let json = serde_json::to_string(&ViewPayload::Counts(series.clone())).unwrap();
        assert_eq!(json, r#"{"labels":["Rust"],"values":[3]}"#);

        let json = serde_json::to_string(&series.with_tooltip("Job Listings")).unwrap();
        assert_eq!(
            json,
            r#"{"labels":["Rust"],"values":[3],"tooltip_label":"Job Listings"}"#
        );
    }

    #[test]
    fn scatter_point_without_company_drops_the_field() {
        let point = ScatterPoint {
            company: None,
            skill: "Go".into(),
            ctc: 5.0,
            avg_ctc: 4.5,
        };
        assert_eq!(
            serde_json::to_string(&point).unwrap(),
            r#"{"skill":"Go","ctc":5.0,"avg_ctc":4.5}"#
        );
    }
}
