use std::path::Path;

use anyhow::Result;

use crate::config::Config;
use crate::data::aggregate::Aggregates;
use crate::data::loader::load_dataset;
use crate::data::model::Dataset;
use crate::error::InsightsError;
use crate::views::builder;
use crate::views::{ViewId, ViewPayload};

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// Everything the query layer serves, built once and never mutated.
///
/// Share it behind an `Arc` across request handlers; there is no interior
/// mutability, so no locking is needed.
#[derive(Debug, Clone)]
pub struct DashboardState {
    dataset: Dataset,
    aggregates: Aggregates,
    /// Indexed by [`ViewId::index`].
    views: [ViewPayload; ViewId::ALL.len()],
}

impl DashboardState {
    /// Compute aggregates and every view over `dataset`.
    pub fn from_dataset(dataset: Dataset) -> Self {
        let aggregates = Aggregates::compute(&dataset);
        let views = ViewId::ALL.map(|id| builder::build(id, &dataset, &aggregates));

        log::debug!(
            "Built {} views over {} skills and {} locations",
            ViewId::ALL.len(),
            aggregates.skill_count.len(),
            aggregates.location_count.len()
        );

        DashboardState {
            dataset,
            aggregates,
            views,
        }
    }

    /// Load the dataset at `path` and build the state.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::from_dataset(load_dataset(path)?))
    }

    /// Locate the dataset per `config`, then load it.
    pub fn from_config(config: &Config) -> Result<Self> {
        let path = config.locate_dataset()?;
        Self::load(&path)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn aggregates(&self) -> &Aggregates {
        &self.aggregates
    }

    pub fn view(&self, id: ViewId) -> &ViewPayload {
        &self.views[id.index()]
    }

    /// Payload for a route name such as `7_pie_skill_demand`.
    pub fn view_by_route(&self, route: &str) -> Result<&ViewPayload, InsightsError> {
        Ok(self.view(route.parse()?))
    }

    /// Compact JSON for a route, as an HTTP handler would return it.
    pub fn view_json(&self, route: &str) -> Result<String> {
        let payload = self.view_by_route(route)?;
        Ok(serde_json::to_string(payload)?)
    }

    /// Every view in route order.
    pub fn views(&self) -> impl Iterator<Item = (ViewId, &ViewPayload)> {
        ViewId::ALL.into_iter().zip(self.views.iter())
    }
}
