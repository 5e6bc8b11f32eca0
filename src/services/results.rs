use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    api::{ApiError, PortalApi},
    models::area::AreaCount,
};

pub const LOAD_FAILURE_REASON: &str =
    "Statistics could not be loaded. Check that the backend is running.";
pub const DATASET_LABEL: &str = "Number of people";

/// Index-aligned bar chart input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartDataset {
    pub label: String,
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

/// Everything derived from one successful load
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsSnapshot {
    pub counts: Vec<AreaCount>,
    pub total: u64,
    pub chart: ChartDataset,
}

impl ResultsSnapshot {
    /// Keeps the order the service sent, which is also the chart's category order
    pub fn from_counts(counts: Vec<AreaCount>) -> Self {
        let total = counts
            .iter()
            .fold(0u64, |acc, count| acc.saturating_add(count.person_count));
        let chart = ChartDataset {
            label: DATASET_LABEL.to_string(),
            labels: counts.iter().map(|count| count.name.clone()).collect(),
            values: counts.iter().map(|count| count.person_count).collect(),
        };

        Self {
            counts,
            total,
            chart,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum LoadStatus {
    #[default]
    NotLoaded,
    Loading,
    Loaded,
    LoadFailed(String),
}

#[derive(Debug, Default, Serialize)]
pub struct ResultsAggregator {
    status: LoadStatus,
    snapshot: Option<ResultsSnapshot>,
}

impl ResultsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Last successfully loaded data, kept across later failures
    pub fn snapshot(&self) -> Option<&ResultsSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            LoadStatus::LoadFailed(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn begin_load(&mut self) {
        self.status = LoadStatus::Loading;
    }

    /// Replaces the derived state in one assignment, or records the failure
    pub fn apply(&mut self, result: Result<Vec<AreaCount>, ApiError>) {
        match result {
            Ok(counts) => {
                let snapshot = ResultsSnapshot::from_counts(counts);
                debug!(
                    areas = snapshot.counts.len(),
                    total = snapshot.total,
                    "area counts loaded"
                );
                self.snapshot = Some(snapshot);
                self.status = LoadStatus::Loaded;
            }
            Err(error) => {
                warn!(%error, "area counts could not be loaded");
                self.status = LoadStatus::LoadFailed(LOAD_FAILURE_REASON.to_string());
            }
        }
    }

    pub async fn load(&mut self, api: &impl PortalApi) -> &LoadStatus {
        self.begin_load();
        let result = api.area_counts().await;
        self.apply(result);
        &self.status
    }

    /// Manual retry; clears the previous error by re-entering `Loading`
    pub async fn reload(&mut self, api: &impl PortalApi) -> &LoadStatus {
        debug!("reloading area counts");
        self.load(api).await
    }
}
