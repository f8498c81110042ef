use crate::models::Dataset;
use crate::stats::DowntimePolicy;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub downtime_policy: DowntimePolicy,
}

impl AppState {
    pub fn new(dataset: Dataset, downtime_policy: DowntimePolicy) -> Self {
        Self {
            dataset: Arc::new(dataset),
            downtime_policy,
        }
    }
}
