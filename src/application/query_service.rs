// Query service - Use case for reading back downsampled aggregates
use crate::application::store::{StoreError, TimeSeriesStore};
use crate::domain::flux;
use std::sync::Arc;

#[derive(Clone)]
pub struct QueryService {
    store: Arc<dyn TimeSeriesStore>,
    bucket: String,
}

impl QueryService {
    pub fn new(store: Arc<dyn TimeSeriesStore>, bucket: String) -> Self {
        Self { store, bucket }
    }

    /// Fetch the last downsampled row per series for a user over the past
    /// 24 hours. Rows are logged by the store; only the count comes back.
    pub async fn latest_downsampled(&self, user_id: &str) -> Result<usize, StoreError> {
        let query = flux::last_downsampled(&self.bucket, user_id);
        tracing::debug!(%user_id, "running downsample query");
        let rows = self.store.query_rows(&query).await?;
        tracing::info!(%user_id, rows, "downsample query finished");
        Ok(rows)
    }
}
