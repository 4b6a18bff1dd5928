// Task service - Use cases for registering recurring tasks in InfluxDB
use crate::application::store::{StoreError, TimeSeriesStore};
use crate::domain::flux;
use crate::domain::task::TaskSpec;
use std::sync::Arc;

/// Summary of a task accepted by the database, echoed back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredTask {
    pub name: String,
    pub every: String,
}

#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TimeSeriesStore>,
    bucket: String,
    org_name: String,
    org_id: String,
}

impl TaskService {
    pub fn new(
        store: Arc<dyn TimeSeriesStore>,
        bucket: String,
        org_name: String,
        org_id: String,
    ) -> Self {
        Self {
            store,
            bucket,
            org_name,
            org_id,
        }
    }

    /// Register the 5-minute downsampling task for one user: max/min/mean
    /// windows over the user's points, written back as "downsampled".
    pub async fn register_downsample_task(
        &self,
        user_id: &str,
    ) -> Result<RegisteredTask, StoreError> {
        let task = TaskSpec::new(
            format!("{user_id}_downsample"),
            5,
            flux::downsample_pipeline(&self.bucket, user_id),
        );
        self.store.create_task(&self.org_id, &task).await?;
        tracing::info!(task = %task.name, every = %task.every(), "downsample task registered");
        Ok(RegisteredTask {
            name: task.name,
            every: "5m".to_string(),
        })
    }

    /// Reset the user's alert bucket, then register the 1-minute task that
    /// copies zero-valued points into it. Each step is awaited before the
    /// next starts, so the task never references a bucket that is still
    /// being recreated.
    pub async fn register_zero_alert_task(
        &self,
        user_id: &str,
    ) -> Result<RegisteredTask, StoreError> {
        let output_bucket = format!("{user_id}_alerts");

        let org_id = self.store.find_org_id(&self.org_name).await?;
        if let Some(bucket_id) = self.store.find_bucket_id(&org_id, &output_bucket).await? {
            self.store.delete_bucket(&bucket_id).await?;
            tracing::debug!(bucket = %output_bucket, "stale alert bucket deleted");
        }
        self.store.create_bucket(&org_id, &output_bucket).await?;

        let task = TaskSpec::new(
            format!("{user_id}_zero_alert"),
            1,
            flux::zero_value_alert_pipeline(&self.bucket, &output_bucket, user_id),
        );
        self.store.create_task(&org_id, &task).await?;
        tracing::info!(task = %task.name, bucket = %output_bucket, "alert task registered");
        Ok(RegisteredTask {
            name: task.name,
            every: "1m".to_string(),
        })
    }
}
