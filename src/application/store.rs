// Store trait for time-series access, with a tagged error type handlers can
// match exhaustively instead of fishing status codes out of opaque errors.
use crate::domain::reading::Reading;
use crate::domain::task::TaskSpec;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("unauthorized: the configured token was rejected")]
    Unauthorized,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("transient upstream failure: {0}")]
    Transient(String),

    #[error("unexpected store failure: {0}")]
    Unknown(String),
}

impl StoreError {
    /// Classify an upstream HTTP status into an error kind.
    pub fn from_status(status: u16, detail: impl Into<String>) -> Self {
        match status {
            401 | 403 => StoreError::Unauthorized,
            404 => StoreError::NotFound(detail.into()),
            429 => StoreError::Transient(detail.into()),
            s if s >= 500 => StoreError::Transient(detail.into()),
            _ => StoreError::Unknown(detail.into()),
        }
    }
}

#[async_trait]
pub trait TimeSeriesStore: Send + Sync {
    /// Write one reading into a bucket, timestamped at the time of the call.
    async fn write_reading(&self, bucket: &str, reading: &Reading) -> Result<(), StoreError>;

    /// Execute a Flux query, logging each row; returns the row count.
    async fn query_rows(&self, flux: &str) -> Result<usize, StoreError>;

    /// Register a recurring task under an organization.
    async fn create_task(&self, org_id: &str, task: &TaskSpec) -> Result<(), StoreError>;

    /// Resolve an organization id from its name.
    async fn find_org_id(&self, org_name: &str) -> Result<String, StoreError>;

    /// Look up a bucket id by name within an organization, if it exists.
    async fn find_bucket_id(&self, org_id: &str, name: &str) -> Result<Option<String>, StoreError>;

    async fn delete_bucket(&self, bucket_id: &str) -> Result<(), StoreError>;

    async fn create_bucket(&self, org_id: &str, name: &str) -> Result<(), StoreError>;
}

/// A recording fake for service and handler tests.
#[cfg(test)]
pub mod test_support {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    pub enum StoreCall {
        WriteReading {
            bucket: String,
            reading: Reading,
        },
        QueryRows {
            flux: String,
        },
        CreateTask {
            org_id: String,
            name: String,
            every: String,
            flux: String,
        },
        FindOrgId {
            org_name: String,
        },
        FindBucketId {
            org_id: String,
            name: String,
        },
        DeleteBucket {
            bucket_id: String,
        },
        CreateBucket {
            org_id: String,
            name: String,
        },
    }

    /// Records every store call in order. Optionally fails every call with a
    /// fixed error, reports a pre-existing bucket, or returns canned rows.
    #[derive(Default)]
    pub struct RecordingStore {
        calls: Mutex<Vec<StoreCall>>,
        fail_with: Option<StoreError>,
        pub existing_bucket_id: Option<String>,
        pub rows: usize,
    }

    impl RecordingStore {
        pub fn failing(err: StoreError) -> Self {
            Self {
                fail_with: Some(err),
                ..Default::default()
            }
        }

        pub fn with_existing_bucket(id: &str) -> Self {
            Self {
                existing_bucket_id: Some(id.to_string()),
                ..Default::default()
            }
        }

        pub fn with_rows(rows: usize) -> Self {
            Self {
                rows,
                ..Default::default()
            }
        }

        pub fn calls(&self) -> Vec<StoreCall> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: StoreCall) -> Result<(), StoreError> {
            self.calls.lock().unwrap().push(call);
            match &self.fail_with {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl TimeSeriesStore for RecordingStore {
        async fn write_reading(&self, bucket: &str, reading: &Reading) -> Result<(), StoreError> {
            self.record(StoreCall::WriteReading {
                bucket: bucket.to_string(),
                reading: reading.clone(),
            })
        }

        async fn query_rows(&self, flux: &str) -> Result<usize, StoreError> {
            self.record(StoreCall::QueryRows {
                flux: flux.to_string(),
            })?;
            Ok(self.rows)
        }

        async fn create_task(&self, org_id: &str, task: &TaskSpec) -> Result<(), StoreError> {
            self.record(StoreCall::CreateTask {
                org_id: org_id.to_string(),
                name: task.name.clone(),
                every: task.every(),
                flux: task.to_flux(),
            })
        }

        async fn find_org_id(&self, org_name: &str) -> Result<String, StoreError> {
            self.record(StoreCall::FindOrgId {
                org_name: org_name.to_string(),
            })?;
            Ok("org-123".to_string())
        }

        async fn find_bucket_id(
            &self,
            org_id: &str,
            name: &str,
        ) -> Result<Option<String>, StoreError> {
            self.record(StoreCall::FindBucketId {
                org_id: org_id.to_string(),
                name: name.to_string(),
            })?;
            Ok(self.existing_bucket_id.clone())
        }

        async fn delete_bucket(&self, bucket_id: &str) -> Result<(), StoreError> {
            self.record(StoreCall::DeleteBucket {
                bucket_id: bucket_id.to_string(),
            })
        }

        async fn create_bucket(&self, org_id: &str, name: &str) -> Result<(), StoreError> {
            self.record(StoreCall::CreateBucket {
                org_id: org_id.to_string(),
                name: name.to_string(),
            })
        }
    }
}
