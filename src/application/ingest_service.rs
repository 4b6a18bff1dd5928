// Ingest service - Use case for writing one reading into the source bucket
use crate::application::store::{StoreError, TimeSeriesStore};
use crate::domain::reading::Reading;
use std::sync::Arc;

#[derive(Clone)]
pub struct IngestService {
    store: Arc<dyn TimeSeriesStore>,
    bucket: String,
}

impl IngestService {
    pub fn new(store: Arc<dyn TimeSeriesStore>, bucket: String) -> Self {
        Self { store, bucket }
    }

    pub async fn ingest(&self, reading: Reading) -> Result<(), StoreError> {
        self.store.write_reading(&self.bucket, &reading).await?;
        tracing::debug!(
            user_id = %reading.user_id,
            measurement = %reading.measurement,
            "reading written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::store::test_support::{RecordingStore, StoreCall};

    #[tokio::test]
    async fn writes_exactly_one_reading_into_configured_bucket() {
        let store = Arc::new(RecordingStore::default());
        let service = IngestService::new(store.clone(), "telemetry".into());

        let reading = Reading::new("alice".into(), "temperature".into(), 21.5).unwrap();
        service.ingest(reading.clone()).await.unwrap();

        let calls = store.calls();
        assert_eq!(
            calls,
            vec![StoreCall::WriteReading {
                bucket: "telemetry".into(),
                reading,
            }]
        );
    }

    #[tokio::test]
    async fn propagates_store_errors() {
        let store = Arc::new(RecordingStore::failing(StoreError::Unauthorized));
        let service = IngestService::new(store, "telemetry".into());

        let reading = Reading::new("alice".into(), "temperature".into(), 1.0).unwrap();
        let err = service.ingest(reading).await.unwrap_err();
        assert!(matches!(err, StoreError::Unauthorized));
    }
}
