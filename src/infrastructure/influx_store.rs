// InfluxDB store implementation
//
// Writes and Flux queries go through the influxdb2 client; the management
// API (organizations, buckets, tasks) is called directly over HTTP with the
// configured token, since the client crate does not cover it.
use crate::application::store::{StoreError, TimeSeriesStore};
use crate::domain::reading::Reading;
use crate::domain::task::TaskSpec;
use async_trait::async_trait;
use chrono::Utc;
use futures::stream;
use influxdb2::models::{DataPoint, Query};
use serde::Deserialize;
use serde_json::json;

pub struct InfluxStore {
    client: influxdb2::Client,
    http: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct OrgList {
    orgs: Vec<OrgSummary>,
}

#[derive(Debug, Deserialize)]
struct OrgSummary {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct BucketList {
    buckets: Vec<BucketSummary>,
}

#[derive(Debug, Deserialize)]
struct BucketSummary {
    id: String,
    name: String,
}

impl InfluxStore {
    pub fn new(url: &str, org: &str, token: &str) -> Self {
        let base_url = url.trim_end_matches('/').to_string();
        Self {
            client: influxdb2::Client::new(&base_url, org, token),
            http: reqwest::Client::new(),
            base_url,
            token: token.to_string(),
        }
    }

    fn auth_header(&self) -> String {
        format!("Token {}", self.token)
    }

    /// Surface non-2xx management responses as tagged errors.
    async fn check(
        response: reqwest::Response,
        what: &str,
    ) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        Err(StoreError::from_status(
            status.as_u16(),
            format!("{what}: {text}"),
        ))
    }
}

fn map_request_error(err: influxdb2::RequestError) -> StoreError {
    match err {
        influxdb2::RequestError::Http { status, text } => {
            StoreError::from_status(status.as_u16(), text)
        }
        influxdb2::RequestError::ReqwestProcessing { source } => {
            StoreError::Transient(source.to_string())
        }
        other => StoreError::Unknown(other.to_string()),
    }
}

fn map_transport_error(err: reqwest::Error) -> StoreError {
    if err.is_connect() || err.is_timeout() {
        StoreError::Transient(err.to_string())
    } else {
        StoreError::Unknown(err.to_string())
    }
}

#[async_trait]
impl TimeSeriesStore for InfluxStore {
    async fn write_reading(&self, bucket: &str, reading: &Reading) -> Result<(), StoreError> {
        let timestamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let point = DataPoint::builder(reading.measurement.as_str())
            .tag("user_id", reading.user_id.as_str())
            .field("field1", reading.field1)
            .timestamp(timestamp)
            .build()
            .map_err(|e| StoreError::Unknown(e.to_string()))?;

        self.client
            .write(bucket, stream::iter(vec![point]))
            .await
            .map_err(map_request_error)
    }

    async fn query_rows(&self, flux: &str) -> Result<usize, StoreError> {
        let query = Query::new(flux.to_string());
        let records = self
            .client
            .query_raw(Some(query))
            .await
            .map_err(map_request_error)?;

        for record in &records {
            tracing::debug!(row = ?record, "query row");
        }
        Ok(records.len())
    }

    async fn create_task(&self, org_id: &str, task: &TaskSpec) -> Result<(), StoreError> {
        let response = self
            .http
            .post(format!("{}/api/v2/tasks", self.base_url))
            .header("Authorization", self.auth_header())
            .json(&json!({
                "flux": task.to_flux(),
                "orgID": org_id,
                "status": "active",
                "description": format!("recurring task {}", task.name),
            }))
            .send()
            .await
            .map_err(map_transport_error)?;

        Self::check(response, "task registration").await?;
        Ok(())
    }

    async fn find_org_id(&self, org_name: &str) -> Result<String, StoreError> {
        let response = self
            .http
            .get(format!("{}/api/v2/orgs", self.base_url))
            .query(&[("org", org_name)])
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let response = Self::check(response, "organization lookup").await?;
        let list: OrgList = response
            .json()
            .await
            .map_err(|e| StoreError::Unknown(e.to_string()))?;

        list.orgs
            .into_iter()
            .find(|org| org.name == org_name)
            .map(|org| org.id)
            .ok_or_else(|| StoreError::NotFound(format!("organization {org_name}")))
    }

    async fn find_bucket_id(&self, org_id: &str, name: &str) -> Result<Option<String>, StoreError> {
        let response = self
            .http
            .get(format!("{}/api/v2/buckets", self.base_url))
            .query(&[("orgID", org_id), ("name", name)])
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        // InfluxDB answers 404 when the name filter matches nothing.
        if response.status().as_u16() == 404 {
            return Ok(None);
        }

        let response = Self::check(response, "bucket lookup").await?;
        let list: BucketList = response
            .json()
            .await
            .map_err(|e| StoreError::Unknown(e.to_string()))?;

        Ok(list
            .buckets
            .into_iter()
            .find(|bucket| bucket.name == name)
            .map(|bucket| bucket.id))
    }

    async fn delete_bucket(&self, bucket_id: &str) -> Result<(), StoreError> {
        let response = self
            .http
            .delete(format!("{}/api/v2/buckets/{bucket_id}", self.base_url))
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(map_transport_error)?;

        Self::check(response, "bucket deletion").await?;
        Ok(())
    }

    async fn create_bucket(&self, org_id: &str, name: &str) -> Result<(), StoreError> {
        let response = self
            .http
            .post(format!("{}/api/v2/buckets", self.base_url))
            .header("Authorization", self.auth_header())
            .json(&json!({
                "orgID": org_id,
                "name": name,
                "retentionRules": [],
            }))
            .send()
            .await
            .map_err(map_transport_error)?;

        Self::check(response, "bucket creation").await?;
        Ok(())
    }
}
