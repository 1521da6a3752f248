//! Backend-backed record store

use async_trait::async_trait;

use super::{HealthRecord, HealthRecordUpdate, NewHealthRecord, RecordStore};
use crate::client::{ApiClient, ClientResult, Payload};

const RECORDS_PATH: &str = "/health-records";

/// Health records served by the REST backend
#[derive(Clone)]
pub struct RemoteRecords {
    client: ApiClient,
}

impl RemoteRecords {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn record_path(id: &str) -> String {
        format!("{}/{}", RECORDS_PATH, urlencoding::encode(id))
    }
}

#[async_trait]
impl RecordStore for RemoteRecords {
    fn name(&self) -> &str {
        "remote"
    }

    async fn list(&self) -> ClientResult<Vec<HealthRecord>> {
        match self.client.get(RECORDS_PATH).await? {
            Payload::NoContent => Ok(Vec::new()),
            payload => payload.decode(),
        }
    }

    async fn create(&self, record: NewHealthRecord) -> ClientResult<HealthRecord> {
        let created: HealthRecord = self.client.post(RECORDS_PATH, &record).await?.decode()?;
        tracing::debug!(id = %created.id, "Created health record");
        Ok(created)
    }

    async fn update(&self, id: &str, update: HealthRecordUpdate) -> ClientResult<HealthRecord> {
        self.client
            .put(&Self::record_path(id), &update)
            .await?
            .decode()
    }

    async fn delete(&self, id: &str) -> ClientResult<()> {
        self.client.delete(&Self::record_path(id)).await?;
        tracing::debug!(id = %id, "Deleted health record");
        Ok(())
    }
}
