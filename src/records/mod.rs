//! Health Records
//!
//! CRUD facade over the user's health records.
//!
//! - [`RemoteRecords`]: the REST backend (`/health-records`)
//! - [`MockRecords`]: in-memory sample data for offline demos
//! - [`summarize`]: per-type statistics for the stats view

mod mock;
mod remote;
mod stats;
mod types;

pub use mock::MockRecords;
pub use remote::RemoteRecords;
pub use stats::{summarize, RecordSummary};
pub use types::{HealthRecord, HealthRecordUpdate, NewHealthRecord};

use async_trait::async_trait;

use crate::client::ClientResult;

/// Common trait for health record sources
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Human-readable name of the source
    fn name(&self) -> &str;

    /// All records visible to the current session
    async fn list(&self) -> ClientResult<Vec<HealthRecord>>;

    /// Create a record and return it with its assigned id
    async fn create(&self, record: NewHealthRecord) -> ClientResult<HealthRecord>;

    /// Apply a partial update and return the updated record
    async fn update(&self, id: &str, update: HealthRecordUpdate) -> ClientResult<HealthRecord>;

    /// Delete a record
    async fn delete(&self, id: &str) -> ClientResult<()>;
}
