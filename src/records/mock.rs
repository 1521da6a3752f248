//! In-memory record store with sample data
//!
//! Used when `api.mock_data` is enabled. Changes live only as long as the
//! process.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use tokio::sync::RwLock;

use super::{HealthRecord, HealthRecordUpdate, NewHealthRecord, RecordStore};
use crate::client::{ClientError, ClientResult};

/// Sample series: type, unit, base value, daily swing
const SAMPLE_SERIES: &[(&str, &str, f64, f64)] = &[
    ("weight", "kg", 72.0, 0.4),
    ("heart_rate", "bpm", 64.0, 6.0),
    ("steps", "count", 8000.0, 2500.0),
    ("sleep", "hours", 7.0, 1.0),
];

/// Health records held in memory
pub struct MockRecords {
    records: RwLock<Vec<HealthRecord>>,
}

impl MockRecords {
    /// An empty store
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// A store pre-filled with a week of sample measurements for `user_id`
    pub fn seeded(user_id: &str) -> Self {
        Self::seeded_from(user_id, Utc::now().date_naive(), 7)
    }

    fn seeded_from(user_id: &str, today: NaiveDate, days: i64) -> Self {
        let mut records = Vec::new();

        for day in 0..days {
            let date = today - Duration::days(day);
            // Deterministic wobble so the sample stats are not flat
            let phase = ((day as f64) * std::f64::consts::PI / 3.0).sin();

            for (record_type, unit, base, swing) in SAMPLE_SERIES {
                let value = ((base + swing * phase) * 10.0).round() / 10.0;
                records.push(HealthRecord {
                    id: uuid::Uuid::new_v4().to_string(),
                    user_id: user_id.to_string(),
                    date: date.format("%Y-%m-%d").to_string(),
                    record_type: record_type.to_string(),
                    value,
                    unit: unit.to_string(),
                    notes: None,
                });
            }
        }

        Self {
            records: RwLock::new(records),
        }
    }

    fn not_found(id: &str) -> ClientError {
        ClientError::RequestFailed {
            status: 404,
            message: format!("Health record {} not found", id),
        }
    }
}

impl Default for MockRecords {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MockRecords {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list(&self) -> ClientResult<Vec<HealthRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn create(&self, record: NewHealthRecord) -> ClientResult<HealthRecord> {
        let record = record.with_id(uuid::Uuid::new_v4().to_string());
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &str, update: HealthRecordUpdate) -> ClientResult<HealthRecord> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Self::not_found(id))?;

        record.apply(&update);
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> ClientResult<()> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id != id);

        if records.len() == before {
            Err(Self::not_found(id))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_sample_data() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let store = MockRecords::seeded_from("1", today, 7);

        let records = store.list().await.unwrap();
        assert_eq!(records.len(), 7 * SAMPLE_SERIES.len());
        assert!(records.iter().all(|r| r.user_id == "1"));
        assert_eq!(records[0].date, "2024-03-07");
        assert_eq!(records.last().unwrap().date, "2024-03-01");

        let steps: Vec<_> = records.iter().filter(|r| r.record_type == "steps").collect();
        assert_eq!(steps.len(), 7);
        assert!(steps.iter().all(|r| r.unit == "count" && r.value > 0.0));
    }

    #[tokio::test]
    async fn test_crud_cycle() {
        let store = MockRecords::new();
        assert_eq!(store.name(), "mock");

        let created = store
            .create(NewHealthRecord::new("1", "2024-03-01", "weight", 70.0, "kg"))
            .await
            .unwrap();
        assert!(!created.id.is_empty());

        let updated = store
            .update(
                &created.id,
                HealthRecordUpdate {
                    value: Some(69.5),
                    notes: Some(Some("morning".to_string())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.value, 69.5);
        assert_eq!(updated.notes.as_deref(), Some("morning"));
        assert_eq!(store.list().await.unwrap(), vec![updated]);

        store.delete(&created.id).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let store = MockRecords::new();

        let err = store
            .update("missing", HealthRecordUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));

        let err = store.delete("missing").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }
}
