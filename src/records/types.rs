//! Health record types

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single dated health measurement, as held by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    pub id: String,
    pub user_id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub value: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl HealthRecord {
    /// Calendar day of the record, accepting `YYYY-MM-DD` or RFC 3339
    pub fn day(&self) -> Option<NaiveDate> {
        parse_day(&self.date)
    }

    /// Apply a partial update in place
    pub fn apply(&mut self, update: &HealthRecordUpdate) {
        if let Some(date) = &update.date {
            self.date = date.clone();
        }
        if let Some(record_type) = &update.record_type {
            self.record_type = record_type.clone();
        }
        if let Some(value) = update.value {
            self.value = value;
        }
        if let Some(unit) = &update.unit {
            self.unit = unit.clone();
        }
        if let Some(notes) = &update.notes {
            self.notes = notes.clone();
        }
    }
}

pub(crate) fn parse_day(date: &str) -> Option<NaiveDate> {
    let date = date.trim();
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(date).ok().map(|dt| dt.date_naive()))
}

/// A record to be created; the backend assigns the id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHealthRecord {
    pub user_id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub value: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewHealthRecord {
    pub fn new(
        user_id: impl Into<String>,
        date: impl Into<String>,
        record_type: impl Into<String>,
        value: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            date: date.into(),
            record_type: record_type.into(),
            value,
            unit: unit.into(),
            notes: None,
        }
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub(crate) fn with_id(self, id: String) -> HealthRecord {
        HealthRecord {
            id,
            user_id: self.user_id,
            date: self.date,
            record_type: self.record_type,
            value: self.value,
            unit: self.unit,
            notes: self.notes,
        }
    }
}

/// Partial update; absent fields are left untouched.
///
/// `notes` distinguishes "leave as is" (`None`) from "clear" (`Some(None)`,
/// sent as `null`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecordUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<Option<String>>,
}

/// A field that is present maps to `Some`, even when it is `null`
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl HealthRecordUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
