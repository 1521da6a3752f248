//! Per-type record statistics

use std::collections::BTreeMap;

use super::HealthRecord;

/// Summary of all records sharing a type
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSummary {
    pub record_type: String,
    pub unit: String,
    pub count: usize,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    /// Value of the most recent record by date
    pub latest: f64,
    pub latest_date: String,
}

/// Group records by type, ordered by type name
pub fn summarize(records: &[HealthRecord]) -> Vec<RecordSummary> {
    let mut groups: BTreeMap<&str, Vec<&HealthRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.record_type.as_str()).or_default().push(record);
    }

    groups
        .into_iter()
        .map(|(record_type, group)| {
            let sum: f64 = group.iter().map(|r| r.value).sum();
            let min = group.iter().map(|r| r.value).fold(f64::INFINITY, f64::min);
            let max = group
                .iter()
                .map(|r| r.value)
                .fold(f64::NEG_INFINITY, f64::max);

            // Unparseable dates sort before every real one
            let latest = group
                .iter()
                .max_by_key(|r| r.day())
                .copied()
                .unwrap_or(group[0]);

            RecordSummary {
                record_type: record_type.to_string(),
                unit: latest.unit.clone(),
                count: group.len(),
                average: sum / group.len() as f64,
                min,
                max,
                latest: latest.value,
                latest_date: latest.date.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(record_type: &str, date: &str, value: f64) -> HealthRecord {
        HealthRecord {
            id: format!("{}-{}", record_type, date),
            user_id: "1".to_string(),
            date: date.to_string(),
            record_type: record_type.to_string(),
            value,
            unit: "u".to_string(),
            notes: None,
        }
    }

    #[test]
    fn test_empty() {
        assert!(summarize(&[]).is_empty());
    }

    #[test]
    fn test_grouping_and_aggregates() {
        let records = vec![
            record("weight", "2024-03-01", 71.0),
            record("steps", "2024-03-01", 4000.0),
            record("weight", "2024-03-03", 70.0),
            record("weight", "2024-03-02", 72.0),
            record("steps", "2024-03-02", 6000.0),
        ];

        let summaries = summarize(&records);
        assert_eq!(summaries.len(), 2);

        let steps = &summaries[0];
        assert_eq!(steps.record_type, "steps");
        assert_eq!(steps.count, 2);
        assert_eq!(steps.average, 5000.0);

        let weight = &summaries[1];
        assert_eq!(weight.record_type, "weight");
        assert_eq!(weight.count, 3);
        assert_eq!(weight.min, 70.0);
        assert_eq!(weight.max, 72.0);
        assert_eq!(weight.average, 71.0);
        assert_eq!(weight.latest, 70.0);
        assert_eq!(weight.latest_date, "2024-03-03");
    }
}
