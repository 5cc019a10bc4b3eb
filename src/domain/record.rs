use crate::domain::metric::{MetricId, MetricResult, MetricValue};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// One run's aggregated output: the run date (the store's natural key) plus
/// every collected metric, Absent entries included explicitly. Constructed
/// once per run and never mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRecord {
    date: NaiveDate,
    values: BTreeMap<MetricId, MetricValue>,
}

impl DailyRecord {
    /// Pure assembly of the collected results. Indexes by `MetricId`, so the
    /// order adapters completed in is irrelevant; the same date and result
    /// set always produce an identical record.
    pub fn build(date: NaiveDate, results: &[MetricResult]) -> Self {
        let values = results.iter().map(|r| (r.id, r.value)).collect();
        Self { date, values }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn values(&self) -> impl Iterator<Item = (MetricId, MetricValue)> + '_ {
        self.values.iter().map(|(id, v)| (*id, *v))
    }

    pub fn get(&self, id: MetricId) -> Option<MetricValue> {
        self.values.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn present_count(&self) -> usize {
        self.values.values().filter(|v| v.is_present()).count()
    }

    pub fn absent_count(&self) -> usize {
        self.values.len() - self.present_count()
    }
}
