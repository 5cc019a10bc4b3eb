use crate::domain::metric::{MetricId, MetricValue};
use crate::domain::ports::SignalSource;
use async_trait::async_trait;

/// A placeholder metric: returns a configured constant with no network
/// call. Which metrics are live fetches and which are placeholders is a
/// registry decision; the pipeline treats both identically.
pub struct StaticSource {
    id: MetricId,
    value: f64,
}

impl StaticSource {
    pub fn new(id: MetricId, value: f64) -> Self {
        Self { id, value }
    }
}

#[async_trait]
impl SignalSource for StaticSource {
    fn id(&self) -> MetricId {
        self.id
    }

    async fn fetch(&self) -> MetricValue {
        MetricValue::Present(self.value)
    }
}
