use crate::domain::errors::PublishError;
use crate::domain::metric::{MetricId, MetricValue};
use crate::domain::record::DailyRecord;
use async_trait::async_trait;

/// One source-specific fetch-and-normalize unit. `fetch` never fails: every
/// transport, status, parse or schema problem collapses to
/// `MetricValue::Absent` with a reason tag. At most one outbound call per
/// invocation, no retries.
#[async_trait]
pub trait SignalSource: Send + Sync {
    fn id(&self) -> MetricId;

    async fn fetch(&self) -> MetricValue;
}

/// Identity the destination assigned to a published record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub page_id: String,
    pub url: Option<String>,
}

/// Destination store boundary. Exactly one write per record; failures are
/// surfaced, never retried here.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn publish(&self, record: &DailyRecord) -> Result<PublishReceipt, PublishError>;
}
