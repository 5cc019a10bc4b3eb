use crate::application::collector::Collector;
use crate::config::RunConfig;
use crate::domain::errors::RunError;
use crate::domain::ports::{PublishReceipt, RecordSink, SignalSource};
use crate::domain::record::DailyRecord;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;

/// Summary of one completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub date: NaiveDate,
    pub present: usize,
    pub absent: usize,
    /// `None` on a dry run.
    pub receipt: Option<PublishReceipt>,
}

/// Drives one run end to end: precondition check, fan-out collection,
/// record assembly, single publish. Owns the run's lifecycle; the process
/// exit status follows the returned `Result`.
pub struct Pipeline {
    config: RunConfig,
    sources: Vec<Arc<dyn SignalSource>>,
    sink: Arc<dyn RecordSink>,
}

impl Pipeline {
    pub fn new(
        config: RunConfig,
        sources: Vec<Arc<dyn SignalSource>>,
        sink: Arc<dyn RecordSink>,
    ) -> Self {
        Self {
            config,
            sources,
            sink,
        }
    }

    pub async fn run(&self, date: NaiveDate, dry_run: bool) -> Result<RunReport, RunError> {
        // Destination settings are checked before any fetch is attempted, so
        // an aborted run has zero network activity.
        self.config.validate_destination()?;

        info!(
            "Collecting {} metrics for {} ({} concurrent max, {:?} per-fetch deadline)",
            self.sources.len(),
            date,
            self.config.max_concurrent_fetches,
            self.config.fetch_timeout,
        );

        let collector = Collector::new(
            self.config.fetch_timeout,
            self.config.max_concurrent_fetches,
        );
        let results = collector.collect(&self.sources).await;
        let record = DailyRecord::build(date, &results);

        let receipt = if dry_run {
            info!(
                "Dry run: skipping publish. Record payload: {}",
                serde_json::to_string(&record).unwrap_or_else(|_| "<unserializable>".to_string())
            );
            None
        } else {
            let receipt = self.sink.publish(&record).await?;
            info!("Published record for {} as page {}", date, receipt.page_id);
            Some(receipt)
        };

        let report = RunReport {
            date,
            present: record.present_count(),
            absent: record.absent_count(),
            receipt,
        };
        info!(
            "Run complete: {} present, {} absent, publish={}",
            report.present,
            report.absent,
            if dry_run { "skipped (dry run)" } else { "ok" },
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{PreconditionError, PublishError};
    use crate::domain::metric::{MetricId, MetricValue};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingSource {
        id: MetricId,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl SignalSource for CountingSource {
        fn id(&self) -> MetricId {
            self.id
        }

        async fn fetch(&self) -> MetricValue {
            self.calls.fetch_add(1, Ordering::SeqCst);
            MetricValue::Present(1.0)
        }
    }

    struct NullSink;

    #[async_trait]
    impl RecordSink for NullSink {
        async fn publish(&self, _record: &DailyRecord) -> Result<PublishReceipt, PublishError> {
            Ok(PublishReceipt {
                page_id: "page-1".to_string(),
                url: None,
            })
        }
    }

    fn config(token: &str, db: &str) -> RunConfig {
        RunConfig {
            notion_token: token.to_string(),
            notion_db: db.to_string(),
            fetch_timeout: Duration::from_secs(5),
            max_concurrent_fetches: 4,
        }
    }

    #[tokio::test]
    async fn test_precondition_failure_makes_no_fetches() {
        let calls = Arc::new(AtomicUsize::new(0));
        let sources: Vec<Arc<dyn SignalSource>> = vec![Arc::new(CountingSource {
            id: MetricId::DefiTvlUsdB,
            calls: calls.clone(),
        })];

        let pipeline = Pipeline::new(config("", "db"), sources, Arc::new(NullSink));
        let err = pipeline
            .run(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(), false)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            RunError::Precondition(PreconditionError::MissingCredential)
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_dry_run_collects_but_skips_publish() {
        let calls = Arc::new(AtomicUsize::new(0));
        let sources: Vec<Arc<dyn SignalSource>> = vec![Arc::new(CountingSource {
            id: MetricId::DefiTvlUsdB,
            calls: calls.clone(),
        })];

        let pipeline = Pipeline::new(config("secret", "db"), sources, Arc::new(NullSink));
        let report = pipeline
            .run(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(), true)
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.present, 1);
        assert_eq!(report.absent, 0);
        assert!(report.receipt.is_none());
    }
}
