use crate::domain::metric::{AbsenceReason, MetricResult, MetricValue};
use crate::domain::ports::SignalSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Fans out over every registered source and gathers exactly one result per
/// source. Sources run concurrently up to a configurable bound; each fetch
/// is capped by a deadline. A source that times out, fails, or panics only
/// loses its own metric — the rest of the run is unaffected.
pub struct Collector {
    fetch_timeout: Duration,
    limiter: Arc<Semaphore>,
}

impl Collector {
    pub fn new(fetch_timeout: Duration, max_concurrent_fetches: usize) -> Self {
        Self {
            fetch_timeout,
            limiter: Arc::new(Semaphore::new(max_concurrent_fetches.max(1))),
        }
    }

    /// Total over the registry: the output always has one `MetricResult`
    /// per input source, in registry order.
    pub async fn collect(&self, sources: &[Arc<dyn SignalSource>]) -> Vec<MetricResult> {
        let handles: Vec<_> = sources
            .iter()
            .map(|source| {
                let source = Arc::clone(source);
                let limiter = Arc::clone(&self.limiter);
                let deadline = self.fetch_timeout;
                let id = source.id();

                let handle = tokio::spawn(async move {
                    // Semaphore never closes while the collector is alive.
                    let _permit = limiter.acquire().await.expect("limiter closed");
                    debug!("Fetching {}...", id);
                    match timeout(deadline, source.fetch()).await {
                        Ok(value) => value,
                        Err(_) => MetricValue::Absent(AbsenceReason::Timeout),
                    }
                });
                (id, handle)
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (id, handle) in handles {
            let value = match handle.await {
                Ok(value) => value,
                Err(join_err) if join_err.is_panic() => {
                    MetricValue::Absent(AbsenceReason::AdapterPanic)
                }
                // Cancellation only happens at runtime shutdown; treat it
                // like a panic rather than losing the slot.
                Err(_) => MetricValue::Absent(AbsenceReason::AdapterPanic),
            };

            if let MetricValue::Absent(reason) = value {
                warn!("Metric {} unavailable this run: {}", id, reason);
            }
            results.push(MetricResult::new(id, value));
        }
        results
    }
}
