//! Background worker draining the client log queue.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::domain::entities::{LogLevel, NewClientLogEntry};
use crate::domain::repositories::ClientLogRepository;

/// Default number of entries persisted per batch.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Runs until every sender is dropped and the queue is empty.
///
/// Entries are pulled in batches of up to `batch_size`. Each entry is emitted
/// through `tracing` (so client logs show up next to server logs), then the
/// batch is persisted with up to three retries. A batch that still fails is
/// dropped and counted in `client_logs_dropped_total`.
pub async fn run_log_worker(
    mut rx: mpsc::Receiver<NewClientLogEntry>,
    repository: Arc<dyn ClientLogRepository>,
    batch_size: usize,
) {
    let batch_size = batch_size.max(1);
    let mut buffer = Vec::with_capacity(batch_size);

    while rx.recv_many(&mut buffer, batch_size).await > 0 {
        let batch: Vec<NewClientLogEntry> = std::mem::take(&mut buffer);
        for entry in &batch {
            emit(entry);
        }

        let count = batch.len();
        let strategy = ExponentialBackoff::from_millis(10)
            .max_delay(Duration::from_secs(2))
            .map(jitter)
            .take(3);

        let result = Retry::start(strategy, || {
            let repository = repository.clone();
            let batch = batch.clone();
            async move { repository.insert_batch(batch).await }
        })
        .await;

        match result {
            Ok(stored) => {
                metrics::counter!("client_logs_persisted_total").increment(stored);
            }
            Err(e) => {
                tracing::error!(error = %e, count, "Failed to persist client log batch");
                metrics::counter!("client_logs_dropped_total").increment(count as u64);
            }
        }
    }

    tracing::info!("Client log worker stopped");
}

fn emit(entry: &NewClientLogEntry) {
    let tenant_id = entry.tenant_id.map(|t| t.to_string()).unwrap_or_default();
    let user_id = entry.user_id.map(|u| u.to_string()).unwrap_or_default();
    let source = entry.source.as_deref().unwrap_or("client");

    macro_rules! client_event {
        ($lvl:ident) => {
            tracing::$lvl!(
                target: "client",
                tenant_id = %tenant_id,
                user_id = %user_id,
                source,
                occurred_at = %entry.occurred_at,
                properties = %entry.properties,
                "{}",
                entry.message
            )
        };
    }

    match entry.level {
        LogLevel::Trace => client_event!(trace),
        LogLevel::Debug => client_event!(debug),
        LogLevel::Information => client_event!(info),
        LogLevel::Warning => client_event!(warn),
        LogLevel::Error | LogLevel::Critical => client_event!(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockClientLogRepository;
    use crate::error::AppError;
    use chrono::Utc;
    use serde_json::json;

    fn entry(message: &str) -> NewClientLogEntry {
        let now = Utc::now();
        NewClientLogEntry {
            tenant_id: None,
            user_id: None,
            level: LogLevel::Information,
            message: message.to_string(),
            source: None,
            properties: json!({}),
            occurred_at: now,
            received_at: now,
        }
    }

    #[tokio::test]
    async fn test_worker_persists_batches_and_stops() {
        let mut repo = MockClientLogRepository::new();
        repo.expect_insert_batch()
            .withf(|batch| batch.len() == 3)
            .times(1)
            .returning(|batch| Ok(batch.len() as u64));

        let (tx, rx) = mpsc::channel(10);
        for i in 0..3 {
            tx.send(entry(&format!("m{i}"))).await.unwrap();
        }
        drop(tx);

        run_log_worker(rx, Arc::new(repo), 10).await;
    }

    #[tokio::test]
    async fn test_worker_retries_failed_batch() {
        let mut repo = MockClientLogRepository::new();
        let mut seq = mockall::Sequence::new();
        repo.expect_insert_batch()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(AppError::internal("db down", json!({}))));
        repo.expect_insert_batch()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|batch| Ok(batch.len() as u64));

        let (tx, rx) = mpsc::channel(10);
        tx.send(entry("retry me")).await.unwrap();
        drop(tx);

        run_log_worker(rx, Arc::new(repo), 10).await;
    }

    #[tokio::test]
    async fn test_worker_drops_after_exhausting_retries() {
        let mut repo = MockClientLogRepository::new();
        // first attempt + three retries
        repo.expect_insert_batch()
            .times(4)
            .returning(|_| Err(AppError::internal("db down", json!({}))));

        let (tx, rx) = mpsc::channel(10);
        tx.send(entry("lost")).await.unwrap();
        drop(tx);

        run_log_worker(rx, Arc::new(repo), 10).await;
    }
}
