//! Client log intake and query service.

use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::domain::entities::{ClientLogEntry, LogLevel, NewClientLogEntry, Role};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::{ClientLogFilter, ClientLogRepository};
use crate::domain::tenant_context::TenantContext;
use crate::error::AppError;

/// One entry as submitted by a client.
#[derive(Debug, Clone)]
pub struct SubmittedLog {
    pub level: LogLevel,
    pub message: String,
    pub source: Option<String>,
    pub properties: Value,
    pub occurred_at: Option<DateTime<Utc>>,
}

/// Service accepting client log entries into the bounded log queue.
///
/// Entries are stamped with the caller's tenant and user; the queue is
/// drained by [`crate::domain::log_worker::run_log_worker`].
pub struct ClientLogService {
    repository: Arc<dyn ClientLogRepository>,
    sender: mpsc::Sender<NewClientLogEntry>,
}

impl ClientLogService {
    pub fn new(
        repository: Arc<dyn ClientLogRepository>,
        sender: mpsc::Sender<NewClientLogEntry>,
    ) -> Self {
        Self { repository, sender }
    }

    /// Queues entries and returns how many were accepted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] when the queue cannot take the whole
    /// batch or the worker has stopped. A rejected batch leaves nothing queued.
    pub fn submit(&self, ctx: &TenantContext, entries: Vec<SubmittedLog>) -> Result<usize, AppError> {
        let total = entries.len();
        let permits = match self.sender.try_reserve_many(total) {
            Ok(permits) => permits,
            Err(TrySendError::Closed(())) => {
                return Err(AppError::unavailable("Log queue is closed", json!({})));
            }
            Err(TrySendError::Full(())) => {
                metrics::counter!("client_logs_rejected_total").increment(total as u64);
                tracing::warn!(rejected = total, "Log queue is full");
                return Err(AppError::unavailable(
                    "Log queue is full",
                    json!({"retry": true}),
                ));
            }
        };

        let received_at = Utc::now();
        for (permit, entry) in permits.zip(entries) {
            permit.send(NewClientLogEntry {
                tenant_id: ctx.tenant_id,
                user_id: Some(ctx.user_id),
                level: entry.level,
                message: entry.message,
                source: entry.source,
                properties: entry.properties,
                occurred_at: entry.occurred_at.unwrap_or(received_at),
                received_at,
            });
        }

        Ok(total)
    }

    /// Lists persisted entries of the active tenant.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] without tenant context or below TenantAdmin.
    pub async fn list_logs(
        &self,
        ctx: &TenantContext,
        min_level: Option<LogLevel>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        page: PageRequest,
    ) -> Result<Page<ClientLogEntry>, AppError> {
        let tenant_id = ctx.require_tenant()?;
        ctx.require_role(Role::TenantAdmin)?;
        self.repository
            .list(
                ClientLogFilter {
                    tenant_id,
                    min_level,
                    from,
                    to,
                },
                page,
            )
            .await
    }

    /// Number of entries waiting in the queue.
    pub fn queue_depth(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }

    pub fn queue_open(&self) -> bool {
        !self.sender.is_closed()
    }
}
