//! Repository trait for persisted client log entries.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::{ClientLogEntry, LogLevel, NewClientLogEntry};
use crate::domain::page::{Page, PageRequest};
use crate::error::AppError;
use async_trait::async_trait;

/// Filter for listing client logs of one tenant.
///
/// `min_level` keeps entries at or above the given severity.
#[derive(Debug, Clone)]
pub struct ClientLogFilter {
    pub tenant_id: Uuid,
    pub min_level: Option<LogLevel>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl ClientLogFilter {
    pub fn matches(&self, e: &ClientLogEntry) -> bool {
        e.tenant_id == Some(self.tenant_id)
            && self.min_level.is_none_or(|l| e.level >= l)
            && self.from.is_none_or(|from| e.occurred_at >= from)
            && self.to.is_none_or(|to| e.occurred_at <= to)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientLogRepository: Send + Sync {
    /// Persists a batch, returning the number of stored entries.
    async fn insert_batch(&self, entries: Vec<NewClientLogEntry>) -> Result<u64, AppError>;

    /// Lists entries, most recent first.
    async fn list(
        &self,
        filter: ClientLogFilter,
        page: PageRequest,
    ) -> Result<Page<ClientLogEntry>, AppError>;
}
