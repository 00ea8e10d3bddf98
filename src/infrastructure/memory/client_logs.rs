use async_trait::async_trait;
use uuid::Uuid;

use super::store::{MemoryStore, paginate};
use crate::domain::entities::{ClientLogEntry, NewClientLogEntry};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::{ClientLogFilter, ClientLogRepository};
use crate::error::AppError;

#[async_trait]
impl ClientLogRepository for MemoryStore {
    async fn insert_batch(&self, entries: Vec<NewClientLogEntry>) -> Result<u64, AppError> {
        let count = entries.len() as u64;
        let mut tables = self.tables.write().await;
        tables
            .client_logs
            .extend(entries.into_iter().map(|e| ClientLogEntry {
                id: Uuid::new_v4(),
                tenant_id: e.tenant_id,
                user_id: e.user_id,
                level: e.level,
                message: e.message,
                source: e.source,
                properties: e.properties,
                occurred_at: e.occurred_at,
                received_at: e.received_at,
            }));
        Ok(count)
    }

    async fn list(
        &self,
        filter: ClientLogFilter,
        page: PageRequest,
    ) -> Result<Page<ClientLogEntry>, AppError> {
        let tables = self.tables.read().await;
        Ok(paginate(
            &tables.client_logs,
            |e| filter.matches(e),
            |a, b| b.occurred_at.cmp(&a.occurred_at),
            page,
        ))
    }
}
