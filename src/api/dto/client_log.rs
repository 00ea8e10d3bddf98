//! DTOs for client log submission and queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::application::services::client_log_service::SubmittedLog;
use crate::domain::entities::{ClientLogEntry, LogLevel};

/// Largest batch accepted by `POST /api/logs`.
pub const MAX_ENTRIES_PER_REQUEST: u64 = 100;

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitLogsRequest {
    #[validate(
        length(
            min = 1,
            max = MAX_ENTRIES_PER_REQUEST,
            message = "Submit between 1 and 100 entries"
        ),
        nested
    )]
    pub entries: Vec<LogEntryRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LogEntryRequest {
    pub level: LogLevel,

    #[validate(length(min = 1, max = 8000, message = "Message must be 1-8000 characters"))]
    pub message: String,

    /// Emitting component, e.g. `web` or `mobile-ios`.
    #[validate(length(max = 200))]
    pub source: Option<String>,

    #[serde(default)]
    pub properties: Option<Value>,

    /// Client-side time of the entry; defaults to the time it was received.
    pub occurred_at: Option<DateTime<Utc>>,
}

impl From<LogEntryRequest> for SubmittedLog {
    fn from(req: LogEntryRequest) -> Self {
        SubmittedLog {
            level: req.level,
            message: req.message,
            source: req.source,
            properties: req
                .properties
                .unwrap_or_else(|| Value::Object(Default::default())),
            occurred_at: req.occurred_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitLogsResponse {
    pub accepted: usize,
}

/// Log list filters. `level` is the minimum severity.
#[derive(Debug, Default, Deserialize)]
pub struct LogFilterParams {
    pub level: Option<LogLevel>,
}

#[derive(Debug, Serialize)]
pub struct ClientLogResponse {
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub level: LogLevel,
    pub message: String,
    pub source: Option<String>,
    pub properties: Value,
    pub occurred_at: DateTime<Utc>,
    pub received_at: DateTime<Utc>,
}

impl From<ClientLogEntry> for ClientLogResponse {
    fn from(e: ClientLogEntry) -> Self {
        Self {
            id: e.id,
            tenant_id: e.tenant_id,
            user_id: e.user_id,
            level: e.level,
            message: e.message,
            source: e.source,
            properties: e.properties,
            occurred_at: e.occurred_at,
            received_at: e.received_at,
        }
    }
}
