use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::types::Json;
use uuid::Uuid;

/// Append-only row of the `security_logs` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SecurityLogEntry {
    pub id: Uuid,
    pub event: String,
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub user_id: Option<Uuid>,
    pub details: Json<Map<String, Value>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSecurityLogEntry {
    pub event: String,
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub user_id: Option<Uuid>,
    pub details: Map<String, Value>,
}
