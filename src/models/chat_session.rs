use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::types::Json;
use uuid::Uuid;

pub type ChatContext = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatSession {
    pub id: Uuid,
    pub profile_id: Option<Uuid>,
    pub messages: Json<Vec<Value>>,
    pub context: Json<ChatContext>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewChatSession {
    pub profile_id: Option<Uuid>,
    pub context: ChatContext,
}

/// Replacement messages plus an optional context patch.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSessionUpdate {
    pub id: Uuid,
    pub messages: Vec<Value>,
    pub context: Option<ChatContext>,
}
