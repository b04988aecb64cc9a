use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Row of the `profiles` table. `clerk_id` is the identity provider subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub clerk_id: String,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sanitized input for the profile upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProfile {
    pub clerk_id: String,
    pub email: String,
    pub name: Option<String>,
}
