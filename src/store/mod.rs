//! Store seam of the data access layer.
//!
//! [`crate::services::SecureDataAccess`] receives an `Arc<dyn Store>` instead of
//! reaching for a shared client, so tests can swap in [`MemoryStore`].
//! Lookups return `Ok(None)` for a missing row and `Err` only for real failures.
//! Upserts must be atomic with respect to their natural key.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::errors::StoreError;
use crate::models;
use uuid::Uuid;

#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Insert, or update email and (when given) name of the row with the same `clerk_id`.
    async fn upsert_profile(
        &self,
        profile: &models::NewProfile,
    ) -> Result<models::Profile, StoreError>;

    async fn find_profile_by_clerk_id(
        &self,
        clerk_id: &str,
    ) -> Result<Option<models::Profile>, StoreError>;

    /// New session with an empty message list.
    async fn insert_chat_session(
        &self,
        session: &models::NewChatSession,
    ) -> Result<models::ChatSession, StoreError>;

    async fn find_chat_session(&self, id: Uuid)
        -> Result<Option<models::ChatSession>, StoreError>;

    async fn update_chat_session(
        &self,
        update: &models::ChatSessionUpdate,
    ) -> Result<Option<models::ChatSession>, StoreError>;

    /// Insert, or update status and period end of the row with the same
    /// `stripe_subscription_id`.
    async fn upsert_subscription(
        &self,
        subscription: &models::NewSubscription,
    ) -> Result<models::Subscription, StoreError>;

    /// Newest `active` subscription of the profile.
    async fn find_active_subscription(
        &self,
        profile_id: Uuid,
    ) -> Result<Option<models::Subscription>, StoreError>;

    async fn cancel_subscription(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<Option<models::Subscription>, StoreError>;

    async fn insert_security_log(
        &self,
        entry: &models::NewSecurityLogEntry,
    ) -> Result<models::SecurityLogEntry, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
