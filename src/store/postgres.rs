use super::Store;
use crate::db;
use crate::errors::StoreError;
use crate::models;
use sqlx::PgPool;
use uuid::Uuid;

/// [`Store`] backed by PostgreSQL through a shared connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Store for PgStore {
    async fn upsert_profile(
        &self,
        profile: &models::NewProfile,
    ) -> Result<models::Profile, StoreError> {
        Ok(db::profile::upsert(&self.pool, profile).await?)
    }

    async fn find_profile_by_clerk_id(
        &self,
        clerk_id: &str,
    ) -> Result<Option<models::Profile>, StoreError> {
        Ok(db::profile::fetch_by_clerk_id(&self.pool, clerk_id).await?)
    }

    async fn insert_chat_session(
        &self,
        session: &models::NewChatSession,
    ) -> Result<models::ChatSession, StoreError> {
        Ok(db::chat_session::insert(&self.pool, session).await?)
    }

    async fn find_chat_session(
        &self,
        id: Uuid,
    ) -> Result<Option<models::ChatSession>, StoreError> {
        Ok(db::chat_session::fetch(&self.pool, id).await?)
    }

    async fn update_chat_session(
        &self,
        update: &models::ChatSessionUpdate,
    ) -> Result<Option<models::ChatSession>, StoreError> {
        Ok(db::chat_session::update(&self.pool, update).await?)
    }

    async fn upsert_subscription(
        &self,
        subscription: &models::NewSubscription,
    ) -> Result<models::Subscription, StoreError> {
        Ok(db::subscription::upsert(&self.pool, subscription).await?)
    }

    async fn find_active_subscription(
        &self,
        profile_id: Uuid,
    ) -> Result<Option<models::Subscription>, StoreError> {
        Ok(db::subscription::fetch_active_by_profile(&self.pool, profile_id).await?)
    }

    async fn cancel_subscription(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<Option<models::Subscription>, StoreError> {
        Ok(db::subscription::cancel(&self.pool, stripe_subscription_id).await?)
    }

    async fn insert_security_log(
        &self,
        entry: &models::NewSecurityLogEntry,
    ) -> Result<models::SecurityLogEntry, StoreError> {
        Ok(db::security_log::insert(&self.pool, entry).await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(db::ping(&self.pool).await?)
    }
}
