use super::Store;
use crate::errors::StoreError;
use crate::models;
use chrono::Utc;
use sqlx::types::Json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    profiles: Vec<models::Profile>,
    chat_sessions: Vec<models::ChatSession>,
    subscriptions: Vec<models::Subscription>,
    security_logs: Vec<models::SecurityLogEntry>,
}

/// In-process [`Store`]. Each operation runs under one lock, so upserts are
/// atomic. Counts every store call and every write so tests can prove that
/// rejected input never reached the store.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    calls: AtomicUsize,
    writes: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store calls of any kind.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of insert/update calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Makes every following call fail like an unreachable database would.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn subscription_count(&self) -> usize {
        self.tables.lock().await.subscriptions.len()
    }

    pub async fn security_log_count(&self) -> usize {
        self.tables.lock().await.security_logs.len()
    }

    /// Puts a row in place as is, timestamps included.
    pub async fn seed_subscription(&self, subscription: models::Subscription) {
        self.tables.lock().await.subscriptions.push(subscription);
    }

    fn read(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("connection refused".to_string()));
        }
        Ok(())
    }

    fn write(&self) -> Result<(), StoreError> {
        self.read()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn upsert_profile(
        &self,
        profile: &models::NewProfile,
    ) -> Result<models::Profile, StoreError> {
        self.write()?;
        let mut tables = self.tables.lock().await;
        let now = Utc::now();

        if let Some(existing) = tables
            .profiles
            .iter_mut()
            .find(|p| p.clerk_id == profile.clerk_id)
        {
            existing.email = profile.email.clone();
            if let Some(name) = &profile.name {
                existing.name = Some(name.clone());
            }
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let created = models::Profile {
            id: Uuid::new_v4(),
            clerk_id: profile.clerk_id.clone(),
            email: profile.email.clone(),
            name: profile.name.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.profiles.push(created.clone());
        Ok(created)
    }

    async fn find_profile_by_clerk_id(
        &self,
        clerk_id: &str,
    ) -> Result<Option<models::Profile>, StoreError> {
        self.read()?;
        let tables = self.tables.lock().await;
        Ok(tables
            .profiles
            .iter()
            .find(|p| p.clerk_id == clerk_id)
            .cloned())
    }

    async fn insert_chat_session(
        &self,
        session: &models::NewChatSession,
    ) -> Result<models::ChatSession, StoreError> {
        self.write()?;
        let now = Utc::now();
        let created = models::ChatSession {
            id: Uuid::new_v4(),
            profile_id: session.profile_id,
            messages: Json(Vec::new()),
            context: Json(session.context.clone()),
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().await.chat_sessions.push(created.clone());
        Ok(created)
    }

    async fn find_chat_session(
        &self,
        id: Uuid,
    ) -> Result<Option<models::ChatSession>, StoreError> {
        self.read()?;
        let tables = self.tables.lock().await;
        Ok(tables.chat_sessions.iter().find(|s| s.id == id).cloned())
    }

    async fn update_chat_session(
        &self,
        update: &models::ChatSessionUpdate,
    ) -> Result<Option<models::ChatSession>, StoreError> {
        self.write()?;
        let mut tables = self.tables.lock().await;
        let session = match tables.chat_sessions.iter_mut().find(|s| s.id == update.id) {
            Some(session) => session,
            None => return Ok(None),
        };

        session.messages = Json(update.messages.clone());
        if let Some(context) = &update.context {
            for (key, value) in context {
                session.context.insert(key.clone(), value.clone());
            }
        }
        session.updated_at = Utc::now();
        Ok(Some(session.clone()))
    }

    async fn upsert_subscription(
        &self,
        subscription: &models::NewSubscription,
    ) -> Result<models::Subscription, StoreError> {
        self.write()?;
        let mut tables = self.tables.lock().await;
        let now = Utc::now();

        if let Some(existing) = tables
            .subscriptions
            .iter_mut()
            .find(|s| s.stripe_subscription_id == subscription.stripe_subscription_id)
        {
            existing.status = subscription.status;
            existing.current_period_end = subscription.current_period_end;
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let created = models::Subscription {
            id: Uuid::new_v4(),
            profile_id: subscription.profile_id,
            stripe_subscription_id: subscription.stripe_subscription_id.clone(),
            stripe_customer_id: subscription.stripe_customer_id.clone(),
            status: subscription.status,
            current_period_end: subscription.current_period_end,
            created_at: now,
            updated_at: now,
        };
        tables.subscriptions.push(created.clone());
        Ok(created)
    }

    async fn find_active_subscription(
        &self,
        profile_id: Uuid,
    ) -> Result<Option<models::Subscription>, StoreError> {
        self.read()?;
        let tables = self.tables.lock().await;
        // max_by_key keeps the last of equal keys, so ties go to the later insert
        Ok(tables
            .subscriptions
            .iter()
            .filter(|s| {
                s.profile_id == profile_id && s.status == models::SubscriptionStatus::Active
            })
            .max_by_key(|s| s.created_at)
            .cloned())
    }

    async fn cancel_subscription(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<Option<models::Subscription>, StoreError> {
        self.write()?;
        let mut tables = self.tables.lock().await;
        Ok(tables
            .subscriptions
            .iter_mut()
            .find(|s| s.stripe_subscription_id == stripe_subscription_id)
            .map(|s| {
                s.status = models::SubscriptionStatus::Canceled;
                s.updated_at = Utc::now();
                s.clone()
            }))
    }

    async fn insert_security_log(
        &self,
        entry: &models::NewSecurityLogEntry,
    ) -> Result<models::SecurityLogEntry, StoreError> {
        self.write()?;
        let created = models::SecurityLogEntry {
            id: Uuid::new_v4(),
            event: entry.event.clone(),
            ip_address: entry.ip_address.clone(),
            user_agent: entry.user_agent.clone(),
            user_id: entry.user_id,
            details: Json(entry.details.clone()),
            created_at: Utc::now(),
        };
        self.tables.lock().await.security_logs.push(created.clone());
        Ok(created)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(clerk_id: &str, email: &str, name: Option<&str>) -> models::NewProfile {
        models::NewProfile {
            clerk_id: clerk_id.to_string(),
            email: email.to_string(),
            name: name.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_profile_upsert_keeps_single_row() {
        let store = MemoryStore::new();
        let first = store
            .upsert_profile(&profile("ext-1", "a@b.com", Some("Ann")))
            .await
            .unwrap();
        let second = store
            .upsert_profile(&profile("ext-1", "c@d.com", None))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.email, "c@d.com");
        assert_eq!(second.name.as_deref(), Some("Ann"));
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn test_update_missing_session_returns_none() {
        let store = MemoryStore::new();
        let update = models::ChatSessionUpdate {
            id: Uuid::new_v4(),
            messages: vec![json!("hi")],
            context: None,
        };
        assert!(store.update_chat_session(&update).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_context_is_merged() {
        let store = MemoryStore::new();
        let mut context = models::ChatContext::new();
        context.insert("page".to_string(), json!("pricing"));
        context.insert("locale".to_string(), json!("en"));
        let session = store
            .insert_chat_session(&models::NewChatSession {
                profile_id: None,
                context,
            })
            .await
            .unwrap();

        let mut patch = models::ChatContext::new();
        patch.insert("locale".to_string(), json!("de"));
        let updated = store
            .update_chat_session(&models::ChatSessionUpdate {
                id: session.id,
                messages: vec![],
                context: Some(patch),
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.context["page"], json!("pricing"));
        assert_eq!(updated.context["locale"], json!("de"));
    }

    #[tokio::test]
    async fn test_failing_store() {
        let store = MemoryStore::new();
        store.set_failing(true);
        assert!(store.ping().await.is_err());
        assert!(store.find_profile_by_clerk_id("ext-1").await.is_err());
        assert_eq!(store.call_count(), 2);
    }
}
