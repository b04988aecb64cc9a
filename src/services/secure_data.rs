//! Validated, sanitized access to profiles, chat sessions, subscriptions and
//! security logs.
//!
//! Every operation goes through the same steps:
//! 1. build the entity schema from [`crate::forms`] and validate it, failing
//!    with [`DataAccessError::Validation`] before any store access;
//! 2. sanitize free-text values while converting the schema into a store input;
//! 3. emit one log line naming the operation and table, with sensitive values
//!    masked by the [`Redactor`];
//! 4. call the injected [`Store`], turning failures into a generic
//!    [`DataAccessError::Persistence`] after logging them.
//!
//! Lookups return `Ok(None)` when nothing matches.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use serde_valid::Validate;
use std::sync::Arc;

use crate::configuration::Settings;
use crate::errors::{DataAccessError, StoreError};
use crate::forms;
use crate::health::{ComponentHealth, HealthChecker};
use crate::helpers::Redactor;
use crate::models;
use crate::store::Store;

const PROFILES: &str = "profiles";
const CHAT_SESSIONS: &str = "chat_sessions";
const SUBSCRIPTIONS: &str = "subscriptions";
const SECURITY_LOGS: &str = "security_logs";

#[derive(Clone)]
pub struct SecureDataAccess {
    store: Arc<dyn Store>,
    redactor: Redactor,
}

impl SecureDataAccess {
    pub fn new(store: Arc<dyn Store>, redactor: Redactor) -> Self {
        Self { store, redactor }
    }

    pub fn from_settings(store: Arc<dyn Store>, settings: &Settings) -> Self {
        Self::new(store, Redactor::new(settings.log_value_max_length))
    }

    #[tracing::instrument(name = "Create or update profile", skip_all)]
    pub async fn create_or_update_profile(
        &self,
        email: &str,
        external_id: &str,
        name: Option<&str>,
    ) -> Result<models::Profile, DataAccessError> {
        const OPERATION: &str = "create_or_update_profile";

        let form = forms::ProfileForm {
            email: email.to_string(),
            clerk_id: external_id.to_string(),
            name: name.map(str::to_string),
        };
        validate(OPERATION, &form)?;
        let profile = models::NewProfile::from(&form);

        tracing::info!(
            operation = OPERATION,
            table = PROFILES,
            clerk_id = %self.redactor.identifier(&profile.clerk_id),
            email = %self.redactor.email(&profile.email),
            has_name = profile.name.is_some(),
            "Upserting profile"
        );

        self.store
            .upsert_profile(&profile)
            .await
            .map_err(|err| persistence_error(OPERATION, PROFILES, err))
    }

    #[tracing::instrument(name = "Get profile by external id", skip_all)]
    pub async fn get_profile_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<models::Profile>, DataAccessError> {
        const OPERATION: &str = "get_profile_by_external_id";

        let lookup = forms::ProfileLookup {
            clerk_id: external_id.to_string(),
        };
        validate(OPERATION, &lookup)?;
        let clerk_id = lookup.clerk_id();

        tracing::info!(
            operation = OPERATION,
            table = PROFILES,
            clerk_id = %self.redactor.identifier(clerk_id),
            "Fetching profile"
        );

        self.store
            .find_profile_by_clerk_id(clerk_id)
            .await
            .map_err(|err| persistence_error(OPERATION, PROFILES, err))
    }

    #[tracing::instrument(name = "Create chat session", skip_all)]
    pub async fn create_chat_session(
        &self,
        profile_id: Option<&str>,
        context: Option<models::ChatContext>,
    ) -> Result<models::ChatSession, DataAccessError> {
        const OPERATION: &str = "create_chat_session";

        let form = forms::ChatSessionForm {
            profile_id: profile_id.map(str::to_string),
            context,
        };
        validate(OPERATION, &form)?;
        let session = models::NewChatSession::try_from(&form)?;

        tracing::info!(
            operation = OPERATION,
            table = CHAT_SESSIONS,
            profile_id = %session
                .profile_id
                .map(|id| self.redactor.identifier(&id.to_string()))
                .unwrap_or_default(),
            context_keys = session.context.len(),
            "Creating chat session"
        );

        self.store
            .insert_chat_session(&session)
            .await
            .map_err(|err| persistence_error(OPERATION, CHAT_SESSIONS, err))
    }

    #[tracing::instrument(name = "Get chat session", skip_all)]
    pub async fn get_chat_session(
        &self,
        session_id: &str,
    ) -> Result<Option<models::ChatSession>, DataAccessError> {
        const OPERATION: &str = "get_chat_session";

        let lookup = forms::ChatSessionLookup {
            session_id: session_id.to_string(),
        };
        validate(OPERATION, &lookup)?;
        let id = lookup.session_id()?;

        tracing::info!(
            operation = OPERATION,
            table = CHAT_SESSIONS,
            session_id = %self.redactor.identifier(&id.to_string()),
            "Fetching chat session"
        );

        self.store
            .find_chat_session(id)
            .await
            .map_err(|err| persistence_error(OPERATION, CHAT_SESSIONS, err))
    }

    /// Overwrites the message list. `context`, when given, is merged into the
    /// stored context; `None` keeps the stored context untouched.
    #[tracing::instrument(name = "Update chat session", skip_all)]
    pub async fn update_chat_session(
        &self,
        session_id: &str,
        messages: Vec<Value>,
        context: Option<models::ChatContext>,
    ) -> Result<Option<models::ChatSession>, DataAccessError> {
        const OPERATION: &str = "update_chat_session";

        let form = forms::ChatSessionUpdateForm {
            session_id: session_id.to_string(),
            messages,
            context,
        };
        validate(OPERATION, &form)?;
        let update = models::ChatSessionUpdate::try_from(form)?;

        tracing::info!(
            operation = OPERATION,
            table = CHAT_SESSIONS,
            session_id = %self.redactor.identifier(&update.id.to_string()),
            message_count = update.messages.len(),
            context_supplied = update.context.is_some(),
            "Updating chat session"
        );

        self.store
            .update_chat_session(&update)
            .await
            .map_err(|err| persistence_error(OPERATION, CHAT_SESSIONS, err))
    }

    #[tracing::instrument(name = "Create or update subscription", skip_all)]
    pub async fn create_or_update_subscription(
        &self,
        profile_id: &str,
        stripe_subscription_id: &str,
        stripe_customer_id: &str,
        status: &str,
        current_period_end: DateTime<Utc>,
    ) -> Result<models::Subscription, DataAccessError> {
        const OPERATION: &str = "create_or_update_subscription";

        let form = forms::SubscriptionForm {
            profile_id: profile_id.to_string(),
            stripe_subscription_id: stripe_subscription_id.to_string(),
            stripe_customer_id: stripe_customer_id.to_string(),
            status: status.to_string(),
            current_period_end,
        };
        validate(OPERATION, &form)?;
        let subscription = models::NewSubscription::try_from(&form)?;

        tracing::info!(
            operation = OPERATION,
            table = SUBSCRIPTIONS,
            stripe_subscription_id =
                %self.redactor.identifier(&subscription.stripe_subscription_id),
            status = %subscription.status,
            "Upserting subscription"
        );

        self.store
            .upsert_subscription(&subscription)
            .await
            .map_err(|err| persistence_error(OPERATION, SUBSCRIPTIONS, err))
    }

    /// Newest `active` subscription of the profile. Upstream billing may leave
    /// more than one active row behind, only the most recent one is returned.
    #[tracing::instrument(name = "Get active subscription", skip_all)]
    pub async fn get_active_subscription(
        &self,
        profile_id: &str,
    ) -> Result<Option<models::Subscription>, DataAccessError> {
        const OPERATION: &str = "get_active_subscription";

        let lookup = forms::SubscriptionLookup {
            profile_id: profile_id.to_string(),
        };
        validate(OPERATION, &lookup)?;
        let profile_id = lookup.profile_id()?;

        tracing::info!(
            operation = OPERATION,
            table = SUBSCRIPTIONS,
            profile_id = %self.redactor.identifier(&profile_id.to_string()),
            "Fetching active subscription"
        );

        self.store
            .find_active_subscription(profile_id)
            .await
            .map_err(|err| persistence_error(OPERATION, SUBSCRIPTIONS, err))
    }

    #[tracing::instrument(name = "Cancel subscription", skip_all)]
    pub async fn cancel_subscription(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<Option<models::Subscription>, DataAccessError> {
        const OPERATION: &str = "cancel_subscription";

        let form = forms::SubscriptionCancelForm {
            stripe_subscription_id: stripe_subscription_id.to_string(),
        };
        validate(OPERATION, &form)?;
        let stripe_subscription_id = form.stripe_subscription_id();

        tracing::info!(
            operation = OPERATION,
            table = SUBSCRIPTIONS,
            stripe_subscription_id = %self.redactor.identifier(stripe_subscription_id),
            "Canceling subscription"
        );

        self.store
            .cancel_subscription(stripe_subscription_id)
            .await
            .map_err(|err| persistence_error(OPERATION, SUBSCRIPTIONS, err))
    }

    #[tracing::instrument(name = "Log security event", skip_all)]
    pub async fn log_security_event(
        &self,
        event: &str,
        ip: &str,
        user_agent: Option<&str>,
        user_id: Option<&str>,
        details: Option<Map<String, Value>>,
    ) -> Result<models::SecurityLogEntry, DataAccessError> {
        const OPERATION: &str = "log_security_event";

        let form = forms::SecurityLogForm {
            event: event.to_string(),
            ip: ip.to_string(),
            user_agent: user_agent.map(str::to_string),
            user_id: user_id.map(str::to_string),
            details,
        };
        validate(OPERATION, &form)?;
        let entry = models::NewSecurityLogEntry::try_from(&form)?;

        tracing::info!(
            operation = OPERATION,
            table = SECURITY_LOGS,
            event = %self.redactor.truncate(&entry.event),
            ip = %self.redactor.ip(&entry.ip_address),
            details = %self.redactor.details(&entry.details),
            "Recording security event"
        );

        self.store
            .insert_security_log(&entry)
            .await
            .map_err(|err| persistence_error(OPERATION, SECURITY_LOGS, err))
    }

    pub async fn health_check(&self) -> ComponentHealth {
        HealthChecker::new(self.store.clone()).check().await
    }
}

fn validate<T: Validate>(operation: &'static str, form: &T) -> Result<(), DataAccessError> {
    form.validate().map_err(|errors| {
        tracing::warn!(operation, "Rejected invalid input");
        DataAccessError::from(errors)
    })
}

fn persistence_error(
    operation: &'static str,
    table: &'static str,
    err: StoreError,
) -> DataAccessError {
    tracing::error!(operation, table, error = %err.summary(), "Store operation failed");
    DataAccessError::Persistence(format!("Could not complete {}", operation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> (Arc<MemoryStore>, SecureDataAccess) {
        let store = Arc::new(MemoryStore::new());
        let service = SecureDataAccess::new(store.clone(), Redactor::default());
        (store, service)
    }

    #[tokio::test]
    async fn test_persistence_error_hides_store_text() {
        let (store, service) = service();
        store.set_failing(true);

        let err = service
            .create_or_update_profile("a@b.com", "ext-1", None)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DataAccessError::Persistence(
                "Could not complete create_or_update_profile".to_string()
            )
        );
        assert!(!err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_validation_happens_before_store_access() {
        let (store, service) = service();

        assert!(service
            .get_profile_by_external_id("  ")
            .await
            .unwrap_err()
            .is_validation());
        assert!(service
            .create_chat_session(Some("nope"), None)
            .await
            .unwrap_err()
            .is_validation());
        assert!(service
            .update_chat_session("nope", vec![], None)
            .await
            .unwrap_err()
            .is_validation());
        assert!(service
            .create_or_update_subscription("nope", "sub_1", "cus_1", "active", Utc::now())
            .await
            .unwrap_err()
            .is_validation());
        assert!(service
            .cancel_subscription("")
            .await
            .unwrap_err()
            .is_validation());

        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_health_check() {
        let (store, service) = service();
        assert_eq!(
            service.health_check().await.status,
            crate::health::ComponentStatus::Healthy
        );
        store.set_failing(true);
        assert_eq!(
            service.health_check().await.status,
            crate::health::ComponentStatus::Unhealthy
        );
    }
}
