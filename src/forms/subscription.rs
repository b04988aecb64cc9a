use crate::errors::DataAccessError;
use crate::models;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_valid::Validate;

use super::rules::{self, external_id, subscription_status};

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct SubscriptionForm {
    #[validate(
        pattern = r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$"
    )]
    pub profile_id: String,
    #[validate(custom(external_id))]
    pub stripe_subscription_id: String,
    #[validate(custom(external_id))]
    pub stripe_customer_id: String,
    #[validate(custom(subscription_status))]
    pub status: String,
    pub current_period_end: DateTime<Utc>,
}

impl TryFrom<&SubscriptionForm> for models::NewSubscription {
    type Error = DataAccessError;

    fn try_from(form: &SubscriptionForm) -> Result<Self, Self::Error> {
        let status = form
            .status
            .parse::<models::SubscriptionStatus>()
            .map_err(DataAccessError::Validation)?;

        Ok(models::NewSubscription {
            profile_id: rules::uuid("profile_id", &form.profile_id)?,
            stripe_subscription_id: form.stripe_subscription_id.clone(),
            stripe_customer_id: form.stripe_customer_id.clone(),
            status,
            current_period_end: form.current_period_end,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct SubscriptionLookup {
    #[validate(
        pattern = r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$"
    )]
    pub profile_id: String,
}

impl SubscriptionLookup {
    pub fn profile_id(&self) -> Result<uuid::Uuid, DataAccessError> {
        rules::uuid("profile_id", &self.profile_id)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct SubscriptionCancelForm {
    #[validate(custom(external_id))]
    pub stripe_subscription_id: String,
}

impl SubscriptionCancelForm {
    pub fn stripe_subscription_id(&self) -> &str {
        &self.stripe_subscription_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn form(status: &str) -> SubscriptionForm {
        SubscriptionForm {
            profile_id: "0b7a4c52-98d4-4a5e-8f3f-1d2a6c3e4b5f".to_string(),
            stripe_subscription_id: "sub_123".to_string(),
            stripe_customer_id: "cus_123".to_string(),
            status: status.to_string(),
            current_period_end: Utc.with_ymd_and_hms(2026, 11, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_subscription_form_status() {
        for status in ["active", "canceled", "past_due", "trialing"] {
            assert!(form(status).validate().is_ok(), "{}", status);
        }
        assert!(form("expired").validate().is_err());
        assert!(form("ACTIVE").validate().is_err());
    }

    #[test]
    fn test_subscription_form_ids() {
        let mut bad = form("active");
        bad.profile_id = "42".to_string();
        assert!(bad.validate().is_err());

        let mut bad = form("active");
        bad.stripe_customer_id = " ".to_string();
        assert!(bad.validate().is_err());

        let mut bad = form("active");
        bad.stripe_subscription_id = "sub_<123>".to_string();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_cancel_form_keeps_id_verbatim() {
        let cancel = SubscriptionCancelForm {
            stripe_subscription_id: "sub_1Nv0x".to_string(),
        };
        assert!(cancel.validate().is_ok());
        assert_eq!(cancel.stripe_subscription_id(), "sub_1Nv0x");

        let cancel = SubscriptionCancelForm {
            stripe_subscription_id: "sub_'1'".to_string(),
        };
        assert!(cancel.validate().is_err());
    }

    #[test]
    fn test_subscription_form_into_model() {
        let subscription = models::NewSubscription::try_from(&form("past_due")).unwrap();
        assert_eq!(subscription.status, models::SubscriptionStatus::PastDue);
        assert_eq!(subscription.stripe_subscription_id, "sub_123");
    }
}
