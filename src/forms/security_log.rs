use crate::errors::DataAccessError;
use crate::helpers::sanitize;
use crate::models;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_valid::Validate;

use super::rules::{self, event_name, ip_address};

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct SecurityLogForm {
    #[validate(custom(event_name))]
    pub event: String,
    #[validate(custom(ip_address))]
    pub ip: String,
    #[validate(custom(rules::user_agent))]
    pub user_agent: Option<String>,
    #[validate(
        pattern = r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$"
    )]
    pub user_id: Option<String>,
    pub details: Option<Map<String, Value>>,
}

impl TryFrom<&SecurityLogForm> for models::NewSecurityLogEntry {
    type Error = DataAccessError;

    fn try_from(form: &SecurityLogForm) -> Result<Self, Self::Error> {
        Ok(models::NewSecurityLogEntry {
            event: sanitize::text(&form.event),
            ip_address: form.ip.trim().to_string(),
            user_agent: sanitize::optional_text(form.user_agent.as_deref()),
            user_id: rules::optional_uuid("user_id", form.user_id.as_deref())?,
            details: form.details.clone().unwrap_or_default(),
        })
    }
}
