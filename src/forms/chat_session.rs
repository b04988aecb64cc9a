use crate::errors::DataAccessError;
use crate::models;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_valid::Validate;

use super::rules::{self, present_messages};

#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
pub struct ChatSessionForm {
    #[validate(
        pattern = r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$"
    )]
    pub profile_id: Option<String>,
    pub context: Option<models::ChatContext>,
}

impl TryFrom<&ChatSessionForm> for models::NewChatSession {
    type Error = DataAccessError;

    fn try_from(form: &ChatSessionForm) -> Result<Self, Self::Error> {
        Ok(models::NewChatSession {
            profile_id: rules::optional_uuid("profile_id", form.profile_id.as_deref())?,
            context: form.context.clone().unwrap_or_default(),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct ChatSessionLookup {
    #[validate(
        pattern = r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$"
    )]
    pub session_id: String,
}

impl ChatSessionLookup {
    pub fn session_id(&self) -> Result<uuid::Uuid, DataAccessError> {
        rules::uuid("session_id", &self.session_id)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct ChatSessionUpdateForm {
    #[validate(
        pattern = r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$"
    )]
    pub session_id: String,
    #[validate(custom(present_messages))]
    pub messages: Vec<Value>,
    pub context: Option<models::ChatContext>,
}

impl TryFrom<ChatSessionUpdateForm> for models::ChatSessionUpdate {
    type Error = DataAccessError;

    fn try_from(form: ChatSessionUpdateForm) -> Result<Self, Self::Error> {
        Ok(models::ChatSessionUpdate {
            id: rules::uuid("session_id", &form.session_id)?,
            messages: form.messages,
            context: form.context,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SESSION_ID: &str = "6f1c1f0e-1a5b-4c8e-9d55-0c3f2f1c9a01";

    #[test]
    fn test_chat_session_form() {
        let form = ChatSessionForm::default();
        assert!(form.validate().is_ok());
        let session = models::NewChatSession::try_from(&form).unwrap();
        assert!(session.profile_id.is_none());
        assert!(session.context.is_empty());

        let form = ChatSessionForm {
            profile_id: Some("1234".to_string()),
            context: None,
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_chat_session_form_from_json() {
        let form: ChatSessionForm = serde_json::from_value(json!({
            "profile_id": SESSION_ID,
            "context": { "page": "pricing" }
        }))
        .unwrap();
        assert!(form.validate().is_ok());
        let session = models::NewChatSession::try_from(&form).unwrap();
        assert_eq!(session.profile_id.unwrap().to_string(), SESSION_ID);
        assert_eq!(session.context["page"], json!("pricing"));

        // context must be a string keyed map
        let parsed: Result<ChatSessionForm, _> =
            serde_json::from_value(json!({ "context": ["not", "a", "map"] }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_chat_session_lookup_rejects_malformed_ids() {
        for bad in ["", "abc", "6f1c1f0e-1a5b-4c8e-9d55-0c3f2f1c9a0", "' OR 1=1 --"] {
            let lookup = ChatSessionLookup {
                session_id: bad.to_string(),
            };
            assert!(lookup.validate().is_err(), "{}", bad);
        }
        let lookup = ChatSessionLookup {
            session_id: SESSION_ID.to_string(),
        };
        assert!(lookup.validate().is_ok());
        assert_eq!(lookup.session_id().unwrap().to_string(), SESSION_ID);
    }

    #[test]
    fn test_chat_session_update_form() {
        let form = ChatSessionUpdateForm {
            session_id: SESSION_ID.to_string(),
            messages: vec![json!({"role": "user", "content": "hi"}), Value::Null],
            context: None,
        };
        assert!(form.validate().is_err());

        let form = ChatSessionUpdateForm {
            session_id: SESSION_ID.to_string(),
            messages: vec![json!({"role": "user", "content": "hi"})],
            context: None,
        };
        assert!(form.validate().is_ok());
        let update = models::ChatSessionUpdate::try_from(form).unwrap();
        assert_eq!(update.messages.len(), 1);
        assert!(update.context.is_none());
    }
}
