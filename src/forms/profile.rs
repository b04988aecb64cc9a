use crate::helpers::sanitize;
use crate::models;
use serde::{Deserialize, Serialize};
use serde_valid::Validate;

use super::rules::{email_address, external_id, profile_name};

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct ProfileForm {
    #[validate(custom(email_address))]
    pub email: String,
    #[validate(custom(external_id))]
    pub clerk_id: String,
    #[validate(custom(profile_name))]
    pub name: Option<String>,
}

impl From<&ProfileForm> for models::NewProfile {
    fn from(form: &ProfileForm) -> Self {
        models::NewProfile {
            clerk_id: form.clerk_id.clone(),
            email: sanitize::email(&form.email),
            name: sanitize::optional_text(form.name.as_deref()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct ProfileLookup {
    #[validate(custom(external_id))]
    pub clerk_id: String,
}

impl ProfileLookup {
    pub fn clerk_id(&self) -> &str {
        &self.clerk_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(email: &str, clerk_id: &str, name: Option<&str>) -> ProfileForm {
        ProfileForm {
            email: email.to_string(),
            clerk_id: clerk_id.to_string(),
            name: name.map(str::to_string),
        }
    }

    #[test]
    fn test_profile_form_validation() {
        assert!(form("a@b.com", "user_1", None).validate().is_ok());
        assert!(form("a@b.com", "user_1", Some("Ann")).validate().is_ok());
        assert!(form("not-an-email", "user_1", None).validate().is_err());
        assert!(form("a@b.com", "", None).validate().is_err());
        assert!(form("a@b.com", "   ", None).validate().is_err());
        assert!(form("a@b.com", "user<1>", None).validate().is_err());
        assert!(form("o'neil@example.org", "user_1", None).validate().is_ok());

        let long_name = "n".repeat(101);
        assert!(form("a@b.com", "user_1", Some(&long_name)).validate().is_err());
        let max_name = "n".repeat(100);
        assert!(form("a@b.com", "user_1", Some(&max_name)).validate().is_ok());
    }

    #[test]
    fn test_profile_form_sanitizes() {
        let profile: models::NewProfile =
            (&form("o'neil@b.com", "user_1", Some("<i>Ann</i>"))).into();
        assert_eq!(profile.email, "o'neil@b.com");
        assert_eq!(profile.clerk_id, "user_1");
        assert_eq!(profile.name.as_deref(), Some("iAnn/i"));
    }

    #[test]
    fn test_profile_lookup() {
        let lookup = ProfileLookup {
            clerk_id: "".to_string(),
        };
        assert!(lookup.validate().is_err());

        let lookup = ProfileLookup {
            clerk_id: "user_2abc".to_string(),
        };
        assert!(lookup.validate().is_ok());
        assert_eq!(lookup.clerk_id(), "user_2abc");
    }
}
