use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use serde_valid::validation::Error;
use std::net::IpAddr;

use crate::errors::DataAccessError;
use crate::models::SubscriptionStatus;
use uuid::Uuid;

const EMAIL_MAX_LENGTH: usize = 254;
const PROFILE_NAME_MAX_CHARS: usize = 100;
const EVENT_MAX_CHARS: usize = 100;
const USER_AGENT_MAX_CHARS: usize = 500;

lazy_static! {
    // RFC 5322 dot-atom local part, hostname labels, at least one dot in the domain
    static ref EMAIL: Regex = Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$"
    )
    .unwrap();

    // Clerk user ids, Stripe object ids and similar keys. Stored verbatim, so
    // nothing the text scrubber would strip is allowed in.
    static ref EXTERNAL_ID: Regex =
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.:@|+=-]{0,254}$").unwrap();
}

pub fn email_address(value: &str) -> Result<(), Error> {
    if value.len() > EMAIL_MAX_LENGTH || !EMAIL.is_match(value) {
        return Err(Error::Custom("Invalid email address".to_string()));
    }
    Ok(())
}

pub fn external_id(value: &str) -> Result<(), Error> {
    if !EXTERNAL_ID.is_match(value) {
        return Err(Error::Custom(
            "Identifier must be 1-255 characters of letters, digits or _.:@|+=-".to_string(),
        ));
    }
    Ok(())
}

// Postgres VARCHAR(n) limits count code points, not grapheme clusters.
fn within_chars(value: &str, max: usize) -> Result<(), Error> {
    if value.chars().count() > max {
        return Err(Error::Custom(format!(
            "Value must be at most {} characters",
            max
        )));
    }
    Ok(())
}

pub fn profile_name(value: &Option<String>) -> Result<(), Error> {
    value
        .as_deref()
        .map_or(Ok(()), |name| within_chars(name, PROFILE_NAME_MAX_CHARS))
}

pub fn event_name(value: &str) -> Result<(), Error> {
    not_blank(value)?;
    within_chars(value, EVENT_MAX_CHARS)
}

pub fn user_agent(value: &Option<String>) -> Result<(), Error> {
    value
        .as_deref()
        .map_or(Ok(()), |agent| within_chars(agent, USER_AGENT_MAX_CHARS))
}

pub fn not_blank(value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::Custom("Value must not be blank".to_string()));
    }
    Ok(())
}

pub fn ip_address(value: &str) -> Result<(), Error> {
    value
        .parse::<IpAddr>()
        .map(|_| ())
        .map_err(|_| Error::Custom("Invalid IP address".to_string()))
}

pub fn subscription_status(value: &str) -> Result<(), Error> {
    value
        .parse::<SubscriptionStatus>()
        .map(|_| ())
        .map_err(|_| {
            Error::Custom("Status must be one of active, canceled, past_due, trialing".to_string())
        })
}

pub fn present_messages(messages: &[Value]) -> Result<(), Error> {
    if messages.iter().any(Value::is_null) {
        return Err(Error::Custom("Messages must not contain null entries".to_string()));
    }
    Ok(())
}

/// Parses an identifier the schema pattern already accepted.
pub(crate) fn uuid(field: &str, value: &str) -> Result<Uuid, DataAccessError> {
    Uuid::parse_str(value)
        .map_err(|_| DataAccessError::Validation(format!("{}: Invalid UUID", field)))
}

pub(crate) fn optional_uuid(field: &str, value: Option<&str>) -> Result<Option<Uuid>, DataAccessError> {
    value.map(|v| uuid(field, v)).transpose()
}
