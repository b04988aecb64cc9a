//! Masking of values before they reach the logs.

use serde_json::{Map, Value};
use std::net::IpAddr;

use crate::configuration::default_log_value_max_length;

const MASK: &str = "***";

/// Keys whose values are never logged, matched case-insensitively as substrings.
const SENSITIVE_KEYS: &[&str] = &[
    "password",
    "token",
    "secret",
    "key",
    "authorization",
    "cookie",
    "email",
    "ip",
];

#[derive(Debug, Clone)]
pub struct Redactor {
    max_length: usize,
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new(default_log_value_max_length())
    }
}

impl Redactor {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    /// Cuts `value` down to the configured number of characters.
    pub fn truncate(&self, value: &str) -> String {
        if value.chars().count() <= self.max_length {
            return value.to_string();
        }
        let mut truncated: String = value.chars().take(self.max_length).collect();
        truncated.push_str("...");
        truncated
    }

    /// Keeps a short prefix of an identifier so log lines can still be correlated.
    pub fn identifier(&self, value: &str) -> String {
        let prefix: String = value.chars().take(4).collect();
        if value.chars().count() <= 4 {
            return MASK.to_string();
        }
        format!("{}{}", prefix, MASK)
    }

    pub fn email(&self, value: &str) -> String {
        match value.split_once('@') {
            Some((local, domain)) => {
                let first: String = local.chars().take(1).collect();
                format!("{}{}@{}", first, MASK, self.truncate(domain))
            }
            None => MASK.to_string(),
        }
    }

    /// IPv4 keeps the first three octets, IPv6 the first three groups.
    pub fn ip(&self, value: &str) -> String {
        match value.parse::<IpAddr>() {
            Ok(IpAddr::V4(addr)) => {
                let octets = addr.octets();
                format!("{}.{}.{}.{}", octets[0], octets[1], octets[2], MASK)
            }
            Ok(IpAddr::V6(addr)) => {
                let segments = addr.segments();
                format!(
                    "{:x}:{:x}:{:x}:{}",
                    segments[0], segments[1], segments[2], MASK
                )
            }
            Err(_) => MASK.to_string(),
        }
    }

    /// Copy of a detail map that is safe to log.
    pub fn details(&self, details: &Map<String, Value>) -> Value {
        Value::Object(
            details
                .iter()
                .map(|(key, value)| {
                    let redacted = if is_sensitive_key(key) {
                        Value::String(MASK.to_string())
                    } else {
                        self.value(value)
                    };
                    (key.clone(), redacted)
                })
                .collect(),
        )
    }

    fn value(&self, value: &Value) -> Value {
        match value {
            Value::String(s) => Value::String(self.truncate(s)),
            Value::Object(map) => self.details(map),
            Value::Array(items) => Value::Array(items.iter().map(|v| self.value(v)).collect()),
            other => other.clone(),
        }
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    SENSITIVE_KEYS.iter().any(|sensitive| key.contains(sensitive))
}
