pub mod redact;
pub mod sanitize;

pub use redact::Redactor;
