use thiserror::Error;

/// Errors returned to callers of the data access layer.
///
/// `Validation` messages describe what was wrong with the input and are safe to
/// show to end users. `Persistence` messages only name the failed operation,
/// the underlying store error is logged and never propagated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataAccessError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl DataAccessError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

impl From<serde_valid::validation::Errors> for DataAccessError {
    fn from(errors: serde_valid::validation::Errors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// Failures reported by a [`crate::store::Store`] implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Log-safe description of the failure.
    pub fn summary(&self) -> String {
        match self {
            Self::Database(err) => sqlx_error_summary(err),
            Self::Backend(message) => message.clone(),
        }
    }
}

/// Describes a `sqlx` error without its message or detail text.
///
/// Postgres puts offending values into both (`Key (clerk_id)=(...) already
/// exists`, `invalid input syntax for type uuid: "..."`), so only the SQLSTATE
/// code, error kind and constraint name are kept.
pub fn sqlx_error_summary(err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db) => format!(
            "database error code={} kind={:?} constraint={}",
            db.code().as_deref().unwrap_or("unknown"),
            db.kind(),
            db.constraint().unwrap_or("none"),
        ),
        sqlx::Error::Io(io) => format!("io error kind={:?}", io.kind()),
        sqlx::Error::RowNotFound => "row not found".to_string(),
        sqlx::Error::PoolTimedOut => "pool timed out".to_string(),
        sqlx::Error::PoolClosed => "pool closed".to_string(),
        sqlx::Error::Tls(_) => "tls error".to_string(),
        sqlx::Error::Configuration(_) => "configuration error".to_string(),
        sqlx::Error::ColumnDecode { index, .. } => format!("failed to decode column {}", index),
        sqlx::Error::Decode(_) | sqlx::Error::Encode(_) => "value conversion error".to_string(),
        sqlx::Error::Protocol(_) => "protocol error".to_string(),
        _ => "unexpected database driver error".to_string(),
    }
}
