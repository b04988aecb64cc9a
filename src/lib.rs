pub mod configuration;
pub mod db;
pub mod errors;
pub mod forms;
pub mod health;
pub mod helpers;
pub mod models;
pub mod services;
pub mod store;
pub mod telemetry;

pub use errors::{DataAccessError, StoreError};
pub use services::SecureDataAccess;
