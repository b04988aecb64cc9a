//! Input schemas, one module per entity. Every data access operation runs its
//! arguments through one of these before anything else happens, and API
//! handlers can deserialize request bodies straight into the same structs.

pub mod chat_session;
pub mod profile;
pub(crate) mod rules;
pub mod security_log;
pub mod subscription;

pub use chat_session::*;
pub use profile::*;
pub use security_log::*;
pub use subscription::*;
