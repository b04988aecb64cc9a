mod chat_session;
mod profile;
mod security_log;
mod subscription;

pub use chat_session::*;
pub use profile::*;
pub use security_log::*;
pub use subscription::*;
