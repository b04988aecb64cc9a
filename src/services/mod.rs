mod secure_data;

pub use secure_data::SecureDataAccess;
