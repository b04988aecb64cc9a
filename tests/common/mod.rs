#![allow(dead_code)]

use secure_store::configuration::{get_configuration, DatabaseSettings};
use secure_store::helpers::Redactor;
use secure_store::store::{MemoryStore, PgStore};
use secure_store::SecureDataAccess;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::sync::Arc;

pub struct TestApp {
    pub data_access: SecureDataAccess,
    pub store: Arc<MemoryStore>,
}

pub fn spawn_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let data_access = SecureDataAccess::new(store.clone(), Redactor::default());
    TestApp { data_access, store }
}

pub struct PgTestApp {
    pub data_access: SecureDataAccess,
    pub db_pool: PgPool,
}

/// Creates a throwaway database from `configuration.yaml`, or returns `None`
/// when Postgres is not reachable so the calling test can skip itself.
pub async fn spawn_pg_app() -> Option<PgTestApp> {
    let mut configuration = match get_configuration() {
        Ok(configuration) => configuration,
        Err(err) => {
            eprintln!("Skipping tests: failed to read configuration: {}", err);
            return None;
        }
    };
    configuration.database.database_name = uuid::Uuid::new_v4().to_string();

    let db_pool = match configure_database(&configuration.database).await {
        Ok(pool) => pool,
        Err(err) => {
            eprintln!("Skipping tests: failed to connect to postgres: {}", err);
            return None;
        }
    };

    let store = Arc::new(PgStore::new(db_pool.clone()));
    let data_access = SecureDataAccess::from_settings(store, &configuration);
    Some(PgTestApp {
        data_access,
        db_pool,
    })
}

pub async fn configure_database(config: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    let mut connection = PgConnection::connect(&config.connection_string_without_db()).await?;

    connection
        .execute(format!(r#"CREATE DATABASE "{}""#, config.database_name).as_str())
        .await?;

    let connection_pool = PgPool::connect(&config.connection_string()).await?;

    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await?;

    Ok(connection_pool)
}
