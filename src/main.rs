use anyhow::Context;
use clap::{Parser, Subcommand};
use secure_store::configuration::get_configuration;
use secure_store::store::PgStore;
use secure_store::telemetry::{get_subscriber, init_subscriber};
use secure_store::SecureDataAccess;
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;

/// Maintenance commands for the secure data store
#[derive(Parser, Debug)]
#[command(name = "secure-store", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Check database connectivity
    Health,
    /// Look up a profile by its identity provider id
    Profile {
        #[arg(long)]
        external_id: String,
    },
    /// Show the newest active subscription of a profile
    ActiveSubscription {
        #[arg(long)]
        profile_id: String,
    },
    /// Mark a subscription as canceled
    CancelSubscription {
        #[arg(long)]
        stripe_subscription_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = get_configuration().context("Failed to read configuration.")?;
    let subscriber = get_subscriber(settings.application_name.clone(), settings.log_level.clone());
    init_subscriber(subscriber)?;

    tracing::info!(
        db_host = %settings.database.host,
        db_port = settings.database.port,
        db_name = %settings.database.database_name,
        "Connecting to PostgreSQL"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(settings.database.max_connections)
        .acquire_timeout(Duration::from_secs(settings.database.acquire_timeout_secs))
        .connect_with(settings.database.connect_options())
        .await
        .context("Failed to connect to database.")?;

    let store = Arc::new(PgStore::new(pg_pool.clone()));
    let data_access = SecureDataAccess::from_settings(store, &settings);

    match cli.command {
        Commands::Migrate => {
            sqlx::migrate!("./migrations")
                .run(&pg_pool)
                .await
                .context("Failed to run migrations.")?;
            tracing::info!("Migrations applied");
        }
        Commands::Health => {
            let health = data_access.health_check().await;
            print_json(&health)?;
            if !health.is_healthy() {
                anyhow::bail!("database is {:?}", health.status);
            }
        }
        Commands::Profile { external_id } => {
            let profile = data_access.get_profile_by_external_id(&external_id).await?;
            print_json(&profile)?;
        }
        Commands::ActiveSubscription { profile_id } => {
            let subscription = data_access.get_active_subscription(&profile_id).await?;
            print_json(&subscription)?;
        }
        Commands::CancelSubscription {
            stripe_subscription_id,
        } => {
            let subscription = data_access
                .cancel_subscription(&stripe_subscription_id)
                .await?;
            if subscription.is_none() {
                anyhow::bail!("no subscription matches the given id");
            }
            print_json(&subscription)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
