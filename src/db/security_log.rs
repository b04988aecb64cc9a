use crate::errors::sqlx_error_summary;
use crate::models;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::Instrument;

pub async fn insert(
    pool: &PgPool,
    entry: &models::NewSecurityLogEntry,
) -> Result<models::SecurityLogEntry, sqlx::Error> {
    let query_span = tracing::info_span!("Saving security event into the database");
    sqlx::query_as::<_, models::SecurityLogEntry>(
        r#"
        INSERT INTO security_logs (event, ip_address, user_agent, user_id, details, created_at)
        VALUES ($1, $2, $3, $4, $5, NOW())
        RETURNING id, event, ip_address, user_agent, user_id, details, created_at
        "#,
    )
    .bind(&entry.event)
    .bind(&entry.ip_address)
    .bind(&entry.user_agent)
    .bind(entry.user_id)
    .bind(Json(&entry.details))
    .fetch_one(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to insert security event: {}", sqlx_error_summary(&err));
        err
    })
}
