use crate::errors::sqlx_error_summary;
use crate::models;
use sqlx::PgPool;
use tracing::Instrument;

pub async fn upsert(
    pool: &PgPool,
    profile: &models::NewProfile,
) -> Result<models::Profile, sqlx::Error> {
    let query_span = tracing::info_span!("Upserting profile into the database");
    sqlx::query_as::<_, models::Profile>(
        r#"
        INSERT INTO profiles (clerk_id, email, name, created_at, updated_at)
        VALUES ($1, $2, $3, NOW(), NOW())
        ON CONFLICT (clerk_id)
        DO UPDATE SET
            email = EXCLUDED.email,
            name = COALESCE(EXCLUDED.name, profiles.name),
            updated_at = NOW()
        RETURNING id, clerk_id, email, name, created_at, updated_at
        "#,
    )
    .bind(&profile.clerk_id)
    .bind(&profile.email)
    .bind(&profile.name)
    .fetch_one(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to upsert profile: {}", sqlx_error_summary(&err));
        err
    })
}

pub async fn fetch_by_clerk_id(
    pool: &PgPool,
    clerk_id: &str,
) -> Result<Option<models::Profile>, sqlx::Error> {
    let query_span = tracing::info_span!("Fetch profile by external id.");
    sqlx::query_as::<_, models::Profile>(
        r#"
        SELECT id, clerk_id, email, name, created_at, updated_at
        FROM profiles
        WHERE clerk_id = $1
        LIMIT 1
        "#,
    )
    .bind(clerk_id)
    .fetch_optional(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch profile: {}", sqlx_error_summary(&err));
        err
    })
}
