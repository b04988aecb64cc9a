use crate::errors::sqlx_error_summary;
use crate::models;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::Instrument;
use uuid::Uuid;

pub async fn insert(
    pool: &PgPool,
    session: &models::NewChatSession,
) -> Result<models::ChatSession, sqlx::Error> {
    let query_span = tracing::info_span!("Saving new chat session into the database");
    sqlx::query_as::<_, models::ChatSession>(
        r#"
        INSERT INTO chat_sessions (profile_id, messages, context, created_at, updated_at)
        VALUES ($1, '[]'::jsonb, $2, NOW(), NOW())
        RETURNING id, profile_id, messages, context, created_at, updated_at
        "#,
    )
    .bind(session.profile_id)
    .bind(Json(&session.context))
    .fetch_one(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to insert chat session: {}", sqlx_error_summary(&err));
        err
    })
}

pub async fn fetch(pool: &PgPool, id: Uuid) -> Result<Option<models::ChatSession>, sqlx::Error> {
    let query_span = tracing::info_span!("Fetch chat session by id.");
    sqlx::query_as::<_, models::ChatSession>(
        r#"
        SELECT id, profile_id, messages, context, created_at, updated_at
        FROM chat_sessions
        WHERE id = $1
        LIMIT 1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch chat session: {}", sqlx_error_summary(&err));
        err
    })
}

/// Replaces the messages. A supplied context is merged key by key into the
/// stored one (`jsonb ||`), a missing one leaves it as is.
pub async fn update(
    pool: &PgPool,
    update: &models::ChatSessionUpdate,
) -> Result<Option<models::ChatSession>, sqlx::Error> {
    let query_span = tracing::info_span!("Updating chat session");
    sqlx::query_as::<_, models::ChatSession>(
        r#"
        UPDATE chat_sessions
        SET
            messages = $2,
            context = COALESCE(context || $3::jsonb, context),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, profile_id, messages, context, created_at, updated_at
        "#,
    )
    .bind(update.id)
    .bind(Json(&update.messages))
    .bind(update.context.as_ref().map(Json))
    .fetch_optional(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to update chat session: {}", sqlx_error_summary(&err));
        err
    })
}
