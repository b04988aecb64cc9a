use crate::errors::sqlx_error_summary;
use crate::models;
use sqlx::PgPool;
use tracing::Instrument;
use uuid::Uuid;

pub async fn upsert(
    pool: &PgPool,
    subscription: &models::NewSubscription,
) -> Result<models::Subscription, sqlx::Error> {
    let query_span = tracing::info_span!("Upserting subscription into the database");
    sqlx::query_as::<_, models::Subscription>(
        r#"
        INSERT INTO subscriptions (
            profile_id, stripe_subscription_id, stripe_customer_id,
            status, current_period_end, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
        ON CONFLICT (stripe_subscription_id)
        DO UPDATE SET
            status = EXCLUDED.status,
            current_period_end = EXCLUDED.current_period_end,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(subscription.profile_id)
    .bind(&subscription.stripe_subscription_id)
    .bind(&subscription.stripe_customer_id)
    .bind(subscription.status)
    .bind(subscription.current_period_end)
    .fetch_one(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to upsert subscription: {}", sqlx_error_summary(&err));
        err
    })
}

pub async fn fetch_active_by_profile(
    pool: &PgPool,
    profile_id: Uuid,
) -> Result<Option<models::Subscription>, sqlx::Error> {
    let query_span = tracing::info_span!("Fetch active subscription by profile id.");
    sqlx::query_as::<_, models::Subscription>(
        r#"
        SELECT *
        FROM subscriptions
        WHERE profile_id = $1
        AND status = 'active'
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(profile_id)
    .fetch_optional(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch active subscription: {}", sqlx_error_summary(&err));
        err
    })
}

pub async fn cancel(
    pool: &PgPool,
    stripe_subscription_id: &str,
) -> Result<Option<models::Subscription>, sqlx::Error> {
    let query_span = tracing::info_span!("Canceling subscription");
    sqlx::query_as::<_, models::Subscription>(
        r#"
        UPDATE subscriptions
        SET
            status = 'canceled',
            updated_at = NOW()
        WHERE stripe_subscription_id = $1
        RETURNING *
        "#,
    )
    .bind(stripe_subscription_id)
    .fetch_optional(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to cancel subscription: {}", sqlx_error_summary(&err));
        err
    })
}
