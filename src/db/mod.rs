pub mod chat_session;
pub mod profile;
pub mod security_log;
pub mod subscription;

use sqlx::PgPool;

pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1 as health_check")
        .execute(pool)
        .await
        .map(|_| ())
}
