//! User rows keyed by identity-provider subject

use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::VerifiedToken;
use crate::domain::user::User;

/// Finds or creates the application user for a verified token. The email is
/// refreshed from the token on every request; role changes are left alone.
pub async fn upsert(pool: &PgPool, token: &VerifiedToken) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (id, subject, email, role, created_at, updated_at)
         VALUES ($1, $2, $3, 'customer', NOW(), NOW())
         ON CONFLICT (subject) DO UPDATE SET email = EXCLUDED.email, updated_at = NOW()
         RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(&token.subject)
    .bind(&token.email)
    .fetch_one(pool)
    .await
}
