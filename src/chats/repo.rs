use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

#[derive(Debug, Clone, FromRow)]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub text: String,
    pub created_at: OffsetDateTime,
}

/// Every message the user has sent or received, oldest first. One query;
/// the handler groups rows per counterpart in memory.
pub async fn list_for_user(db: &PgPool, user_id: i64) -> Result<Vec<Message>, sqlx::Error> {
    sqlx::query_as::<_, Message>(
        r#"
        SELECT id, sender_id, receiver_id, text, created_at
        FROM messages
        WHERE sender_id = $1 OR receiver_id = $1
        ORDER BY created_at, id
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn list_between(db: &PgPool, a: i64, b: i64) -> Result<Vec<Message>, sqlx::Error> {
    sqlx::query_as::<_, Message>(
        r#"
        SELECT id, sender_id, receiver_id, text, created_at
        FROM messages
        WHERE (sender_id = $1 AND receiver_id = $2)
           OR (sender_id = $2 AND receiver_id = $1)
        ORDER BY created_at, id
        "#,
    )
    .bind(a)
    .bind(b)
    .fetch_all(db)
    .await
}

pub async fn insert(
    db: &PgPool,
    sender_id: i64,
    receiver_id: i64,
    text: &str,
) -> Result<Message, sqlx::Error> {
    sqlx::query_as::<_, Message>(
        r#"
        INSERT INTO messages (sender_id, receiver_id, text)
        VALUES ($1, $2, $3)
        RETURNING id, sender_id, receiver_id, text, created_at
        "#,
    )
    .bind(sender_id)
    .bind(receiver_id)
    .bind(text)
    .fetch_one(db)
    .await
}
