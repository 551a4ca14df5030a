use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use time::OffsetDateTime;

use crate::users::dto::UpdateProfileRequest;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub time_credits: i64,
    pub bio: Option<String>,
    pub role: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub is_online: bool,
    pub last_seen: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

const USER_COLUMNS: &str = "id, username, email, password_hash, avatar, time_credits, \
     bio, role, location, website, is_online, last_seen, created_at";

pub async fn create(
    db: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
    avatar: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (username, email, password_hash, avatar)
        VALUES ($1, $2, $3, $4)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(avatar)
    .fetch_one(db)
    .await
}

pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(db)
    .await
}

pub async fn find_by_id(db: &PgPool, user_id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(user_id)
        .fetch_optional(db)
        .await
}

pub async fn exists(db: &PgPool, user_id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(user_id)
        .fetch_one(db)
        .await
}

pub async fn set_presence(db: &PgPool, user_id: i64, online: bool) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET is_online = $1, last_seen = now() WHERE id = $2")
        .bind(online)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(())
}

/// Balance change as one atomic statement; concurrent adds never lose
/// an update because the arithmetic happens inside the store.
pub async fn add_credits(
    db: &PgPool,
    user_id: i64,
    amount: i64,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET time_credits = time_credits + $1
        WHERE id = $2
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(amount)
    .bind(user_id)
    .fetch_optional(db)
    .await
}

/// The `time_credits >= $1` guard makes overdrafts impossible even under
/// concurrent spends; zero rows means the user is gone or the balance is
/// short, which the handler disambiguates.
pub async fn spend_credits(
    db: &PgPool,
    user_id: i64,
    amount: i64,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET time_credits = time_credits - $1
        WHERE id = $2 AND time_credits >= $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(amount)
    .bind(user_id)
    .fetch_optional(db)
    .await
}

/// Updates only the supplied profile columns. Callers must reject an
/// all-empty change set before getting here.
pub async fn update_profile(
    db: &PgPool,
    user_id: i64,
    changes: &UpdateProfileRequest,
) -> Result<Option<User>, sqlx::Error> {
    let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET ");
    {
        let mut sets = qb.separated(", ");
        if let Some(avatar) = &changes.avatar {
            sets.push("avatar = ").push_bind_unseparated(avatar.as_str());
        }
        if let Some(bio) = &changes.bio {
            sets.push("bio = ").push_bind_unseparated(bio.as_str());
        }
        if let Some(role) = &changes.role {
            sets.push("role = ").push_bind_unseparated(role.as_str());
        }
        if let Some(location) = &changes.location {
            sets.push("location = ").push_bind_unseparated(location.as_str());
        }
        if let Some(website) = &changes.website {
            sets.push("website = ").push_bind_unseparated(website.as_str());
        }
    }
    qb.push(" WHERE id = ").push_bind(user_id);
    qb.push(" RETURNING ").push(USER_COLUMNS);

    qb.build_query_as::<User>().fetch_optional(db).await
}
