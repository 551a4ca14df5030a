use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use time::OffsetDateTime;

use crate::skills::dto::{NewSkill, UpdateSkillRequest};

#[derive(Debug, Clone, FromRow)]
pub struct Skill {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub hours: f64,
    pub user_id: i64,
    pub created_at: OffsetDateTime,
}

/// Skill row joined with its owner's public profile fields.
#[derive(Debug, Clone, FromRow)]
pub struct SkillWithOwner {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub hours: f64,
    pub user_id: i64,
    pub created_at: OffsetDateTime,
    pub owner_name: String,
    pub owner_avatar: Option<String>,
    pub owner_online: bool,
}

const SKILL_COLUMNS: &str = "id, title, description, category, hours, user_id, created_at";

const JOINED_SELECT: &str = r#"
    SELECT s.id, s.title, s.description, s.category, s.hours, s.user_id, s.created_at,
           u.username AS owner_name, u.avatar AS owner_avatar, u.is_online AS owner_online
    FROM skills s
    JOIN users u ON u.id = s.user_id
"#;

pub async fn list_all(db: &PgPool) -> Result<Vec<SkillWithOwner>, sqlx::Error> {
    sqlx::query_as::<_, SkillWithOwner>(&format!("{JOINED_SELECT} ORDER BY s.created_at DESC"))
        .fetch_all(db)
        .await
}

pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Option<SkillWithOwner>, sqlx::Error> {
    sqlx::query_as::<_, SkillWithOwner>(&format!("{JOINED_SELECT} WHERE s.id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn list_by_user(db: &PgPool, user_id: i64) -> Result<Vec<Skill>, sqlx::Error> {
    sqlx::query_as::<_, Skill>(&format!(
        "SELECT {SKILL_COLUMNS} FROM skills WHERE user_id = $1 ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn create(db: &PgPool, user_id: i64, skill: &NewSkill) -> Result<Skill, sqlx::Error> {
    sqlx::query_as::<_, Skill>(&format!(
        r#"
        INSERT INTO skills (title, description, category, hours, user_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {SKILL_COLUMNS}
        "#
    ))
    .bind(&skill.title)
    .bind(&skill.description)
    .bind(&skill.category)
    .bind(skill.hours)
    .bind(user_id)
    .fetch_one(db)
    .await
}

/// Touches only the supplied columns; the WHERE clause carries both the
/// target id and the owner id, so a miss and a foreign row look the same.
pub async fn update(
    db: &PgPool,
    id: i64,
    user_id: i64,
    changes: &UpdateSkillRequest,
) -> Result<Option<Skill>, sqlx::Error> {
    let mut qb = QueryBuilder::<Postgres>::new("UPDATE skills SET ");
    {
        let mut sets = qb.separated(", ");
        if let Some(title) = &changes.title {
            sets.push("title = ").push_bind_unseparated(title.as_str());
        }
        if let Some(description) = &changes.description {
            sets.push("description = ")
                .push_bind_unseparated(description.as_str());
        }
        if let Some(category) = &changes.category {
            sets.push("category = ")
                .push_bind_unseparated(category.as_str());
        }
        if let Some(hours) = changes.hours {
            sets.push("hours = ").push_bind_unseparated(hours);
        }
    }
    qb.push(" WHERE id = ").push_bind(id);
    qb.push(" AND user_id = ").push_bind(user_id);
    qb.push(" RETURNING ").push(SKILL_COLUMNS);

    qb.build_query_as::<Skill>().fetch_optional(db).await
}

/// Returns the number of rows removed; zero means missing or not owned.
pub async fn delete(db: &PgPool, id: i64, user_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM skills WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
