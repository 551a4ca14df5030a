use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::instrument;

use crate::{error::ApiResult, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/stats", get(get_stats))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_users: i64,
    pub total_skills: i64,
    pub online_users: i64,
}

#[instrument(skip(state))]
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<Json<StatsResponse>> {
    let total_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&state.db)
        .await?;
    let total_skills: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM skills")
        .fetch_one(&state.db)
        .await?;
    let online_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE is_online")
        .fetch_one(&state.db)
        .await?;

    Ok(Json(StatsResponse {
        total_users,
        total_skills,
        online_users,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_serialize_camel_case() {
        let json = serde_json::to_value(StatsResponse {
            total_users: 3,
            total_skills: 5,
            online_users: 1,
        })
        .unwrap();
        assert_eq!(json["totalUsers"], 3);
        assert_eq!(json["totalSkills"], 5);
        assert_eq!(json["onlineUsers"], 1);
    }
}
