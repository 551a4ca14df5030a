use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::{
    auth::jwt::AuthUser,
    error::{ApiError, ApiResult},
    skills::{
        dto::{CreateSkillRequest, SkillView, SkillWithOwnerView, UpdateSkillRequest},
        repo,
    },
    state::AppState,
};

#[instrument(skip(state))]
pub async fn list_all(State(state): State<AppState>) -> ApiResult<Json<Vec<SkillWithOwnerView>>> {
    let skills = repo::list_all(&state.db).await?;
    Ok(Json(skills.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<SkillWithOwnerView>> {
    let skill = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Skill not found"))?;
    Ok(Json(skill.into()))
}

#[instrument(skip(state))]
pub async fn list_mine(
    State(state): State<AppState>,
    AuthUser { id, .. }: AuthUser,
) -> ApiResult<Json<Vec<SkillView>>> {
    let skills = repo::list_by_user(&state.db, id).await?;
    Ok(Json(skills.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser { id, .. }: AuthUser,
    Json(payload): Json<CreateSkillRequest>,
) -> ApiResult<(StatusCode, Json<SkillView>)> {
    let new_skill = payload.validated()?;
    let skill = repo::create(&state.db, id, &new_skill).await?;
    info!(user_id = id, skill_id = skill.id, "skill created");
    Ok((StatusCode::CREATED, Json(skill.into())))
}

#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    AuthUser { id: user_id, .. }: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateSkillRequest>,
) -> ApiResult<Json<SkillView>> {
    payload.validated()?;
    let skill = repo::update(&state.db, id, user_id, &payload)
        .await?
        .ok_or(ApiError::NotFoundOrUnauthorized("Skill not found"))?;
    info!(user_id, skill_id = id, "skill updated");
    Ok(Json(skill.into()))
}

#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    AuthUser { id: user_id, .. }: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let removed = repo::delete(&state.db, id, user_id).await?;
    if removed == 0 {
        return Err(ApiError::NotFoundOrUnauthorized("Skill not found"));
    }
    info!(user_id, skill_id = id, "skill deleted");
    Ok(Json(json!({ "message": "Skill deleted successfully" })))
}
