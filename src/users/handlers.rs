use axum::{extract::State, Json};
use tracing::{info, instrument};

use crate::{
    auth::jwt::AuthUser,
    error::{ApiError, ApiResult},
    state::AppState,
    users::{
        dto::{AmountRequest, UpdateProfileRequest, UserView},
        repo,
    },
};

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser { id, .. }: AuthUser,
) -> ApiResult<Json<UserView>> {
    let user = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, changes))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser { id, .. }: AuthUser,
    Json(changes): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserView>> {
    if changes.is_empty() {
        return Err(ApiError::Validation("No fields to update"));
    }
    let user = repo::update_profile(&state.db, id, &changes)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;
    info!(user_id = id, "profile updated");
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn add_credits(
    State(state): State<AppState>,
    AuthUser { id, .. }: AuthUser,
    Json(payload): Json<AmountRequest>,
) -> ApiResult<Json<UserView>> {
    let amount = payload.validated()?;
    let user = repo::add_credits(&state.db, id, amount)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;
    info!(user_id = id, amount, balance = user.time_credits, "credits added");
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn spend_credits(
    State(state): State<AppState>,
    AuthUser { id, .. }: AuthUser,
    Json(payload): Json<AmountRequest>,
) -> ApiResult<Json<UserView>> {
    let amount = payload.validated()?;
    match repo::spend_credits(&state.db, id, amount).await? {
        Some(user) => {
            info!(user_id = id, amount, balance = user.time_credits, "credits spent");
            Ok(Json(user.into()))
        }
        // Zero rows: either the balance was short or the user row is gone.
        None => {
            if repo::exists(&state.db, id).await? {
                Err(ApiError::InsufficientCredits)
            } else {
                Err(ApiError::NotFound("User not found"))
            }
        }
    }
}
