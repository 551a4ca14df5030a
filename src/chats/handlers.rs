use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument};

use crate::{
    auth::jwt::AuthUser,
    chats::{
        dto::{group_by_partner, MessageView, SendMessageRequest},
        repo,
    },
    error::{is_foreign_key_violation, ApiError, ApiResult},
    state::AppState,
};

#[instrument(skip(state))]
pub async fn list_conversations(
    State(state): State<AppState>,
    AuthUser { id, .. }: AuthUser,
) -> ApiResult<Json<BTreeMap<i64, Vec<MessageView>>>> {
    let messages = repo::list_for_user(&state.db, id).await?;
    Ok(Json(group_by_partner(id, messages)))
}

#[instrument(skip(state))]
pub async fn list_with(
    State(state): State<AppState>,
    AuthUser { id, .. }: AuthUser,
    Path(other_id): Path<i64>,
) -> ApiResult<Json<Vec<MessageView>>> {
    let messages = repo::list_between(&state.db, id, other_id).await?;
    let views = messages
        .into_iter()
        .map(|m| MessageView::tagged(m, id))
        .collect();
    Ok(Json(views))
}

#[instrument(skip(state, payload))]
pub async fn send(
    State(state): State<AppState>,
    AuthUser { id, .. }: AuthUser,
    Path(other_id): Path<i64>,
    Json(payload): Json<SendMessageRequest>,
) -> ApiResult<Json<MessageView>> {
    let text = payload.text.as_deref().map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(ApiError::Validation("Message text is required"));
    }

    let message = match repo::insert(&state.db, id, other_id, text).await {
        Ok(message) => message,
        Err(e) if is_foreign_key_violation(&e) => {
            return Err(ApiError::NotFound("User not found"));
        }
        Err(e) => return Err(e.into()),
    };

    info!(sender_id = id, receiver_id = other_id, "message sent");
    Ok(Json(MessageView::tagged(message, id)))
}
