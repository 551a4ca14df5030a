use axum::{routing::get, Router};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chats", get(handlers::list_conversations))
        .route(
            "/chats/:user_id",
            get(handlers::list_with).post(handlers::send),
        )
}
