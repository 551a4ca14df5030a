use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user", get(handlers::get_profile).put(handlers::update_profile))
        .route("/user/credits/add", post(handlers::add_credits))
        .route("/user/credits/spend", post(handlers::spend_credits))
}
