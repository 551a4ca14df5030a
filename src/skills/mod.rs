use axum::{
    routing::{get, put},
    Router,
};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        // public browse surface
        .route("/skills", get(handlers::list_all))
        .route("/skills/:id", get(handlers::get_by_id))
        // owner-scoped listings
        .route(
            "/user/skills",
            get(handlers::list_mine).post(handlers::create),
        )
        .route(
            "/user/skills/:id",
            put(handlers::update).delete(handlers::delete),
        )
}
