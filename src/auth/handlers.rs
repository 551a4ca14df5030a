use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, SignupRequest},
        jwt::{AuthUser, JwtKeys},
        password::{hash_password, verify_password},
    },
    error::{is_unique_violation, ApiError, ApiResult},
    state::AppState,
    users::repo,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let username = payload
        .username
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    let email = payload
        .email
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_lowercase();
    let password = payload.password.unwrap_or_default();

    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(ApiError::Validation("All fields are required"));
    }
    if !is_valid_email(&email) {
        warn!(%email, "signup with invalid email");
        return Err(ApiError::Validation("Invalid email"));
    }
    if password.len() < 8 {
        return Err(ApiError::Validation("Password too short"));
    }

    let hash = hash_password(&password)?;
    let avatar = format!("https://api.dicebear.com/7.x/avataaars/svg?seed={username}");

    let user = match repo::create(&state.db, &username, &email, &hash, &avatar).await {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => {
            warn!(%username, %email, "signup duplicate user");
            return Err(ApiError::DuplicateUser);
        }
        Err(e) => return Err(e.into()),
    };

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.username)?;

    info!(user_id = user.id, %username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully".into(),
            token,
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let email = payload
        .email
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_lowercase();
    let password = payload.password.unwrap_or_default();

    let Some(mut user) = repo::find_by_email(&state.db, &email).await? else {
        warn!(%email, "login unknown email");
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(&password, &user.password_hash)? {
        warn!(user_id = user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    repo::set_presence(&state.db, user.id, true).await?;
    user.is_online = true;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.username)?;

    info!(user_id = user.id, "user logged in");
    Ok(Json(AuthResponse {
        message: "Login successful".into(),
        token,
        user: user.into(),
    }))
}

#[instrument(skip(state))]
pub async fn logout(
    State(state): State<AppState>,
    AuthUser { id, .. }: AuthUser,
) -> ApiResult<Json<Value>> {
    repo::set_presence(&state.db, id, false).await?;
    info!(user_id = id, "user logged out");
    Ok(Json(json!({ "message": "Logout successful" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@x.com"));
        assert!(!is_valid_email(""));
    }
}
