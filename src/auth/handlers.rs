use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use time::Duration;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, RefreshResponse},
        extractors::RefreshUser,
        jwt::{JwtKeys, TokenKind},
        password::verify_password,
    },
    db::DbError,
    error::{AppError, AppJson, AppResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/revoke", post(revoke))
}

/// Access token lifetime for a login, honoring a requested shorter expiry.
fn access_ttl(keys: &JwtKeys, requested_secs: Option<i64>) -> Duration {
    match requested_secs {
        Some(secs) if secs > 0 && Duration::seconds(secs) <= keys.access_ttl => {
            Duration::seconds(secs)
        }
        _ => keys.access_ttl,
    }
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = match state.db.get_user_by_email(&payload.email).await {
        Ok(u) => u,
        Err(DbError::NotFound(_)) => {
            warn!(email = %payload.email, "login unknown email");
            return Err(AppError::Unauthorized("Invalid credentials"));
        }
        Err(e) => return Err(e.into()),
    };

    if !verify_password(&payload.password, &user.hashed_password)? {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::Unauthorized("Invalid credentials"));
    }

    let keys = &state.jwt;
    let ttl = access_ttl(keys, payload.expires_in_seconds);
    let token = keys.sign(user.id, TokenKind::Access, ttl)?;
    let refresh_token = keys.sign_refresh(user.id)?;

    info!(user_id = user.id, "user logged in");
    Ok(Json(LoginResponse {
        id: user.id,
        email: user.email,
        token,
        refresh_token,
    }))
}

#[instrument(skip_all)]
pub async fn refresh(
    State(state): State<AppState>,
    RefreshUser { user_id, token }: RefreshUser,
) -> AppResult<Json<RefreshResponse>> {
    if state.db.is_token_revoked(&token).await? {
        warn!(user_id, "refresh with revoked token");
        return Err(AppError::Unauthorized("Refresh token is revoked"));
    }
    match state.db.get_user(user_id).await {
        Ok(_) => {}
        Err(DbError::NotFound(_)) => return Err(AppError::Unauthorized("User not found")),
        Err(e) => return Err(e.into()),
    }

    let token = state.jwt.sign_access(user_id)?;
    info!(user_id, "access token refreshed");
    Ok(Json(RefreshResponse { token }))
}

#[instrument(skip_all)]
pub async fn revoke(
    State(state): State<AppState>,
    RefreshUser { user_id, token }: RefreshUser,
) -> AppResult<StatusCode> {
    state.db.revoke_token(&token).await?;
    info!(user_id, "refresh token revoked");
    Ok(StatusCode::OK)
}
