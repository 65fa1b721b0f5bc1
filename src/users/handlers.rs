use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{CredentialsRequest, PublicUser};
use crate::{
    auth::{extractors::AuthUser, password::hash_password},
    error::{AppJson, AppResult},
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users", post(create_user).put(update_user))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CredentialsRequest>,
) -> AppResult<(StatusCode, Json<PublicUser>)> {
    let hash = hash_password(&payload.password)?;
    let user = state.db.create_user(&payload.email, &hash).await?;

    info!(user_id = user.id, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<CredentialsRequest>,
) -> AppResult<Json<PublicUser>> {
    let hash = hash_password(&payload.password)?;
    let user = state.db.update_user(user_id, &payload.email, &hash).await?;

    info!(user_id, "user updated");
    Ok(Json(user.into()))
}
