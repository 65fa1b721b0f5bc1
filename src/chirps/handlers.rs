use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::CreateChirpRequest;
use crate::{
    auth::extractors::AuthUser,
    db::Chirp,
    error::{AppError, AppJson, AppPath, AppResult},
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/chirps", get(list_chirps))
        .route("/chirps/:id", get(get_chirp))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/chirps", post(create_chirp))
        .route("/chirps/:id", delete(delete_chirp))
}

#[instrument(skip(state))]
pub async fn list_chirps(State(state): State<AppState>) -> AppResult<Json<Vec<Chirp>>> {
    Ok(Json(state.db.get_chirps().await?))
}

#[instrument(skip(state))]
pub async fn get_chirp(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<Chirp>> {
    Ok(Json(state.db.get_chirp(id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_chirp(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<CreateChirpRequest>,
) -> AppResult<(StatusCode, HeaderMap, Json<Chirp>)> {
    let chirp = state.db.create_chirp(&payload.body, user_id).await?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = HeaderValue::from_str(&format!("/api/chirps/{}", chirp.id)) {
        headers.insert(header::LOCATION, location);
    }

    info!(chirp_id = chirp.id, user_id, "chirp created");
    Ok((StatusCode::CREATED, headers, Json(chirp)))
}

#[instrument(skip(state))]
pub async fn delete_chirp(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<i64>,
) -> AppResult<StatusCode> {
    let chirp = state.db.get_chirp(id).await?;
    if chirp.author_id != user_id {
        warn!(chirp_id = id, user_id, author_id = chirp.author_id, "delete by non-author");
        return Err(AppError::Forbidden("You can't delete this chirp"));
    }

    state.db.delete_chirp(id).await?;
    info!(chirp_id = id, user_id, "chirp deleted");
    Ok(StatusCode::OK)
}
