use axum::Json;
use axum::extract::{Path, State};

use crate::app::AppState;
use crate::data::models::*;
use crate::handlers::extractors::ApiJson;

pub async fn list_favorites(State(state): State<AppState>) -> Json<FavoriteList> {
    let favorites = state.favorites.all();
    Json(FavoriteList {
        total: favorites.len(),
        favorites,
    })
}

pub async fn toggle_favorite(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ToggleRequest>,
) -> Result<Json<FavoriteState>, ApiError> {
    let record = state.catalog.index().by_id(&payload.id).cloned();

    let is_favorite = match record {
        Some(record) => state.favorites.toggle(&record)?,
        // Prompts that left the catalog can still be unfavorited
        None if state.favorites.is_favorite(&payload.id) => {
            state.favorites.remove(&payload.id)?;
            false
        }
        None => return Err(ApiError::NotFound(format!("Prompt {}", payload.id))),
    };

    Ok(Json(FavoriteState {
        id: payload.id,
        is_favorite,
    }))
}

pub async fn add_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FavoriteState>, ApiError> {
    let record = state
        .catalog
        .index()
        .by_id(&id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("Prompt {}", id)))?;

    state.favorites.add(&record)?;
    Ok(Json(FavoriteState {
        id,
        is_favorite: true,
    }))
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>, ApiError> {
    let removed = state.favorites.remove(&id)?;
    let message = if removed {
        "Favorite removed"
    } else {
        "Prompt was not a favorite"
    };

    Ok(Json(ApiResponse {
        success: true,
        message: message.to_string(),
    }))
}

pub async fn clear_favorites(State(state): State<AppState>) -> Result<Json<ApiResponse>, ApiError> {
    state.favorites.clear()?;
    Ok(Json(ApiResponse {
        success: true,
        message: "Favorites cleared".to_string(),
    }))
}
