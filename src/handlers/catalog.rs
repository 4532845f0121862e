use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::app::AppState;
use crate::data::models::*;
use crate::handlers::extractors::ApiQuery;
use crate::features::catalog::ALL_CATEGORIES;

pub async fn list_prompts(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PromptQuery>,
) -> Json<PromptList> {
    let index = state.catalog.index();
    let category = params.category.as_deref().filter(|c| !c.is_empty());

    let prompts = match params.q.as_deref() {
        Some(q) => index
            .search(q)
            .into_iter()
            .filter(|p| match category {
                None | Some(ALL_CATEGORIES) => true,
                Some(c) => p.categories.iter().any(|pc| pc == c),
            })
            .collect(),
        None => index.by_category(category),
    };

    Json(PromptList {
        total: prompts.len(),
        prompts,
    })
}

pub async fn latest_prompts(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<LimitParams>,
) -> Result<Json<PromptList>, ApiError> {
    params.validate()?;
    let prompts = state.catalog.index().latest(params.limit);
    Ok(Json(PromptList {
        total: prompts.len(),
        prompts,
    }))
}

pub async fn get_prompt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PromptRecord>, ApiError> {
    state
        .catalog
        .index()
        .by_id(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Prompt {}", id)))
}

pub async fn get_bilingual(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BilingualView>, ApiError> {
    let prompt = state
        .catalog
        .index()
        .by_id(&id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("Prompt {}", id)))?;

    let content = state.bilingual.resolve(&prompt).await;
    Ok(Json(BilingualView { prompt, content }))
}

pub async fn list_categories(State(state): State<AppState>) -> Json<CategoryList> {
    let index = state.catalog.index();
    Json(CategoryList {
        total: index.len(),
        categories: index.category_counts(),
    })
}

pub async fn popular_categories(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<LimitParams>,
) -> Result<Json<Vec<CategoryCount>>, ApiError> {
    params.validate()?;
    Ok(Json(state.catalog.index().popular_categories(params.limit)))
}

pub async fn loading_status(State(state): State<AppState>) -> Json<LoadingStatus> {
    Json(state.catalog.status())
}

pub async fn reload(State(state): State<AppState>) -> Result<Json<ApiResponse>, ApiError> {
    state.bilingual.refresh();
    let count = state.catalog.load().await?;
    Ok(Json(ApiResponse {
        success: true,
        message: format!("Loaded {} prompts", count),
    }))
}
