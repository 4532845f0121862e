use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::data::models::{CategoryCount, FavoriteEntry, PromptRecord, ResolvedContent};

fn default_limit() -> usize {
    6
}

#[derive(Debug, Default, Deserialize)]
pub struct PromptQuery {
    pub q: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LimitParams {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: usize,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PromptList {
    pub total: usize,
    pub prompts: Vec<PromptRecord>,
}

#[derive(Debug, Serialize)]
pub struct CategoryList {
    pub total: usize,
    pub categories: Vec<CategoryCount>,
}

#[derive(Debug, Serialize)]
pub struct BilingualView {
    pub prompt: PromptRecord,
    pub content: ResolvedContent,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteState {
    pub id: String,
    pub is_favorite: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FavoriteList {
    pub total: usize,
    pub favorites: Vec<FavoriteEntry>,
}

/// Standard API response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}
