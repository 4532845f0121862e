pub mod error_models;
pub mod prompt_models;
pub mod search_models;

pub use error_models::{ApiError, CatalogError, StoreError};
pub use prompt_models::{
    CategoryCount, FavoriteEntry, LoadingStatus, PromptRecord, ResolvedContent,
    UNCATEGORIZED, UNTITLED_PROMPT,
};
pub use search_models::{
    ApiResponse, BilingualView, CategoryList, FavoriteList, FavoriteState, LimitParams,
    PromptList, PromptQuery, ToggleRequest,
};
