use axum::{
    routing::{get, get_service, post, put},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::config::AppConfig;
use crate::data::repositories::{FileJsonFetcher, HttpJsonFetcher, JsonFetcher, KeyValueStore};
use crate::features::bilingual::BilingualSource;
use crate::features::catalog::CatalogService;
use crate::features::favorites::FavoritesStore;
use crate::handlers::{catalog, favorites};

/// Explicit instances shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub bilingual: BilingualSource,
    pub favorites: Arc<FavoritesStore>,
}

impl AppState {
    pub fn new(config: &AppConfig, fetcher: Arc<dyn JsonFetcher>, kv: Arc<dyn KeyValueStore>) -> Self {
        AppState {
            catalog: CatalogService::new(fetcher.clone(), config.load_timeout),
            bilingual: BilingualSource::new(fetcher, config.load_timeout),
            favorites: Arc::new(FavoritesStore::open(kv)),
        }
    }
}

/// HTTP when a base URL is configured, otherwise the local data directory.
pub fn build_fetcher(config: &AppConfig) -> Arc<dyn JsonFetcher> {
    match config.data_base_url.as_deref() {
        Some(url) => {
            log::info!("Fetching catalog data from {}", url);
            Arc::new(HttpJsonFetcher::new(url))
        }
        None => {
            log::info!("Reading catalog data from {}", config.data_dir.display());
            Arc::new(FileJsonFetcher::new(config.data_dir.clone()))
        }
    }
}

pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    // Prompt and category API
    let catalog_router = Router::new()
        .route("/prompts", get(catalog::list_prompts))
        .route("/prompts/latest", get(catalog::latest_prompts))
        .route("/prompts/{id}", get(catalog::get_prompt))
        .route("/prompts/{id}/bilingual", get(catalog::get_bilingual))
        .route("/categories", get(catalog::list_categories))
        .route("/categories/popular", get(catalog::popular_categories))
        .route("/status", get(catalog::loading_status))
        .route("/reload", post(catalog::reload));

    // Favorites API
    let favorites_router = Router::new()
        .route(
            "/",
            get(favorites::list_favorites).delete(favorites::clear_favorites),
        )
        .route("/toggle", post(favorites::toggle_favorite))
        .route(
            "/{id}",
            put(favorites::add_favorite).delete(favorites::remove_favorite),
        );

    let api_router = Router::new()
        .merge(catalog_router)
        .nest("/favorites", favorites_router);

    Router::new()
        .nest("/api", api_router)
        .nest_service("/static", get_service(ServeDir::new(static_dir)))
        .with_state(state)
}
