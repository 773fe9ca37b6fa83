use anyhow::Result;
use axum::{extract::{Query, State}, http::HeaderValue, routing::get, Json, Router};
use engine::{build_index, Corpus, Index, IndexCache, SearchResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod errors;

pub use errors::ApiError;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub corpus: Corpus,
    /// Reload the corpus on every query instead of serving a cached index.
    pub rebuild_per_request: bool,
    /// Comma-separated origins allowed by CORS; `None` or an unparsable list
    /// allows any origin.
    pub cors_allow_origin: Option<String>,
}

impl ServerConfig {
    pub fn new(corpus: Corpus) -> Self {
        Self { corpus, rebuild_per_request: false, cors_allow_origin: None }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub search_query: String,
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// `searchResults` is `null` for an empty query and `[]` when nothing matched.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub search_results: Option<Vec<SearchResult>>,
}

#[derive(Clone)]
pub struct AppState {
    pub corpus: Arc<Corpus>,
    pub cache: Option<Arc<IndexCache>>,
}

impl AppState {
    fn index(&self) -> engine::Result<Arc<Index>> {
        match &self.cache {
            Some(cache) => cache.get_or_build(&self.corpus),
            None => Ok(Arc::new(build_index(&self.corpus.load()?))),
        }
    }
}

pub fn build_app(config: ServerConfig) -> Result<Router> {
    let cache = if config.rebuild_per_request {
        None
    } else {
        // Build once at startup so a broken corpus fails fast
        let cache = Arc::new(IndexCache::new());
        cache.get_or_build(&config.corpus)?;
        Some(cache)
    };
    let cors = cors_layer(config.cors_allow_origin.as_deref());
    let app_state = AppState { corpus: Arc::new(config.corpus), cache };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_query_handler).post(search_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

fn cors_layer(allow_origin: Option<&str>) -> CorsLayer {
    let origins: Vec<HeaderValue> = allow_origin
        .into_iter()
        .flat_map(|list| list.split(','))
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let allowed = if origins.is_empty() { AllowOrigin::any() } else { AllowOrigin::list(origins) };
    CorsLayer::new().allow_origin(allowed).allow_methods(Any).allow_headers(Any)
}

pub async fn search_handler(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    run_search(state, req.search_query).await
}

pub async fn search_query_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    run_search(state, params.q).await
}

async fn run_search(state: AppState, query: String) -> Result<Json<SearchResponse>, ApiError> {
    if query.is_empty() {
        return Ok(Json(SearchResponse { search_results: None }));
    }
    let start = Instant::now();
    let q = query.clone();
    // Loading the corpus and ranking are blocking work
    let search_results = tokio::task::spawn_blocking(move || -> engine::Result<_> {
        let index = state.index()?;
        Ok(engine::search(&index, &q))
    })
    .await
    .map_err(|e| ApiError::Internal(format!("search task failed: {e}")))??;

    let hits = search_results.as_ref().map_or(0, Vec::len);
    tracing::info!(query = %query, hits, took_s = start.elapsed().as_secs_f64(), "search");
    Ok(Json(SearchResponse { search_results }))
}
