use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use retrieval::generate::{Generator, MockGenerator};
use retrieval::pipeline::{Answer, QueryContext, RagPipeline};
use retrieval::{Document, Index, IndexStats, RetrievalConfig};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub const MAX_K: usize = 100;

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub retrieval: RetrievalConfig,
    pub admin_token: Option<String>,
    /// Comma-separated list; `None` allows any origin.
    pub cors_allow_origin: Option<String>,
}

impl AppConfig {
    /// Retrieval tunables plus `ADMIN_TOKEN` and `CORS_ALLOW_ORIGIN`.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            retrieval: RetrievalConfig::from_env()?,
            admin_token: std::env::var("ADMIN_TOKEN").ok().filter(|t| !t.is_empty()),
            cors_allow_origin: std::env::var("CORS_ALLOW_ORIGIN").ok(),
        })
    }
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub k: Option<usize>,
}

#[derive(Deserialize)]
pub struct ContextParams {
    pub q: String,
}

#[derive(Deserialize)]
pub struct AskParams {
    pub q: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
    pub content: String,
}

#[derive(Deserialize)]
pub struct AddDocumentRequest {
    pub content: String,
}

#[derive(Serialize)]
pub struct AddDocumentResponse {
    pub id: String,
}

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<Index>,
    pub pipeline: RagPipeline,
    pub generator: Arc<dyn Generator>,
    pub default_k: usize,
    pub admin_token: Option<String>,
}

/// Router over `index`, answering `/ask` with the offline [`MockGenerator`].
pub fn build_app(index: Arc<Index>, config: &AppConfig) -> Router {
    build_app_with_generator(index, Arc::new(MockGenerator::new()), config)
}

pub fn build_app_with_generator(index: Arc<Index>, generator: Arc<dyn Generator>, config: &AppConfig) -> Router {
    if config.admin_token.is_none() {
        tracing::warn!("ADMIN_TOKEN not set; POST /documents accepts unauthenticated writes");
    }
    let app_state = AppState {
        pipeline: RagPipeline::new(Arc::clone(&index), config.retrieval.top_k),
        index,
        generator,
        default_k: config.retrieval.top_k,
        admin_token: config.admin_token.clone(),
    };

    let cors = match &config.cors_allow_origin {
        Some(val) => {
            let origins: Vec<_> = val.split(',').filter_map(|s| s.trim().parse().ok()).collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        None => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/context", get(context_handler))
        .route("/ask", get(ask_handler))
        .route("/stats", get(stats_handler))
        .route("/documents", post(add_document_handler))
        .route("/documents/:id", get(document_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let k = params.k.unwrap_or(state.default_k).min(MAX_K);
    let ranked = state.index.search_scored(&params.q, usize::MAX);
    let total_hits = ranked.len();
    let results = ranked
        .into_iter()
        .take(k)
        .map(|hit| SearchHit { id: hit.document.id, score: hit.score, content: hit.document.content })
        .collect();
    Json(SearchResponse { query: params.q, took_s: start.elapsed().as_secs_f64(), total_hits, results })
}

pub async fn context_handler(State(state): State<AppState>, Query(params): Query<ContextParams>) -> Json<QueryContext> {
    Json(state.pipeline.process_query(&params.q))
}

pub async fn ask_handler(State(state): State<AppState>, Query(params): Query<AskParams>) -> Result<Json<Answer>, (StatusCode, String)> {
    let AppState { pipeline, generator, .. } = state;
    // Generators may block on a remote backend.
    let answer = tokio::task::spawn_blocking(move || pipeline.answer(&params.q, generator.as_ref()))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("ask task failed: {e}")))?
        .map_err(|e| {
            tracing::warn!(error = %format!("{e:#}"), "generator failed");
            (StatusCode::BAD_GATEWAY, format!("{e:#}"))
        })?;
    Ok(Json(answer))
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<IndexStats> {
    Json(state.index.stats())
}

pub async fn document_handler(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Document>, (StatusCode, String)> {
    state
        .index
        .get(&id)
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("document {id} not found")))
}

async fn add_document_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<AddDocumentRequest>,
) -> Result<(StatusCode, Json<AddDocumentResponse>), (StatusCode, String)> {
    authorize(&state, &headers)?;
    // Ingestion re-vectorizes the whole corpus; keep it off the async workers.
    let index = Arc::clone(&state.index);
    let id = tokio::task::spawn_blocking(move || index.add_document(&req.content))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("ingestion task failed: {e}")))?;
    tracing::info!(doc_id = %id, "document added");
    Ok((StatusCode::CREATED, Json(AddDocumentResponse { id })))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Ok(()),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
