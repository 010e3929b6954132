use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::{HeaderMap, StatusCode}, routing::{get, post}, Json, Router};
use bookrank::persist::{catalog_exists, load_catalog, save_catalog, CatalogPaths};
use bookrank::tags::normalize_tag;
use bookrank::{Book, Catalog, CatalogError, NewBook, Weight, WeightedList};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer, AllowOrigin};
use tower_http::trace::TraceLayer;

type ApiError = (StatusCode, Json<Value>);
type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Deserialize)]
pub struct RelatedParams {
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 10 }

#[derive(Serialize)]
pub struct RelatedResponse {
    pub title: String,
    pub total_hits: usize,
    pub results: Vec<RelatedHit>,
}

#[derive(Serialize)]
pub struct RelatedHit {
    pub title: String,
    pub score: Weight,
}

#[derive(Deserialize)]
pub struct TagRequest {
    pub tag: String,
}

#[derive(Serialize)]
pub struct TagResponse {
    pub title: String,
    pub tag: String,
    /// False when the tag was already present and only its weight went up.
    pub new_tag: bool,
    pub tags: WeightedList<String>,
}

/// Shared handler state. The catalog sits behind one lock: lookups share it,
/// adding books and tags takes it exclusively.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<RwLock<Catalog>>,
    pub catalog_root: PathBuf,
    pub admin_token: Option<String>,
}

pub fn build_app(catalog_dir: String) -> Result<Router> {
    let paths = CatalogPaths::new(&catalog_dir);
    let catalog = if catalog_exists(&paths) {
        load_catalog(&paths)?
    } else {
        tracing::warn!(catalog_dir, "no catalog found, starting empty");
        Catalog::new()
    };
    let admin_token = std::env::var("ADMIN_TOKEN").ok();
    let app_state = AppState { catalog: Arc::new(RwLock::new(catalog)), catalog_root: PathBuf::from(&catalog_dir), admin_token };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Ok(router(app_state).layer(cors).layer(TraceLayer::new_for_http()))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/books", get(list_books).post(add_book))
        .route("/books/:title", get(get_book))
        .route("/books/:title/tags", post(tag_book))
        .route("/related/:title", get(related_handler))
        .with_state(state)
}

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

fn not_found() -> ApiError { api_error(StatusCode::NOT_FOUND, "not found") }

pub async fn list_books(State(state): State<AppState>) -> Json<Vec<Book>> {
    let catalog = state.catalog.read();
    Json(catalog.books().into_iter().cloned().collect())
}

pub async fn get_book(State(state): State<AppState>, Path(title): Path<String>) -> ApiResult<Json<Book>> {
    let catalog = state.catalog.read();
    catalog.get_book(&title).cloned().map(Json).ok_or_else(not_found)
}

pub async fn related_handler(
    State(state): State<AppState>,
    Path(title): Path<String>,
    Query(params): Query<RelatedParams>,
) -> ApiResult<Json<RelatedResponse>> {
    let catalog = state.catalog.read();
    let related = catalog.related(&title).map_err(|_| not_found())?;
    let k = params.k.clamp(1, 100);
    let results: Vec<RelatedHit> = related
        .entries()
        .take(k)
        .map(|(book, score)| RelatedHit { title: book.title().to_string(), score })
        .collect();
    tracing::info!(title, total_hits = related.len(), returned = results.len(), "related query");
    Ok(Json(RelatedResponse { title, total_hits: related.len(), results }))
}

pub async fn add_book(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut input): Json<NewBook>,
) -> ApiResult<(StatusCode, Json<Book>)> {
    authorize(&state, &headers)?;
    if input.title.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "title must not be empty"));
    }
    input.tags = input.tags.iter().filter_map(|t| normalize_tag(t)).collect();
    let book = Book::from(input);

    let mut catalog = state.catalog.write();
    let replaced = catalog.add_book(book.clone());
    if let Err(e) = persist(&state, &catalog) {
        // Unsaved changes must not stay visible.
        match replaced {
            Some(previous) => { catalog.add_book(previous); }
            None => { catalog.remove_book(book.title()); }
        }
        return Err(e);
    }
    if replaced.is_some() {
        tracing::info!(title = book.title(), "replaced existing book");
    }
    Ok((StatusCode::CREATED, Json(book)))
}

pub async fn tag_book(
    State(state): State<AppState>,
    Path(title): Path<String>,
    headers: HeaderMap,
    Json(req): Json<TagRequest>,
) -> ApiResult<Json<TagResponse>> {
    authorize(&state, &headers)?;
    let tag = normalize_tag(&req.tag).ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "empty tag"))?;

    let mut catalog = state.catalog.write();
    let before = catalog.get_book(&title).cloned().ok_or_else(not_found)?;
    let new_tag = match catalog.tag_book(&title, &tag) {
        Ok(new_tag) => new_tag,
        Err(CatalogError::UnknownBook(_)) => return Err(not_found()),
    };
    if let Err(e) = persist(&state, &catalog) {
        catalog.add_book(before);
        return Err(e);
    }
    let tags = catalog.get_book(&title).map(|b| b.tags().clone()).unwrap_or_default();
    Ok(Json(TagResponse { title, tag, new_tag, tags }))
}

fn persist(state: &AppState, catalog: &Catalog) -> ApiResult<()> {
    save_catalog(&CatalogPaths::new(&state.catalog_root), catalog).map_err(|e| {
        tracing::error!(error = %e, "failed to save catalog");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "failed to save catalog")
    })
}

fn authorize(state: &AppState, headers: &HeaderMap) -> ApiResult<()> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Ok(()),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err(api_error(StatusCode::UNAUTHORIZED, "invalid admin token"))
    }
}
