//! HTTP server wiring and request handlers

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::config::ServerConfig;
use crate::error::{BgWebError, Result};
use crate::search::{PexelsClient, PhotoSearch, SearchError};
use crate::segmentation::{ImglySegmenter, Segmenter};
use crate::storage::{self, OutputStore};

/// Landing page served at `/`
const INDEX_HTML: &str = include_str!("../static/index.html");

/// Front-end script referenced by the landing page
const INDEX_JS: &str = include_str!("../static/scripts/index.js");

/// Generous cap for uploaded photos; axum's default 2 MB is too small
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Shared state injected into every handler
#[derive(Clone)]
pub struct AppState {
    search: Arc<dyn PhotoSearch>,
    segmenter: Arc<dyn Segmenter>,
    store: OutputStore,
    default_query: String,
    per_page: u32,
}

impl AppState {
    /// Assemble handler state from configuration plus the two collaborators.
    ///
    /// # Errors
    /// Returns an error when the storage directory cannot be created.
    pub fn new(
        config: &ServerConfig,
        search: Arc<dyn PhotoSearch>,
        segmenter: Arc<dyn Segmenter>,
    ) -> Result<Self> {
        Ok(Self {
            search,
            segmenter,
            store: OutputStore::new(&config.storage_dir)?,
            default_query: config.default_query.clone(),
            per_page: config.per_page,
        })
    }
}

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/static/scripts/index.js", get(index_script))
        .route("/api/backgrounds", get(backgrounds))
        .route("/remove-background", post(remove_background))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Download the segmentation model, build the collaborators, and serve
/// until the process is stopped.
///
/// # Errors
/// Returns an error when startup fails (model download, storage setup,
/// bind failure) or the server loop exits abnormally.
pub async fn run(config: ServerConfig) -> Result<()> {
    let segmenter = Arc::new(ImglySegmenter::from_model_url(&config.model_url).await?);
    let search = Arc::new(PexelsClient::new(
        config.pexels_api_key.clone(),
        config.pexels_base_url.clone(),
    ));
    let state = AppState::new(&config, search, segmenter)?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .map_err(|e| {
            BgWebError::network_error(format!("failed to bind {}: {e}", config.bind_addr))
        })?;
    info!(addr = %config.bind_addr, "Listening for HTTP requests");

    axum::serve(listener, app)
        .await
        .map_err(|e| BgWebError::network_error(format!("server error: {e}")))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn index_script() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript")], INDEX_JS)
}

#[derive(Debug, Deserialize)]
struct BackgroundsParams {
    query: Option<String>,
}

#[derive(Debug, Serialize)]
struct BackgroundsResponse {
    images: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// `GET /api/backgrounds` — relay a Pexels search as `{"images": [...]}`
async fn backgrounds(
    State(state): State<AppState>,
    Query(params): Query<BackgroundsParams>,
) -> Response {
    let query = params.query.unwrap_or_else(|| state.default_query.clone());
    debug!(query = %query, "Background search requested");

    match state.search.search(&query, state.per_page).await {
        Ok(images) => (StatusCode::OK, Json(BackgroundsResponse { images })).into_response(),
        Err(SearchError::Upstream { status, .. }) => {
            // Relay the upstream status code as-is.
            let code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            (
                code,
                Json(ErrorResponse {
                    error: "Pexels API failed".to_string(),
                }),
            )
                .into_response()
        },
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

/// `POST /remove-background` — strip the background from an uploaded image
async fn remove_background(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => return (StatusCode::BAD_REQUEST, "No file part").into_response(),
            Err(e) => {
                return (StatusCode::BAD_REQUEST, format!("Malformed upload: {e}")).into_response()
            },
        };

        if field.name() != Some("image") {
            continue;
        }

        // A part without a filename is a plain form field, not a file upload.
        if field.file_name().map_or(true, str::is_empty) {
            return (StatusCode::BAD_REQUEST, "No selected file").into_response();
        }

        let input = match field.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => {
                return (StatusCode::BAD_REQUEST, format!("Malformed upload: {e}")).into_response()
            },
        };
        debug!(bytes = input.len(), "Processing uploaded image");

        return match process_upload(&state, input).await {
            Ok(png) => {
                (StatusCode::OK, [(header::CONTENT_TYPE, "image/png")], png).into_response()
            },
            Err(e) => {
                error!(error = %e, "Background removal request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Processing failed: {e}"),
                )
                    .into_response()
            },
        };
    }
}

/// Segment, persist, and read back the output file for the response body
async fn process_upload(state: &AppState, input: Vec<u8>) -> Result<Vec<u8>> {
    let output = state.segmenter.remove_background(input).await?;
    let image = storage::decode_image(&output)?;
    state.store.save(&image)?;
    state.store.read()
}
