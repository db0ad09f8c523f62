use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use std::sync::Arc;
use tracing::debug;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::FilterError;
use crate::filter::FilterConfig;
use crate::types::{
    AddResponse, AppState, CheckResponse, ErrorResponse, InitRequest,
    ItemRequest, StatsResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        init_filter,
        add_item,
        check_item,
        get_stats,
    ),
    components(
        schemas(InitRequest, ItemRequest, AddResponse, CheckResponse, StatsResponse, ErrorResponse)
    ),
    tags(
        (name = "bloom-filter", description = "Bloom Filter Membership API")
    )
)]
struct ApiDoc;

fn error_response(err: FilterError) -> Response {
    let status = if err.is_validation() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else if matches!(err, FilterError::NotInitialized) {
        StatusCode::PRECONDITION_FAILED
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (
        status,
        Json(ErrorResponse {
            message: err.to_string(),
        }),
    )
        .into_response()
}

/// Check API health
#[utoipa::path(
    get,
    path = "/health",
    tag = "bloom-filter",
    responses(
        (status = 200, description = "API is healthy")
    )
)]
async fn health_check() -> impl IntoResponse {
    debug!("Health check");
    StatusCode::OK
}

/// Reinitialize the Bloom filter with the given parameters
#[utoipa::path(
    post,
    path = "/init",
    tag = "bloom-filter",
    request_body = InitRequest,
    responses(
        (status = 200, description = "Filter initialized", body = StatsResponse),
        (status = 422, description = "Invalid parameters", body = ErrorResponse)
    )
)]
async fn init_filter(
    State(state): State<Arc<AppState>>,
    Json(request): Json<InitRequest>,
) -> Response {
    debug!(
        "Initializing filter: expected_items={}, false_positive_rate={}",
        request.expected_items, request.false_positive_rate
    );
    let config = match FilterConfig::try_from(request) {
        Ok(config) => config,
        Err(e) => return error_response(e),
    };
    match state.init(config).await {
        Ok(stats) => {
            (StatusCode::OK, Json(StatsResponse::from(stats))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Add an item to the Bloom filter
#[utoipa::path(
    post,
    path = "/add",
    tag = "bloom-filter",
    request_body = ItemRequest,
    responses(
        (status = 200, description = "Item added", body = AddResponse),
        (status = 412, description = "Filter not initialized", body = ErrorResponse)
    )
)]
async fn add_item(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ItemRequest>,
) -> Response {
    debug!("Adding item: {}", &request.item);
    match state.add(request.item.as_bytes()).await {
        Ok(()) => (
            StatusCode::OK,
            Json(AddResponse {
                message: format!("Item '{}' added successfully", request.item),
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// Check whether an item may be in the Bloom filter
#[utoipa::path(
    post,
    path = "/check",
    tag = "bloom-filter",
    request_body = ItemRequest,
    responses(
        (status = 200, description = "Check successful", body = CheckResponse),
        (status = 412, description = "Filter not initialized", body = ErrorResponse)
    )
)]
async fn check_item(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ItemRequest>,
) -> Response {
    debug!("Checking item: {}", &request.item);
    match state.check(request.item.as_bytes()).await {
        Ok(exists) => (
            StatusCode::OK,
            Json(CheckResponse {
                item: request.item,
                exists,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// Get filter statistics
#[utoipa::path(
    get,
    path = "/stats",
    tag = "bloom-filter",
    responses(
        (status = 200, description = "Current statistics", body = StatsResponse),
        (status = 412, description = "Filter not initialized", body = ErrorResponse)
    )
)]
async fn get_stats(State(state): State<Arc<AppState>>) -> Response {
    match state.stats().await {
        Ok(stats) => {
            (StatusCode::OK, Json(StatsResponse::from(stats))).into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn root() -> Redirect {
    Redirect::temporary("/docs")
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let openapi = ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi))
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/init", post(init_filter))
        .route("/add", post(add_item))
        .route("/check", post(check_item))
        .route("/stats", get(get_stats))
        .with_state(state)
}
