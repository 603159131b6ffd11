// Split Bill - Web Server
// REST API over the same core the terminal UI drives

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use anyhow::Context;
use clap::Parser;
use serde::{Deserialize, Serialize};
use split_bill::{
    logging, parse_amount, AppSnapshot, Config, Friend, FriendId, FriendView, Payer, SplitApp,
    SplitError,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state; the mutex makes every request one atomic operation
#[derive(Clone)]
struct AppState {
    core: Arc<Mutex<SplitApp>>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn err(message: String) -> Self {
        Self {
            success: false,
            data: (),
            error: Some(message),
        }
    }
}

/// Core errors as HTTP responses
struct ApiError(SplitError);

impl From<SplitError> for ApiError {
    fn from(err: SplitError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            SplitError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            SplitError::NoSelection | SplitError::FormClosed => StatusCode::CONFLICT,
            SplitError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        tracing::warn!(%status, error = %self.0, "request rejected");
        (status, Json(ApiResponse::err(self.0.to_string()))).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

// ============================================================================
// Request / response bodies
// ============================================================================

#[derive(Deserialize)]
struct NewFriendRequest {
    name: String,
    /// Falls back to the form's current template
    #[serde(default)]
    image_template: Option<String>,
}

/// Raw text, exactly as a form field would send it
#[derive(Deserialize)]
struct SplitUpdateRequest {
    #[serde(default)]
    bill_total: Option<String>,
    #[serde(default)]
    payer_expense: Option<String>,
    #[serde(default)]
    payer: Option<Payer>,
}

#[derive(Serialize)]
struct SplitUpdateResponse {
    /// false when the expense exceeded the bill and the previous value was kept
    #[serde(skip_serializing_if = "Option::is_none")]
    expense_accepted: Option<bool>,
    state: AppSnapshot,
}

#[derive(Serialize)]
struct SplitResultResponse {
    friend: Friend,
    state: AppSnapshot,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/state - Everything needed to render
async fn get_state(State(state): State<AppState>) -> Json<ApiResponse<AppSnapshot>> {
    let core = state.core.lock().await;
    Json(ApiResponse::ok(core.snapshot()))
}

/// GET /api/friends - Friends in display order
async fn get_friends(State(state): State<AppState>) -> Json<ApiResponse<Vec<FriendView>>> {
    let core = state.core.lock().await;
    Json(ApiResponse::ok(core.snapshot().friends))
}

/// POST /api/friends - Submit the add-friend form (open it first via /api/form/toggle)
async fn add_friend(
    State(state): State<AppState>,
    Json(request): Json<NewFriendRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Friend>>), ApiError> {
    let mut core = state.core.lock().await;

    let id = core.add_friend(&request.name, request.image_template.as_deref())?;

    let friend = core
        .friends()
        .iter()
        .find(|f| f.id == id)
        .cloned()
        .ok_or(SplitError::NotFound(id))?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(friend))))
}

/// POST /api/friends/:id/select - Toggle selection
async fn select_friend(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<AppSnapshot> {
    let mut core = state.core.lock().await;
    core.toggle_select(&FriendId::from(id))?;
    Ok(Json(ApiResponse::ok(core.snapshot())))
}

/// POST /api/form/toggle - Open/close the add-friend form
async fn toggle_form(State(state): State<AppState>) -> Json<ApiResponse<AppSnapshot>> {
    let mut core = state.core.lock().await;
    core.toggle_add_form();
    Json(ApiResponse::ok(core.snapshot()))
}

/// PUT /api/split - Edit the split draft
async fn update_split(
    State(state): State<AppState>,
    Json(request): Json<SplitUpdateRequest>,
) -> ApiResult<SplitUpdateResponse> {
    let mut core = state.core.lock().await;

    if core.selection().is_none() {
        return Err(SplitError::NoSelection.into());
    }

    // Reject the whole request before touching the draft
    if let Some(raw) = &request.bill_total {
        parse_amount("bill_total", raw).map_err(SplitError::from)?;
    }
    if let Some(raw) = &request.payer_expense {
        parse_amount("payer_expense", raw).map_err(SplitError::from)?;
    }

    if let Some(raw) = &request.bill_total {
        core.set_bill_total(raw)?;
    }
    let expense_accepted = match &request.payer_expense {
        Some(raw) => Some(core.set_payer_expense(raw)?),
        None => None,
    };
    if let Some(payer) = request.payer {
        core.set_payer(payer)?;
    }

    Ok(Json(ApiResponse::ok(SplitUpdateResponse {
        expense_accepted,
        state: core.snapshot(),
    })))
}

/// POST /api/split/submit - Apply the draft to the selected friend
async fn submit_split(State(state): State<AppState>) -> ApiResult<SplitResultResponse> {
    let mut core = state.core.lock().await;

    let id = core
        .selection()
        .selected()
        .cloned()
        .ok_or(SplitError::NoSelection)?;
    core.submit_split()?;

    let friend = core
        .friends()
        .iter()
        .find(|f| f.id == id)
        .cloned()
        .ok_or(SplitError::NotFound(id))?;

    Ok(Json(ApiResponse::ok(SplitResultResponse {
        friend,
        state: core.snapshot(),
    })))
}

fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/state", get(get_state))
        .route("/friends", get(get_friends).post(add_friend))
        .route("/friends/:id/select", post(select_friend))
        .route("/form/toggle", post(toggle_form))
        .route("/split", axum::routing::put(update_split))
        .route("/split/submit", post(submit_split))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[derive(Parser)]
#[command(name = "split-server", version, about = "HTTP API for split-bill")]
struct Cli {
    /// JSON config file (defaults to $SPLIT_BILL_CONFIG, then built-in defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides server.bind from the config
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    logging::init_for_server(&config.log_filter)?;

    let state = AppState {
        core: Arc::new(Mutex::new(SplitApp::from_config(&config))),
    };

    let addr = cli.bind.unwrap_or_else(|| config.server.bind.clone());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to address {}", addr))?;

    tracing::info!(%addr, friends = config.friends.len(), "server listening");
    println!("🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/state", addr);

    axum::serve(listener, router(state))
        .await
        .context("Server error")?;

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
