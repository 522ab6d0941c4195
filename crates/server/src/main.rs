//! # gridwise-server
//!
//! HTTP API for the local gridwise engine. Nothing here calls a remote
//! model: an instruction no local command recognizes is answered with
//! `{"handled": false}` so the caller can forward it.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use gridwise_core::{FormatOverlay, FreezePanes, Grid, OperationResult};
use gridwise_interpreter::{Context, Interpreter};
use gridwise_profiler::{DataStructure, Suggestions};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

/// Health check response.
#[derive(Serialize, Deserialize)]
pub struct Health {
    /// Server status ("ok" when healthy).
    pub status: String,
    /// Server version from Cargo.toml.
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub grid: Grid,
    pub prompt: String,
    #[serde(default)]
    pub overlay: FormatOverlay,
    #[serde(default)]
    pub freeze: FreezePanes,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub handled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<OperationResult>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub grid: Grid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub structure: DataStructure,
    pub suggestions: Suggestions,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Health check endpoint handler.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn command(
    State(interpreter): State<Arc<Interpreter>>,
    Json(request): Json<CommandRequest>,
) -> Json<CommandResponse> {
    let ctx = Context::new(&request.grid, &request.overlay).with_freeze(request.freeze);
    let result = interpreter.execute_in(&ctx, &request.prompt);

    if result.is_unhandled() {
        return Json(CommandResponse {
            handled: false,
            result: None,
        });
    }
    Json(CommandResponse {
        handled: true,
        result: Some(result),
    })
}

pub async fn profile(
    Json(request): Json<ProfileRequest>,
) -> Result<Json<ProfileResponse>, (StatusCode, Json<ErrorBody>)> {
    let structure = gridwise_profiler::profile(&request.grid).map_err(|e| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorBody {
                error: e.to_string(),
            }),
        )
    })?;
    let suggestions = Suggestions::from_structure(&structure);
    Ok(Json(ProfileResponse {
        structure,
        suggestions,
    }))
}

/// Create the application router.
///
/// This is separated from `main()` to allow testing.
pub fn create_router() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/command", post(command))
        .route("/v1/profile", post(profile))
        .with_state(Arc::new(Interpreter::new()))
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let app = create_router();

    let addr = std::env::var("GRIDWISE_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    tracing::info!("gridwise-server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
