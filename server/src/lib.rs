use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use irsim_core::{Engine, EngineConfig, MethodOutput, SimulateRequest};
use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod errors;

use errors::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub engine: Engine,
}

/// Allowed origins, comma-separated as in `CORS_ALLOW_ORIGIN`. Nothing usable means any origin.
pub fn cors_layer(allowed: Option<&str>) -> CorsLayer {
    let origins: Vec<HeaderValue> =
        allowed.unwrap_or_default().split(',').filter_map(|o| o.trim().parse().ok()).collect();
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        tracing::debug!(origins = origins.len(), "restricting CORS origins");
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn build_app(config: EngineConfig) -> Router {
    let app_state = AppState { engine: Engine::new(config) };
    let cors = cors_layer(std::env::var("CORS_ALLOW_ORIGIN").ok().as_deref());

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/simulate", post(simulate_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn simulate_handler(
    State(state): State<AppState>,
    payload: Result<Json<SimulateRequest>, JsonRejection>,
) -> Result<Json<MethodOutput>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::Unprocessable(e.body_text()))?;
    let start = std::time::Instant::now();
    let method = req.method_id;

    // the engine is CPU bound; keep it off the async workers
    let engine = state.engine.clone();
    let result = tokio::task::spawn_blocking(move || engine.run(&req))
        .await
        .map_err(|e| ApiError::Internal(format!("engine task failed: {e}")))?;

    match result {
        Ok(out) => {
            tracing::info!(%method, took_ms = start.elapsed().as_millis() as u64, "simulated");
            Ok(Json(out))
        }
        Err(err) => {
            tracing::warn!(%method, error = %err, "request rejected");
            Err(err.into())
        }
    }
}
