pub mod error;
pub mod routes;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let attempt_routes = Router::new()
        .route("/score", post(routes::attempt::score))
        .route("/{attempt_id}", get(routes::attempt::get));

    let phoneme_routes = Router::new().route(
        "/student/{student_id}/lesson/{lesson_result_id}/question/{question_id}/phonemes",
        get(routes::phoneme::totals),
    );

    let api = Router::new()
        .nest("/attempt", attempt_routes)
        .merge(phoneme_routes);

    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api)
        .merge(health)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
