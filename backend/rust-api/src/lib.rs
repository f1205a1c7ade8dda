use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use config::Config;
pub use error::GameError;
pub use services::AppState;

pub fn create_router(app_state: Arc<AppState>) -> Router {
    // The game client is served from a different origin
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(tower_http::cors::Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/metrics",
            get(handlers::metrics_handler).layer(middleware::from_fn_with_state(
                app_state.clone(),
                handlers::metrics_auth_middleware,
            )),
        )
        .nest("/api", api_routes().layer(cors))
        .with_state(app_state)
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(
            middlewares::trace::trace_context_middleware,
        ))
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/words", get(handlers::words::list_words))
        .route("/words/{id}", get(handlers::words::get_word))
        .route(
            "/words/{id}/distractors",
            get(handlers::words::get_distractors),
        )
        .route(
            "/words/{id}/letter-options",
            get(handlers::words::get_letter_options),
        )
        .route(
            "/words/{id}/extra-letter",
            get(handlers::words::get_extra_letter),
        )
        .route(
            "/words/{id}/spell-letters",
            get(handlers::words::get_spell_letters),
        )
        .route("/words/{id}/mix", get(handlers::words::get_mix))
        .route("/answers", post(handlers::answers::submit_answer))
        .route("/progress/today", get(handlers::progress::get_today))
        .route("/letters", get(handlers::words::list_letters))
}
