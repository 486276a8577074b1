//! REST API over [`GameService`].
//!
//! Games are served as JSON in the shape produced by
//! [`raya_engine::Game`]'s serde form. Failures carry a
//! `{"statusCode", "message", "error"}` body.

mod cors;
mod dto;
mod error;
mod handlers;

pub use cors::CorsPolicy;
pub use dto::{DEFAULT_HISTORY_LIMIT, HealthResponse, HistoryParams, MAX_HISTORY_LIMIT, MoveRequest};
pub use error::ApiError;

use crate::service::GameService;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tracing::{info, instrument};

/// State shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    service: Arc<GameService>,
}

impl AppState {
    /// Wraps a service.
    pub fn new(service: Arc<GameService>) -> Self {
        Self { service }
    }

    /// The game service.
    pub fn service(&self) -> &GameService {
        &self.service
    }
}

/// Builds the application router.
#[instrument(skip(state))]
pub fn router(state: AppState, cors: CorsPolicy) -> Router {
    info!(origin = ?cors.origin(), "Building router");
    Router::new()
        .route("/", get(handlers::welcome))
        .route("/health", get(handlers::health))
        .route("/game", get(handlers::list_games).post(handlers::create_game))
        .route("/game/history", get(handlers::game_history))
        .route("/game/{id}", get(handlers::get_game))
        .route("/game/{id}/move", post(handlers::make_move))
        .route("/game/{id}/ai-move", post(handlers::ai_move))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(Arc::new(cors), cors::apply))
        .with_state(state)
}
