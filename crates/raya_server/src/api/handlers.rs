//! Route handlers.

use super::{ApiError, AppState, HealthResponse, HistoryParams, MoveRequest};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::Html,
};
use raya_engine::{Game, GameId};
use tracing::{info, instrument, warn};

const WELCOME_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Welcome to 3 Raya API</title>
  <style>
    body { font-family: Arial, sans-serif; background-color: #f0f0f0; color: #333; text-align: center; padding: 50px; }
    h1 { color: #4a90e2; }
    p { font-size: 18px; }
  </style>
</head>
<body>
  <h1>Welcome to the 3 Raya API</h1>
  <p>This API allows you to manage and play the Tic Tac Toe game.</p>
  <p>Games live under <code>/game</code>.</p>
</body>
</html>
"#;

fn parse_id(raw: &str) -> Result<GameId, ApiError> {
    raw.parse().map_err(|_| {
        warn!(id = %raw, "Malformed game id");
        ApiError::bad_request("Invalid game ID format")
    })
}

/// Landing page.
pub(crate) async fn welcome() -> Html<&'static str> {
    Html(WELCOME_PAGE)
}

/// Liveness probe.
pub(crate) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// All games, newest first.
#[instrument(skip(state))]
pub(crate) async fn list_games(State(state): State<AppState>) -> Result<Json<Vec<Game>>, ApiError> {
    let games = state
        .service()
        .list_all()
        .await
        .map_err(ApiError::context("Failed to fetch games"))?;
    Ok(Json(games))
}

/// Recent games, optionally filtered by status.
#[instrument(skip(state, params))]
pub(crate) async fn game_history(
    State(state): State<AppState>,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<Vec<Game>>, ApiError> {
    let Query(params) = params.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let (limit, status) = params.validate()?;

    let games = state
        .service()
        .history(limit, status)
        .await
        .map_err(ApiError::context("Failed to fetch game history"))?;
    Ok(Json(games))
}

/// Starts a new game.
#[instrument(skip(state))]
pub(crate) async fn create_game(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Game>), ApiError> {
    let game = state
        .service()
        .create()
        .await
        .map_err(ApiError::context("Failed to create game"))?;
    info!(game_id = %game.id(), "Game started");
    Ok((StatusCode::CREATED, Json(game)))
}

/// One game by id.
#[instrument(skip(state))]
pub(crate) async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Game>, ApiError> {
    let id = parse_id(&id)?;
    let game = state
        .service()
        .find(id)
        .await
        .map_err(ApiError::context("Failed to get game"))?;
    Ok(Json(game))
}

/// Human move followed, when due, by the automated reply.
#[instrument(skip(state, payload))]
pub(crate) async fn make_move(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<Game>, ApiError> {
    let id = parse_id(&id)?;
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Malformed move body");
        ApiError::bad_request(rejection.body_text())
    })?;
    let (row, col) = request.validate()?;

    let game = state
        .service()
        .play(id, row, col)
        .await
        .map_err(ApiError::context("Failed to make move"))?;
    Ok(Json(game))
}

/// A single move for the automated side.
#[instrument(skip(state))]
pub(crate) async fn ai_move(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Game>, ApiError> {
    let id = parse_id(&id)?;
    let game = state
        .service()
        .play_automated(id)
        .await
        .map_err(ApiError::context("Failed to make automated move"))?;
    Ok(Json(game))
}

/// Unknown route.
pub(crate) async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
