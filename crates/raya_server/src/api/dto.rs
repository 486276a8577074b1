//! Request and response bodies.

use super::ApiError;
use raya_engine::{BOARD_SIZE, GameStatus};
use serde::{Deserialize, Serialize};

/// Default number of games returned by the history endpoint.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Largest accepted history limit.
pub const MAX_HISTORY_LIMIT: usize = 50;

/// Health check response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the server is up.
    pub status: String,
}

impl HealthResponse {
    /// The healthy response.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Query string of `GET /game/history`.
///
/// Kept as raw strings so that each problem gets its own message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryParams {
    /// Maximum number of games, `1..=50`.
    pub limit: Option<String>,
    /// Status wire value to filter on.
    pub status: Option<String>,
}

impl HistoryParams {
    /// Checks the parameters and returns the limit and status filter.
    ///
    /// An empty value counts as absent.
    pub fn validate(&self) -> Result<(usize, Option<GameStatus>), ApiError> {
        let limit = match self.limit.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<i64>().map_err(|_| {
                ApiError::bad_request("Validation failed (numeric string is expected)")
            })?),
        };

        let status = match self.status.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<GameStatus>()
                    .map_err(|_| ApiError::bad_request("Invalid status value"))?,
            ),
        };

        let limit = match limit {
            None => DEFAULT_HISTORY_LIMIT,
            Some(n) => usize::try_from(n)
                .ok()
                .filter(|n| (1..=MAX_HISTORY_LIMIT).contains(n))
                .ok_or_else(|| ApiError::bad_request("Limit must be between 1 and 50"))?,
        };

        Ok((limit, status))
    }
}

/// Body of `POST /game/{id}/move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Row index.
    pub row: i64,
    /// Column index.
    pub col: i64,
}

impl MoveRequest {
    /// Checks both coordinates lie in `0..=2`.
    pub fn validate(&self) -> Result<(usize, usize), ApiError> {
        Ok((coordinate("row", self.row)?, coordinate("col", self.col)?))
    }
}

fn coordinate(name: &str, value: i64) -> Result<usize, ApiError> {
    if value < 0 {
        return Err(ApiError::bad_request(format!("{} must not be less than 0", name)));
    }
    let max = BOARD_SIZE - 1;
    usize::try_from(value)
        .ok()
        .filter(|v| *v <= max)
        .ok_or_else(|| ApiError::bad_request(format!("{} must not be greater than {}", name, max)))
}
