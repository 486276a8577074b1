//! HTTP tests driving the router in-process.

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use raya_engine::{CenterThenRandom, Player};
use raya_server::{AppState, CorsPolicy, GameService, MemoryGameStore, router};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

const ORIGIN: &str = "http://localhost:3000";

fn app() -> Router {
    let service = GameService::new(
        Arc::new(MemoryGameStore::new()),
        Box::new(CenterThenRandom::with_seed(11)),
        Player::O,
    );
    router(
        AppState::new(Arc::new(service)),
        CorsPolicy::new(ORIGIN).unwrap(),
    )
}

fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn create(app: &Router) -> Value {
    let (status, game) = send(app, request(Method::POST, "/game", None)).await;
    assert_eq!(status, StatusCode::CREATED);
    game
}

fn game_uri(game: &Value, suffix: &str) -> String {
    format!("/game/{}{}", game["id"].as_str().unwrap(), suffix)
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, body) = send(&app, request(Method::GET, "/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_welcome_page_is_html() {
    let app = app();
    let response = app
        .oneshot(request(Method::GET, "/", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&bytes).contains("3 Raya"));
}

#[tokio::test]
async fn test_create_game_shape() {
    let app = app();
    let game = create(&app).await;

    assert_eq!(game["status"], "IN_PROGRESS");
    assert_eq!(game["currentPlayer"], "X");
    assert_eq!(
        game["board"],
        json!([["", "", ""], ["", "", ""], ["", "", ""]])
    );
    assert!(game["createdAt"].is_string());
    assert!(game["updatedAt"].is_string());
}

#[tokio::test]
async fn test_get_game() {
    let app = app();
    let game = create(&app).await;
    let (status, body) = send(&app, request(Method::GET, &game_uri(&game, ""), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], game["id"]);
}

#[tokio::test]
async fn test_get_game_bad_id() {
    let app = app();
    let (status, body) = send(&app, request(Method::GET, "/game/not-an-id", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "statusCode": 400,
            "message": "Invalid game ID format",
            "error": "Bad Request"
        })
    );
}

#[tokio::test]
async fn test_get_game_missing() {
    let app = app();
    let uri = "/game/6f1c1f0e-3b1a-4c55-9a55-0d2a1b7e9c01";
    let (status, body) = send(&app, request(Method::GET, uri, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Game not found");
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn test_move_gets_reply() {
    let app = app();
    let game = create(&app).await;

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            &game_uri(&game, "/move"),
            Some(json!({ "row": 0, "col": 0 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["board"][0][0], "X");
    assert_eq!(body["board"][1][1], "O");
    assert_eq!(body["currentPlayer"], "X");
    assert_eq!(body["status"], "IN_PROGRESS");
}

#[tokio::test]
async fn test_move_validation() {
    let app = app();
    let game = create(&app).await;
    let uri = game_uri(&game, "/move");

    for body in [
        json!({ "row": 3, "col": 0 }),
        json!({ "row": 0, "col": -1 }),
        json!({ "row": "a", "col": 0 }),
        json!({ "row": 1.5, "col": 0 }),
        json!({ "col": 0 }),
    ] {
        let (status, response) = send(&app, request(Method::POST, &uri, Some(body.clone()))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
        assert_eq!(response["statusCode"], 400);
    }

    let (status, _) = send(&app, request(Method::POST, &uri, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_occupied_cell() {
    let app = app();
    let game = create(&app).await;
    let uri = game_uri(&game, "/move");

    send(&app, request(Method::POST, &uri, Some(json!({ "row": 0, "col": 0 })))).await;
    let (status, body) =
        send(&app, request(Method::POST, &uri, Some(json!({ "row": 1, "col": 1 })))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid move: Cell (1, 1) is already occupied");
}

#[tokio::test]
async fn test_ai_move_out_of_turn() {
    let app = app();
    let game = create(&app).await;
    let (status, body) = send(&app, request(Method::POST, &game_uri(&game, "/ai-move"), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
}

#[tokio::test]
async fn test_list_and_history() {
    let app = app();
    for _ in 0..3 {
        create(&app).await;
    }

    let (status, all) = send(&app, request(Method::GET, "/game", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (status, two) = send(&app, request(Method::GET, "/game/history?limit=2", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(two.as_array().unwrap().len(), 2);

    let (status, open) = send(
        &app,
        request(Method::GET, "/game/history?status=IN_PROGRESS", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(open.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_history_validation() {
    let app = app();
    let (status, body) = send(&app, request(Method::GET, "/game/history?status=LOST", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid status value");

    for limit in ["0", "51"] {
        let uri = format!("/game/history?limit={}", limit);
        let (status, body) = send(&app, request(Method::GET, &uri, None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Limit must be between 1 and 50");
    }
}

#[tokio::test]
async fn test_preflight() {
    let app = app();
    let response = app
        .oneshot(request(Method::OPTIONS, "/game", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], ORIGIN);
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_METHODS],
        "GET, POST, PUT, DELETE, PATCH, OPTIONS"
    );
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
        "Content-Type, Authorization, X-Requested-With"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

#[tokio::test]
async fn test_cors_headers_on_normal_response() {
    let app = app();
    let response = app
        .oneshot(request(Method::GET, "/health", None))
        .await
        .unwrap();
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], ORIGIN);
}

#[tokio::test]
async fn test_unknown_route() {
    let app = app();
    let (status, body) = send(&app, request(Method::GET, "/nowhere", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["statusCode"], 404);
}
