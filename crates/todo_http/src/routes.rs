//! Todo routes and handlers.
//!
//! Handlers decode the request, run one use-case through `AppState`, and
//! render the result. Decoding failures are `InvalidParameter`.

use crate::presenter;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use axum::{middleware, Json, Router};
use log::{info, warn};
use serde::Serialize;
use serde_json::json;
use todo_core::{AppError, AppResult, TodoInput};

/// Builds the full HTTP router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/todos", get(fetch_todos).post(create_todo))
        .route(
            "/todos/:id",
            get(fetch_todo).put(update_todo).delete(delete_todo),
        )
        .layer(middleware::from_fn(crate::cors::cors))
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<TodoInput>, JsonRejection>,
) -> Response {
    let input = match decode_body("create_todo", payload) {
        Ok(input) => input,
        Err(err) => return presenter::error_json(err),
    };

    let result = state
        .run("create_todo", move |service| service.create_todo(&input))
        .await;
    respond("create_todo", StatusCode::CREATED, result)
}

async fn fetch_todos(State(state): State<AppState>) -> Response {
    let result = state
        .run("fetch_todos", |service| service.fetch_todos())
        .await;
    respond("fetch_todos", StatusCode::OK, result)
}

async fn fetch_todo(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    let id = match parse_id("fetch_todo", &raw_id) {
        Ok(id) => id,
        Err(err) => return presenter::error_json(err),
    };

    let result = state
        .run("fetch_todo", move |service| service.fetch_todo(id))
        .await;
    respond("fetch_todo", StatusCode::OK, result)
}

async fn update_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<TodoInput>, JsonRejection>,
) -> Response {
    let id = match parse_id("update_todo", &raw_id) {
        Ok(id) => id,
        Err(err) => return presenter::error_json(err),
    };
    let mut input = match decode_body("update_todo", payload) {
        Ok(input) => input,
        Err(err) => return presenter::error_json(err),
    };
    // The path id wins over any id in the body.
    input.id = id;

    let result = state
        .run("update_todo", move |service| service.update_todo(&input))
        .await;
    respond("update_todo", StatusCode::OK, result)
}

async fn delete_todo(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    let id = match parse_id("delete_todo", &raw_id) {
        Ok(id) => id,
        Err(err) => return presenter::error_json(err),
    };

    let result = state
        .run("delete_todo", move |service| service.delete_todo(id))
        .await
        .map(|()| json!({ "message": "deleted" }));
    respond("delete_todo", StatusCode::OK, result)
}

fn decode_body(
    operation: &str,
    payload: Result<Json<TodoInput>, JsonRejection>,
) -> AppResult<TodoInput> {
    payload.map(|Json(input)| input).map_err(|rejection| {
        warn!("event=http_request module=http status=rejected operation={operation} reason={rejection}");
        AppError::InvalidParameter
    })
}

fn parse_id(operation: &str, raw_id: &str) -> AppResult<i64> {
    raw_id.parse::<i64>().map_err(|_| {
        warn!("event=http_request module=http status=rejected operation={operation} reason=bad_id");
        AppError::InvalidParameter
    })
}

fn respond<T: Serialize>(operation: &str, success: StatusCode, result: AppResult<T>) -> Response {
    match result {
        Ok(body) => {
            info!(
                "event=http_request module=http status=ok operation={operation} code={}",
                success.as_u16()
            );
            presenter::json(success, &body)
        }
        Err(err) => {
            info!(
                "event=http_request module=http status=error operation={operation} code={} error={err}",
                err.status_code()
            );
            presenter::error_json(err)
        }
    }
}
