//! JSON response rendering.

use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use serde::Serialize;
use serde_json::json;
use todo_core::AppError;

const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Renders `body` as JSON with `status`.
pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (status, [(CONTENT_TYPE, JSON_CONTENT_TYPE)], bytes).into_response(),
        Err(err) => {
            error!("event=http_render module=http status=error error={err}");
            error_json(AppError::InternalServerError)
        }
    }
}

/// Renders a classified error as `{"error": code, "message": text}`.
pub fn error_json(err: AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = json!({
        "error": err.code(),
        "message": error_message(err),
    });
    (status, [(CONTENT_TYPE, JSON_CONTENT_TYPE)], body.to_string()).into_response()
}

fn error_message(err: AppError) -> &'static str {
    match err {
        AppError::InvalidParameter => "invalid parameter",
        AppError::TodoNotFound => "todo not found",
        AppError::InternalServerError => "internal server error",
    }
}
