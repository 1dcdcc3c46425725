//! Error handler for converting AppError to HTTP responses.
//!
//! `AppError` renders the `{"error": {"code", "message"}}` envelope and
//! stashes the `ErrorResponse` in the response extensions.
//! `global_error_handler` then attaches the request ID and converts any
//! remaining non-JSON error response (unknown route, wrong method, framework
//! rejections) into the same envelope.

use axum::{
    Json,
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::RequestId;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;

const UPSTREAM_MESSAGE: &str = "Failed to fetch data from PokeAPI";
const INTERNAL_MESSAGE: &str = "An unexpected error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        let code = error_to_code(&self);

        let body = match &self {
            AppError::Unauthorized { message, .. } | AppError::BadRequest { message, .. } => {
                ErrorResponse::new(code, message)
            }
            AppError::NotFound { entity, value } => {
                tracing::debug!(entity = %entity, value = %value, "Resource not found");
                ErrorResponse::new(code, &format!("{} not found", entity))
            }
            AppError::Upstream { source } => {
                tracing::error!(error = %source, "PokeAPI error");
                ErrorResponse::new(code, UPSTREAM_MESSAGE)
            }
            AppError::Configuration { key, source } => {
                tracing::error!(key = %key, error = ?source, "Configuration error");
                ErrorResponse::new(code, INTERNAL_MESSAGE)
            }
            AppError::Internal { source } => {
                tracing::error!(error = ?source, "Internal error");
                ErrorResponse::new(code, INTERNAL_MESSAGE)
            }
        };

        render(status, body)
    }
}

fn render(status: StatusCode, body: ErrorResponse) -> Response {
    let mut response = (status, Json(body.clone().into_envelope())).into_response();
    response.extensions_mut().insert(body);
    response
}

/// Maps an AppError variant to its corresponding HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        AppError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps an AppError variant to its error code string.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::Unauthorized { code, .. } | AppError::BadRequest { code, .. } => *code,
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::Upstream { .. } => "UPSTREAM_ERROR",
        AppError::Configuration { .. } => "CONFIGURATION_ERROR",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

/// Fallback code and message for error statuses produced outside `AppError`.
fn fallback_for(status: StatusCode) -> (&'static str, &'static str) {
    match status {
        StatusCode::BAD_REQUEST => ("INVALID_REQUEST", "Bad request - invalid or malformed request"),
        StatusCode::UNAUTHORIZED => ("UNAUTHORIZED", "Authentication required"),
        StatusCode::NOT_FOUND => ("NOT_FOUND", "The requested resource was not found"),
        StatusCode::METHOD_NOT_ALLOWED => {
            ("METHOD_NOT_ALLOWED", "HTTP method not allowed for this endpoint")
        }
        StatusCode::UNSUPPORTED_MEDIA_TYPE => ("UNSUPPORTED_MEDIA_TYPE", "Unsupported media type"),
        StatusCode::UNPROCESSABLE_ENTITY => ("INVALID_REQUEST", "Request body could not be processed"),
        StatusCode::PAYLOAD_TOO_LARGE => ("PAYLOAD_TOO_LARGE", "Request payload too large"),
        s if s.is_server_error() => ("INTERNAL_ERROR", INTERNAL_MESSAGE),
        _ => ("UNKNOWN_ERROR", "An unknown error occurred"),
    }
}

/// Outermost error middleware.
///
/// Responses rendered from `AppError` get the request ID added to their
/// body. Other error responses that are not already JSON are replaced with
/// the standard envelope so clients only ever see one error shape.
pub async fn global_error_handler(request: Request, next: Next) -> Response {
    let request_id = request.extensions().get::<RequestId>().cloned();
    let response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    if let Some(body) = response.extensions().get::<ErrorResponse>().cloned() {
        return match request_id {
            Some(RequestId(id)) => with_headers_of(response, status, body.with_request_id(&id)),
            None => response,
        };
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    if is_json {
        return response;
    }

    let (code, message) = fallback_for(status);
    let mut body = ErrorResponse::new(code, message);
    if let Some(RequestId(id)) = request_id {
        body = body.with_request_id(&id);
    }
    with_headers_of(response, status, body)
}

/// Headers that describe the old body and must not survive a re-render.
fn describes_body(name: &header::HeaderName) -> bool {
    name == header::CONTENT_TYPE
        || name == header::CONTENT_LENGTH
        || name == header::CONTENT_ENCODING
}

/// Re-render `body` while keeping headers set by inner layers (for example
/// `allow` on a 405).
fn with_headers_of(original: Response, status: StatusCode, body: ErrorResponse) -> Response {
    let (parts, _) = original.into_parts();
    let mut response = render(status, body);
    for (name, value) in parts.headers.iter() {
        if !describes_body(name) {
            response.headers_mut().insert(name.clone(), value.clone());
        }
    }
    response
}
