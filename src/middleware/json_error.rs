use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::response::JsonApiResponse;

const ERROR_BODY_LIMIT: usize = 16 * 1024;

/// Rewrites plain-text error responses (axum extractor rejections, unmatched
/// routes, wrong methods) into the JSON envelope.
pub async fn json_error_middleware(req: Request, next: Next) -> Response {
    let response = next.run(req).await;
    if !needs_envelope(&response) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let message = describe(parts.status, body).await;

    // Original status is kept; 405 and 422 have no AppError variant.
    let (envelope, json_body) = JsonApiResponse::failure(parts.status, &message)
        .into_response()
        .into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    if let Some(content_type) = envelope.headers.get(header::CONTENT_TYPE) {
        parts.headers.insert(header::CONTENT_TYPE, content_type.clone());
    }
    Response::from_parts(parts, json_body)
}

fn needs_envelope(response: &Response) -> bool {
    let status = response.status();
    (status.is_client_error() || status.is_server_error()) && !declares_json(response.headers())
}

fn declares_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| {
            let value = value.to_ascii_lowercase();
            value.starts_with("application/json") || value.contains("+json")
        })
}

/// The rejection text when there is one, else the status reason phrase.
async fn describe(status: StatusCode, body: Body) -> String {
    let text = match to_bytes(body, ERROR_BODY_LIMIT).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).trim().to_string(),
        Err(_) => String::new(),
    };
    if !text.is_empty() {
        return text;
    }
    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}
