//! The fixed response.

use axum::http::StatusCode;

/// Answer any request with `200 OK` and an empty body.
///
/// The request is never inspected. hyper frames the empty body with
/// `content-length: 0` and adds its default `date` header.
pub async fn respond_ok() -> StatusCode {
    StatusCode::OK
}
