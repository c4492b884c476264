//! API response helpers
//!
//! Successful responses wrap their payload as `{ "data": ... }`, failures are reported as
//! `{ "error": "...", "description": "..." }`.

use std::fmt::Display;

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use serde::Serialize;

use crate::storage::Error as StorageError;

/// Hold data for a successful API interaction
pub struct Success<V> {
    status_code: StatusCode,
    data: Option<V>,
}

impl<V: Serialize> Success<V> {
    pub fn ok(data: V) -> Self {
        Self {
            status_code: StatusCode::OK,
            data: Some(data),
        }
    }

    pub fn created(data: V) -> Self {
        Self {
            status_code: StatusCode::CREATED,
            data: Some(data),
        }
    }
}

impl Success<()> {
    /// Nothing to report, no body at all
    pub fn no_content() -> Self {
        Self {
            status_code: StatusCode::NO_CONTENT,
            data: None,
        }
    }
}

#[derive(Serialize)]
struct Envelope<D> {
    data: D,
}

impl<V: Serialize> IntoResponse for Success<V> {
    fn into_response(self) -> Response {
        match self.data {
            Some(data) => (self.status_code, Json(Envelope { data })).into_response(),
            None => self.status_code.into_response(),
        }
    }
}

/// Body of a failed API interaction
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

/// Hold data for a failed API interaction
#[derive(Debug)]
pub struct Error {
    status_code: StatusCode,
    body: ErrorBody,
}

impl Error {
    fn new(status_code: StatusCode, message: impl Display) -> Self {
        Self {
            status_code,
            body: ErrorBody {
                error: message.to_string(),
                description: None,
            },
        }
    }

    pub fn bad_request(message: impl Display) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Display) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Display) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Display) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal_server_error(message: impl Display) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// The storage failed, details stay in the logs
    ///
    /// A slug taken by a concurrent write is still a client error
    pub fn storage(err: StorageError) -> Self {
        if let StorageError::DuplicateSlug(_) = err {
            return Self::bad_request("Slug already exists");
        }

        tracing::error!("Storage error: {err}");

        Self::internal_server_error("Storage error")
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Display) -> Self {
        self.body.description = Some(description.to_string());
        self
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.status_code, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    async fn body_of(response: Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();

        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_error_body() {
        let response = Error::bad_request("Invalid year")
            .with_description("invalid digit found in string")
            .into_response();

        assert_eq!(StatusCode::BAD_REQUEST, response.status());
        assert_eq!(
            serde_json::json!({
                "error": "Invalid year",
                "description": "invalid digit found in string",
            }),
            body_of(response).await
        );
    }

    #[tokio::test]
    async fn test_storage_error_hides_details() {
        let response =
            Error::storage(StorageError::Connection(String::from("password mismatch")))
                .into_response();

        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, response.status());
        assert_eq!(
            serde_json::json!({ "error": "Storage error" }),
            body_of(response).await
        );
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_a_bad_request() {
        let response =
            Error::storage(StorageError::DuplicateSlug(String::from("paris-2026"))).into_response();

        assert_eq!(StatusCode::BAD_REQUEST, response.status());
        assert_eq!(
            serde_json::json!({ "error": "Slug already exists" }),
            body_of(response).await
        );
    }

    #[tokio::test]
    async fn test_no_content_has_no_body() {
        let response = Success::no_content().into_response();

        assert_eq!(StatusCode::NO_CONTENT, response.status());
        assert!(response.into_body().collect().await.unwrap().to_bytes().is_empty());
    }
}
