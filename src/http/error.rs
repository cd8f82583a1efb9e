//! Error translation for route handlers.
//!
//! # Responsibilities
//! - Name each route operation for logs and messages
//! - Log every handler failure once, with its operation
//! - Map validation/auth failures to 400/401 with their own message
//! - Map upstream 404 to a 404 naming the resource and id
//! - Hide everything else behind a generic 500
//!
//! # Design Decisions
//! - Every error body is `{"detail": "<message>"}`
//! - Internal detail never reaches the caller on 500s

use std::future::Future;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reqwest::StatusCode as UpstreamStatus;
use serde_json::json;
use thiserror::Error;
use url::Url;

use crate::security::AuthError;
use crate::upstream::UpstreamError;
use crate::validation::ValidationError;

/// Route operations, as named in logs and 500 messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetAllProducts,
    GetProduct,
    GetAllCarts,
    GetCart,
    CreateCart,
    UpdateCart,
    DeleteCart,
    ManageCart,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::GetAllProducts => "get all products",
            Operation::GetProduct => "get product",
            Operation::GetAllCarts => "get all carts",
            Operation::GetCart => "get cart",
            Operation::CreateCart => "create cart",
            Operation::UpdateCart => "update cart",
            Operation::DeleteCart => "delete cart",
            Operation::ManageCart => "manage cart",
        }
    }

    /// Resource name used in not-found messages.
    pub fn resource(&self) -> &'static str {
        match self {
            Operation::GetAllProducts | Operation::GetProduct => "Product",
            _ => "Cart",
        }
    }

    /// Last path segment of this resource's collection URL.
    fn collection(&self) -> &'static str {
        match self {
            Operation::GetAllProducts | Operation::GetProduct => "products",
            _ => "carts",
        }
    }
}

/// What a handler body can fail with before translation.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Client-facing error. Renders as `{"detail": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    BadRequest(ValidationError),

    #[error(transparent)]
    Unauthorized(AuthError),

    #[error("{0}")]
    NotFound(String),

    #[error("Failed to {}", .0.as_str())]
    UpstreamFailure(Operation),

    #[error("An unexpected error occurred")]
    Unexpected,
}

impl ApiError {
    /// Translate a handler failure for `operation`.
    pub fn translate(operation: Operation, error: HandlerError) -> Self {
        match error {
            HandlerError::Validation(e) => ApiError::BadRequest(e),
            HandlerError::Auth(e) => ApiError::Unauthorized(e),
            HandlerError::Upstream(UpstreamError::Status { status, url })
                if status == UpstreamStatus::NOT_FOUND =>
            {
                ApiError::NotFound(not_found_detail(operation, &url))
            }
            HandlerError::Upstream(UpstreamError::Status { .. }) => {
                ApiError::UpstreamFailure(operation)
            }
            HandlerError::Upstream(_) => ApiError::Unexpected,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UpstreamFailure(_) | ApiError::Unexpected => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(json!({ "detail": self.to_string() })),
        )
            .into_response()
    }
}

/// The id is whatever follows the collection in the failing URL.
fn not_found_detail(operation: Operation, url: &Url) -> String {
    let resource = operation.resource();
    let id = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|last| !last.is_empty() && *last != operation.collection());

    match id {
        Some(id) => format!("{} with ID {} not found", resource, id),
        None => format!("{} not found", resource),
    }
}

/// Run a handler body, logging and translating any failure.
pub async fn guard<T, F>(operation: Operation, body: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, HandlerError>>,
{
    body.await.map_err(|error| {
        match &error {
            HandlerError::Validation(_) | HandlerError::Auth(_) => {
                tracing::warn!(operation = operation.as_str(), error = %error, "Request rejected");
            }
            HandlerError::Upstream(e) if e.status() == Some(UpstreamStatus::NOT_FOUND) => {
                tracing::error!(operation = operation.as_str(), error = %error, "Not found upstream");
            }
            HandlerError::Upstream(UpstreamError::Status { .. }) => {
                tracing::error!(operation = operation.as_str(), error = %error, "Upstream HTTP error");
            }
            HandlerError::Upstream(_) => {
                tracing::error!(operation = operation.as_str(), error = %error, "Unexpected error");
            }
        }
        ApiError::translate(operation, error)
    })
}
