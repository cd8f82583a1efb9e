//! Store types and upstream error definitions.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// A product reference inside a cart, in the upstream's write format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartProductRef {
    pub id: u64,

    /// Absent means the upstream default of 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u64>,
}

/// Body sent to the upstream when creating or replacing a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartWrite {
    pub user_id: u64,
    pub products: Vec<CartProductRef>,
}

/// Errors that can occur while talking to the upstream store.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The upstream answered with a non-2xx status.
    #[error("upstream returned {status} for {url}")]
    Status { status: StatusCode, url: Url },

    /// Connection, TLS or body decoding failure.
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The configured base URL cannot carry a path.
    #[error("invalid upstream base URL: {0}")]
    BaseUrl(String),
}

impl UpstreamError {
    /// Status of a non-2xx reply, if that is what this error is.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;
