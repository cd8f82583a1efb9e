//! Upstream store subsystem.
//!
//! # Data Flow
//! ```text
//! route handler
//!     → client.rs (one HTTP call per operation)
//!     → upstream REST API (products, carts)
//!     → JSON body back to the handler, or UpstreamError
//! ```

pub mod client;
pub mod types;

pub use client::StoreClient;
pub use types::{CartProductRef, CartWrite, UpstreamError, UpstreamResult};
