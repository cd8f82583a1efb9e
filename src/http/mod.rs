//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → request.rs (request ID, request span)
//!     → middleware/ (CORS)
//!     → server.rs (Axum router, body limit)
//!     → routes (handlers, wrapped by error.rs)
//!     → JSON response
//! ```

pub mod error;
pub mod middleware;
pub mod request;
pub mod server;

pub use error::{guard, ApiError, HandlerError, Operation};
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
