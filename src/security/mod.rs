//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request on an authenticated route:
//!     → auth.rs (Authorization: Bearer <user id>)
//!     → user id handed to the handler
//! ```
//!
//! # Design Decisions
//! - Identity is checked before the body is read
//! - Fail closed: any malformed header is a 401

pub mod auth;

pub use auth::{extract_user_id, AuthError};
