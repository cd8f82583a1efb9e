//! Route handlers.
//!
//! Every handler follows the same shape:
//! ```text
//! [identity] → parse body → validate fields → upstream call → reshape
//! ```
//! wrapped in `http::error::guard` with its operation name.

pub mod carts;
pub mod health;
pub mod products;

use axum::{routing::get, Router};

use crate::http::AppState;

/// All store routes, before state and middleware are attached.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthcheck", get(health::healthcheck))
        .merge(products::routes())
        .merge(carts::routes())
}
