//! Store proxy library.
//!
//! A thin HTTP front for a third-party store API: requests are validated,
//! forwarded to the upstream `/products` and `/carts` endpoints, and the
//! upstream JSON is relayed back, reshaped where a route needs it.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routes;
pub mod security;
pub mod upstream;
pub mod validation;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
