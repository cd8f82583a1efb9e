//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, CORS, body limit, metrics)
//! - Bind server to listener
//! - Stop accepting on shutdown and drain in-flight requests

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    middleware,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::{CartsConfig, ProxyConfig};
use crate::http::middleware::cors_layer;
use crate::http::request::{propagate_request_id_layer, request_span, set_request_id_layer};
use crate::lifecycle::shutdown::signalled;
use crate::observability::metrics;
use crate::routes;
use crate::upstream::{StoreClient, UpstreamResult};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: StoreClient,
    pub carts: CartsConfig,
}

/// HTTP server for the store proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> UpstreamResult<Self> {
        let state = AppState {
            store: StoreClient::new(&config.upstream)?,
            carts: config.carts.clone(),
        };

        Ok(Self {
            router: build_router(&config, state),
        })
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(signalled(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(config: &ProxyConfig, state: AppState) -> Router {
    let mut router = routes::router()
        .route_layer(middleware::from_fn(metrics::track_requests))
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.security.max_body_size));

    if let Some(cors) = cors_layer(&config.cors) {
        router = router.layer(cors);
    }

    router
        .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| request_span(req)))
        .layer(propagate_request_id_layer())
        .layer(set_request_id_layer())
}
