//! CORS layer built from configuration.

use axum::http::{HeaderName, HeaderValue, Method};
use regex::Regex;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

use crate::config::CorsConfig;

const ALLOWED_METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
];

/// Compile an origin pattern so it must match the whole origin.
pub fn compile_origin_regex(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", pattern))
}

/// Build the CORS layer, or `None` when no origin is allowed.
///
/// Wildcards mirror the request instead of answering `*`, which browsers
/// refuse in combination with credentials.
pub fn cors_layer(config: &CorsConfig) -> Option<CorsLayer> {
    let pattern = config.allow_origin_regex.as_deref().and_then(|p| {
        compile_origin_regex(p)
            .inspect_err(|e| tracing::warn!(pattern = %p, error = %e, "Skipping invalid CORS origin regex"))
            .ok()
    });

    if config.allow_origins.is_empty() && pattern.is_none() {
        return None;
    }

    let origin = if config.allow_origins.iter().any(|o| o == "*") {
        AllowOrigin::mirror_request()
    } else {
        let listed: Vec<HeaderValue> = config
            .allow_origins
            .iter()
            .filter_map(|o| {
                HeaderValue::from_str(o)
                    .inspect_err(|_| tracing::warn!(origin = %o, "Skipping invalid CORS origin"))
                    .ok()
            })
            .collect();

        match pattern {
            None => AllowOrigin::list(listed),
            Some(pattern) => AllowOrigin::predicate(move |origin: &HeaderValue, _| {
                listed.contains(origin)
                    || origin.to_str().is_ok_and(|o| pattern.is_match(o))
            }),
        }
    };

    let headers = if config.allow_headers.iter().any(|h| h == "*") {
        AllowHeaders::mirror_request()
    } else {
        AllowHeaders::list(config.allow_headers.iter().filter_map(|h| {
            HeaderName::from_bytes(h.as_bytes())
                .inspect_err(|_| tracing::warn!(header = %h, "Skipping invalid CORS header"))
                .ok()
        }))
    };

    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(ALLOWED_METHODS)
            .allow_headers(headers)
            .allow_credentials(config.allow_credentials),
    )
}
