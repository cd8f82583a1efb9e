//! Store REST client.
//!
//! # Responsibilities
//! - Issue product and cart calls against the configured base URL
//! - Turn non-2xx replies into `UpstreamError::Status` with the failing URL
//! - Decode successful bodies as JSON and hand them back untouched
//!
//! # Design Decisions
//! - One call per operation: no retries, no timeout beyond reqwest's defaults
//! - Bodies stay `serde_json::Value` so upstream fields are relayed as-is

use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::upstream::types::{CartWrite, UpstreamError, UpstreamResult};
use crate::validation::ResourceId;

const PRODUCTS: &str = "products";
const CARTS: &str = "carts";

/// Client for the upstream store API.
#[derive(Clone)]
pub struct StoreClient {
    http: Client,
    base_url: Url,
}

impl StoreClient {
    /// Create a client rooted at `config.base_url`.
    pub fn new(config: &UpstreamConfig) -> UpstreamResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| UpstreamError::BaseUrl(format!("'{}': {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::BaseUrl(config.base_url.clone()));
        }

        let http = Client::builder()
            .user_agent(concat!("store-proxy/", env!("CARGO_PKG_VERSION")))
            .build()?;

        tracing::info!(base_url = %base_url, "Store client initialized");
        Ok(Self { http, base_url })
    }

    pub async fn list_products(&self) -> UpstreamResult<Value> {
        self.call(Method::GET, &[PRODUCTS], None::<&()>).await
    }

    pub async fn get_product(&self, id: &ResourceId) -> UpstreamResult<Value> {
        self.call(Method::GET, &[PRODUCTS, &id.to_string()], None::<&()>)
            .await
    }

    pub async fn list_carts(&self) -> UpstreamResult<Value> {
        self.call(Method::GET, &[CARTS], None::<&()>).await
    }

    pub async fn get_cart(&self, id: &ResourceId) -> UpstreamResult<Value> {
        self.call(Method::GET, &[CARTS, &id.to_string()], None::<&()>)
            .await
    }

    pub async fn create_cart(&self, cart: &CartWrite) -> UpstreamResult<Value> {
        self.call(Method::POST, &[CARTS], Some(cart)).await
    }

    pub async fn update_cart(&self, id: &ResourceId, cart: &CartWrite) -> UpstreamResult<Value> {
        self.call(Method::PUT, &[CARTS, &id.to_string()], Some(cart))
            .await
    }

    pub async fn delete_cart(&self, id: &ResourceId) -> UpstreamResult<Value> {
        self.call(Method::DELETE, &[CARTS, &id.to_string()], None::<&()>)
            .await
    }

    /// Build `base_url/<segments...>`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> UpstreamResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::BaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn call<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> UpstreamResult<Value> {
        let url = self.endpoint(segments)?;
        tracing::debug!(method = %method, url = %url, "Calling upstream");

        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(method = %method, url = %url, error = %e, "Upstream unreachable");
                metrics::record_upstream(method.as_str(), None);
                return Err(e.into());
            }
        };

        let status = response.status();
        metrics::record_upstream(method.as_str(), Some(status.as_u16()));

        if !status.is_success() {
            tracing::warn!(method = %method, url = %url, status = %status, "Upstream returned error status");
            return Err(UpstreamError::Status {
                status,
                url: response.url().clone(),
            });
        }

        response.json::<Value>().await.map_err(|e| {
            tracing::warn!(method = %method, url = %url, error = %e, "Undecodable upstream body");
            UpstreamError::from(e)
        })
    }
}
