//! Feature facade: invoke catalog features by path.
//!
//! `FeatureClient` loads the endpoint catalog on first use and keeps it for
//! its lifetime. Concurrent first uses may each fetch the catalog; whichever
//! finishes last is kept, and both results are equivalent.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use az_core::config::{AuthScheme, ClientConfig};
use az_core::error::{AzError, AzResult};

use crate::client::{ApiClient, Params, RequestOptions};
use crate::endpoints::catalog::{CatalogIndex, EndpointDescriptor};
use crate::method::HttpMethod;
use crate::response::NormalizedResponse;

/// Top-level client: catalog lookup plus dispatch.
pub struct FeatureClient {
    api: ApiClient,
    catalog: RwLock<Option<Arc<CatalogIndex>>>,
}

impl FeatureClient {
    /// Create a facade from client configuration.
    pub fn new(config: &ClientConfig) -> AzResult<Self> {
        Ok(Self::from_api(ApiClient::new(config)?))
    }

    /// Create a facade for `api_key`, optionally against a non-default base URL.
    pub fn with_api_key(
        api_key: impl Into<String>,
        scheme: AuthScheme,
        base_url: Option<&str>,
    ) -> AzResult<Self> {
        Self::new(&ClientConfig::with_api_key(api_key, scheme, base_url))
    }

    /// Wrap an existing transport.
    pub fn from_api(api: ApiClient) -> Self {
        Self {
            api,
            catalog: RwLock::new(None),
        }
    }

    /// The underlying transport, for explicit-method calls.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Whether the catalog has been loaded yet.
    pub async fn is_catalog_loaded(&self) -> bool {
        self.catalog.read().await.is_some()
    }

    /// Return the cached catalog, fetching it on first use.
    ///
    /// The lock is not held across the fetch. A failed fetch leaves the
    /// cache empty so the next call tries again.
    async fn catalog(&self) -> AzResult<Arc<CatalogIndex>> {
        if let Some(index) = self.catalog.read().await.as_ref() {
            return Ok(Arc::clone(index));
        }

        let index = Arc::new(self.api.fetch_catalog_index().await?);
        info!(
            "endpoint catalog loaded: {} endpoints in {} categories",
            index.len(),
            index.categories().len()
        );

        *self.catalog.write().await = Some(Arc::clone(&index));
        Ok(index)
    }

    /// Invoke the catalog feature whose path equals `path`.
    ///
    /// Fails with `FeatureNotFound` if no descriptor matches and with
    /// `UnsupportedMethod` if it declares anything but GET or POST.
    pub async fn call(&self, path: &str, params: &Params) -> AzResult<NormalizedResponse> {
        let catalog = self.catalog().await?;
        let feature = catalog
            .find_by_path(path)
            .ok_or_else(|| AzError::FeatureNotFound(path.to_string()))?;
        self.dispatch(feature, params).await
    }

    async fn dispatch(
        &self,
        feature: &EndpointDescriptor,
        params: &Params,
    ) -> AzResult<NormalizedResponse> {
        let method = match feature.http_method()? {
            m @ (HttpMethod::Get | HttpMethod::Post) => m,
            other => return Err(AzError::UnsupportedMethod(other.to_string())),
        };
        debug!("dispatching {} ({}) via {}", feature.name, feature.path, method);
        self.api
            .send(&feature.path, method, params, &RequestOptions::default())
            .await
    }

    /// Call `path` with an explicit method, bypassing the catalog.
    pub async fn call_method(
        &self,
        path: &str,
        method: HttpMethod,
        params: &Params,
    ) -> AzResult<NormalizedResponse> {
        self.api
            .send(path, method, params, &RequestOptions::default())
            .await
    }

    /// Descriptors in `category`; empty if the category is unknown.
    pub async fn list(&self, category: &str) -> AzResult<Vec<EndpointDescriptor>> {
        Ok(self.catalog().await?.by_category(category).to_vec())
    }

    /// Distinct categories in catalog order.
    pub async fn categories(&self) -> AzResult<Vec<String>> {
        Ok(self.catalog().await?.categories().to_vec())
    }

    /// Every descriptor, grouped by category.
    pub async fn endpoints(&self) -> AzResult<Vec<EndpointDescriptor>> {
        Ok(self.catalog().await?.iter().cloned().collect())
    }
}
