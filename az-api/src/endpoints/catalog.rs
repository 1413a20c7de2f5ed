//! Endpoint catalog: the server's self-description at `/endpoint`.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use az_core::constants;
use az_core::error::{AzError, AzResult};

use crate::client::{ApiClient, Params};
use crate::method::HttpMethod;
use crate::response::NormalizedResponse;

/// One remotely invocable feature as described by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    pub category: String,
    pub name: String,
    pub path: String,
    pub method: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parameters: Vec<String>,
    #[serde(default, deserialize_with = "string_map")]
    pub example: BTreeMap<String, String>,
    /// Whether the endpoint accepts file uploads.
    #[serde(default, deserialize_with = "null_as_default")]
    pub files: bool,
    /// Whether the server currently flags the endpoint as broken.
    #[serde(default, deserialize_with = "null_as_default")]
    pub error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl EndpointDescriptor {
    /// Parse the declared method.
    pub fn http_method(&self) -> AzResult<HttpMethod> {
        self.method.parse()
    }
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Example values are documented as strings but the server occasionally
/// sends numbers or booleans; render those as their JSON text.
fn string_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| match v {
            serde_json::Value::String(s) => (k, s),
            other => (k, other.to_string()),
        })
        .collect())
}

/// Descriptors grouped by category, categories in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    order: Vec<String>,
    groups: HashMap<String, Vec<EndpointDescriptor>>,
}

impl CatalogIndex {
    /// Build an index from a flat descriptor list.
    pub fn from_descriptors(descriptors: Vec<EndpointDescriptor>) -> Self {
        let mut index = Self::default();
        for descriptor in descriptors {
            match index.groups.get_mut(&descriptor.category) {
                Some(group) => group.push(descriptor),
                None => {
                    index.order.push(descriptor.category.clone());
                    index
                        .groups
                        .insert(descriptor.category.clone(), vec![descriptor]);
                }
            }
        }
        index
    }

    /// Descriptors in a category; empty when the category is unknown.
    pub fn by_category(&self, category: &str) -> &[EndpointDescriptor] {
        self.groups
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> &[String] {
        &self.order
    }

    /// Find the descriptor whose path equals `path` exactly.
    pub fn find_by_path(&self, path: &str) -> Option<&EndpointDescriptor> {
        self.iter().find(|d| d.path == path)
    }

    /// All descriptors, grouped by category.
    pub fn iter(&self) -> impl Iterator<Item = &EndpointDescriptor> {
        self.order.iter().flat_map(move |c| self.by_category(c).iter())
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Distinct categories of `descriptors`, in first-seen order.
pub fn distinct_categories(descriptors: &[EndpointDescriptor]) -> Vec<String> {
    let mut seen = Vec::new();
    for d in descriptors {
        if !seen.contains(&d.category) {
            seen.push(d.category.clone());
        }
    }
    seen
}

impl ApiClient {
    /// Fetch every endpoint descriptor from the catalog.
    pub async fn fetch_all_endpoints(&self) -> AzResult<Vec<EndpointDescriptor>> {
        let resp = self
            .get(constants::ENDPOINT_CATALOG_PATH, &Params::new())
            .await?;
        let descriptors: Vec<EndpointDescriptor> = match resp {
            NormalizedResponse::Json(envelope) => envelope.into_result()?,
            NormalizedResponse::Binary(bytes) => {
                return Err(AzError::UnexpectedResponseShape(format!(
                    "endpoint catalog returned {} bytes of binary data",
                    bytes.len()
                )))
            }
        };
        debug!("fetched {} endpoint descriptors", descriptors.len());
        Ok(descriptors)
    }

    /// Fetch the catalog and keep descriptors in `category` (exact match).
    pub async fn endpoints_by_category(&self, category: &str) -> AzResult<Vec<EndpointDescriptor>> {
        Ok(self
            .fetch_all_endpoints()
            .await?
            .into_iter()
            .filter(|d| d.category == category)
            .collect())
    }

    /// Fetch the catalog and list its distinct categories.
    pub async fn endpoint_categories(&self) -> AzResult<Vec<String>> {
        let descriptors = self.fetch_all_endpoints().await?;
        Ok(distinct_categories(&descriptors))
    }

    /// Fetch the catalog and group it.
    pub async fn fetch_catalog_index(&self) -> AzResult<CatalogIndex> {
        Ok(CatalogIndex::from_descriptors(self.fetch_all_endpoints().await?))
    }
}
