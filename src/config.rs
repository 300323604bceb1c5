use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::credentials::Credentials;
use crate::error::{Result, StoreError};
use crate::resource::ResourceKind;

/// Production endpoint used when no base URL is configured
pub const DEFAULT_BASE_URL: &str = "https://app.greatexpectations.io/";

/// Name reported in the config snapshot
pub const BACKEND_CLASS_NAME: &str = "CloudStoreBackend";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_true() -> bool {
    true
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Construction options for a cloud store backend.
///
/// Either `resource_kind` or `resource_name` must be set; the other is
/// derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    pub credentials: Credentials,

    #[serde(default)]
    pub resource_kind: Option<ResourceKind>,

    /// Plural resource name, used verbatim (hyphenated) in URLs
    #[serde(default)]
    pub resource_name: Option<String>,

    #[serde(default = "default_true")]
    pub suppress_store_backend_id: bool,

    #[serde(default)]
    pub manually_initialize_store_backend_id: Option<String>,

    #[serde(default)]
    pub store_name: Option<String>,
}

impl BackendSettings {
    /// Create settings with the default base URL and no resource selected
    pub fn new(credentials: Credentials) -> Self {
        BackendSettings {
            base_url: default_base_url(),
            credentials,
            resource_kind: None,
            resource_name: None,
            suppress_store_backend_id: true,
            manually_initialize_store_backend_id: None,
            store_name: None,
        }
    }

    /// Rebuild settings from a config snapshot and fresh credentials
    pub fn from_config(config: &BackendConfig, credentials: Credentials) -> Self {
        BackendSettings {
            base_url: config.base_url.clone(),
            credentials,
            resource_kind: Some(config.resource_kind),
            resource_name: Some(config.resource_name.clone()),
            suppress_store_backend_id: config.suppress_store_backend_id,
            manually_initialize_store_backend_id: config
                .manually_initialize_store_backend_id
                .clone(),
            store_name: config.store_name.clone(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_resource_kind(mut self, kind: ResourceKind) -> Self {
        self.resource_kind = Some(kind);
        self
    }

    pub fn with_resource_name(mut self, name: impl Into<String>) -> Self {
        self.resource_name = Some(name.into());
        self
    }

    pub fn with_suppress_store_backend_id(mut self, suppress: bool) -> Self {
        self.suppress_store_backend_id = suppress;
        self
    }

    /// Use a fixed store backend id instead of minting one
    pub fn with_store_backend_id(mut self, id: impl Into<String>) -> Self {
        self.manually_initialize_store_backend_id = Some(id.into());
        self
    }

    pub fn with_store_name(mut self, name: impl Into<String>) -> Self {
        self.store_name = Some(name.into());
        self
    }

    /// Cross-derive the resource kind and plural resource name
    pub fn resolve_resource(&self) -> Result<(ResourceKind, String)> {
        let name = non_empty(self.resource_name.clone());
        match (self.resource_kind, name) {
            (Some(kind), Some(name)) => Ok((kind, name)),
            (Some(kind), None) => Ok((kind, kind.resource_name().to_string())),
            (None, Some(name)) => ResourceKind::from_resource_name(&name)
                .map(|kind| (kind, name.clone()))
                .ok_or_else(|| {
                    StoreError::configuration(format!("unknown resource name: {}", name))
                }),
            (None, None) => Err(StoreError::configuration(
                "must provide either resource type or resource name",
            )),
        }
    }

    /// Build the config snapshot once the resource has been resolved
    pub(crate) fn snapshot(&self, kind: ResourceKind, name: String) -> BackendConfig {
        BackendConfig {
            base_url: self.base_url.clone(),
            resource_kind: kind,
            resource_name: name,
            fixed_length_key: true,
            suppress_store_backend_id: self.suppress_store_backend_id,
            manually_initialize_store_backend_id: non_empty(
                self.manually_initialize_store_backend_id.clone(),
            ),
            store_name: non_empty(self.store_name.clone()),
            class_name: BACKEND_CLASS_NAME.to_string(),
        }
    }
}

/// Snapshot of a constructed backend's configuration.
///
/// Serializes with falsy entries pruned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base_url: String,

    pub resource_kind: ResourceKind,

    pub resource_name: String,

    #[serde(default, skip_serializing_if = "is_false")]
    pub fixed_length_key: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub suppress_store_backend_id: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manually_initialize_store_backend_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub class_name: String,
}

impl BackendConfig {
    /// Pruned key/value view, for diagnostics
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}
