//! Storage contract consumed by higher-level stores.
//!
//! A store-of-stores holds backends as `Box<dyn StoreBackend>` and talks to
//! them only through this trait, so it never sees HTTP or the remote
//! resource model.

use serde_json::Value;

use crate::config::BackendConfig;
use crate::document::Fields;
use crate::error::Result;
use crate::key::{ResourceRef, StoreKey};

/// Result of a `set` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetOutcome {
    /// A new record was created
    Created(ResourceRef),
    /// An existing record was updated; `false` if the remote refused it
    Updated(bool),
}

impl SetOutcome {
    pub fn resource_ref(&self) -> Option<&ResourceRef> {
        match self {
            SetOutcome::Created(reference) => Some(reference),
            SetOutcome::Updated(_) => None,
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            SetOutcome::Created(_) => true,
            SetOutcome::Updated(updated) => *updated,
        }
    }
}

/// Key-value operations every store backend provides
pub trait StoreBackend: Send + Sync {
    /// Read the record addressed by `key`
    fn get(&self, key: &StoreKey) -> Result<Value>;

    /// Create (unaddressed key) or update (addressed key) a record
    fn set(&self, key: &StoreKey, value: Value, fields: Fields) -> Result<SetOutcome>;

    /// Keys of every record visible to this backend
    fn list_keys(&self) -> Result<Vec<StoreKey>>;

    /// Remove the record addressed by `key`; `false` if the remote refused
    fn remove_key(&self, key: &StoreKey) -> Result<bool>;

    /// Membership test over `list_keys`
    fn has_key(&self, key: &StoreKey) -> Result<bool> {
        Ok(self.list_keys()?.contains(key))
    }

    fn url_for_key(&self, key: &StoreKey) -> Result<String>;

    fn config(&self) -> &BackendConfig;
}
