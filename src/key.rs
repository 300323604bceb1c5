use crate::resource::ResourceKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Addressing unit of the store.
///
/// An `Unaddressed` key names a kind only and is what callers pass to
/// create a record. An `Addressed` key carries the remote-assigned id.
///
/// Keys compare and hash by `(kind, id)`, so an `Addressed` key with an
/// empty id equals the `Unaddressed` key of the same kind.
#[derive(Debug, Clone)]
pub enum StoreKey {
    Unaddressed { kind: ResourceKind },
    Addressed { kind: ResourceKind, id: String },
}

impl StoreKey {
    /// Build a key from its tuple parts; an empty id yields `Unaddressed`.
    pub fn new(kind: ResourceKind, id: impl Into<String>) -> Self {
        let id = id.into();
        if id.is_empty() {
            StoreKey::Unaddressed { kind }
        } else {
            StoreKey::Addressed { kind, id }
        }
    }

    pub fn unaddressed(kind: ResourceKind) -> Self {
        StoreKey::Unaddressed { kind }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            StoreKey::Unaddressed { kind } | StoreKey::Addressed { kind, .. } => *kind,
        }
    }

    /// Remote id, if one is present and non-empty
    pub fn id(&self) -> Option<&str> {
        match self {
            StoreKey::Addressed { id, .. } if !id.is_empty() => Some(id),
            _ => None,
        }
    }

    /// Tuple form, with an empty id for unaddressed keys
    pub fn to_tuple(&self) -> (ResourceKind, String) {
        (self.kind(), self.id().unwrap_or_default().to_string())
    }
}

impl PartialEq for StoreKey {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.id() == other.id()
    }
}

impl Eq for StoreKey {}

impl Hash for StoreKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        self.id().hash(state);
    }
}

impl From<(ResourceKind, String)> for StoreKey {
    fn from((kind, id): (ResourceKind, String)) -> Self {
        StoreKey::new(kind, id)
    }
}

impl From<(ResourceKind, &str)> for StoreKey {
    fn from((kind, id): (ResourceKind, &str)) -> Self {
        StoreKey::new(kind, id)
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id() {
            Some(id) => write!(f, "{}/{}", self.kind(), id),
            None => write!(f, "{}", self.kind()),
        }
    }
}

/// Handle to a record created in the remote service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub resource_kind: ResourceKind,
    pub remote_id: String,
    pub url: String,
}

impl ResourceRef {
    /// Key addressing the created record
    pub fn key(&self) -> StoreKey {
        StoreKey::Addressed {
            kind: self.resource_kind,
            id: self.remote_id.clone(),
        }
    }
}
