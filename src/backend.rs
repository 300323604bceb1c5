use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::client::{HttpReply, HttpTransport, Transport};
use crate::config::{BackendConfig, BackendSettings};
use crate::credentials::Credentials;
use crate::document::{self, Document, Fields};
use crate::error::{BackendCause, Operation, Result, StoreError};
use crate::key::{ResourceRef, StoreKey};
use crate::options::WriteOptions;
use crate::resource::{hyphen, ResourceKind};
use crate::store::{SetOutcome, StoreBackend};

/// Maximum length of a response body kept in an error
const MAX_ERROR_BODY_LENGTH: usize = 200;

fn truncate_body(body: &str) -> String {
    if body.chars().count() > MAX_ERROR_BODY_LENGTH {
        let head: String = body.chars().take(MAX_ERROR_BODY_LENGTH).collect();
        format!("{}... [truncated, {} bytes total]", head, body.len())
    } else {
        body.to_string()
    }
}

fn status_cause(reply: &HttpReply) -> BackendCause {
    BackendCause::Status {
        status: reply.status,
        body: truncate_body(&reply.body),
    }
}

/// Parse a base URL so that joining keeps its whole path
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)
        .map_err(|e| StoreError::configuration(format!("invalid base URL {}: {}", raw, e)))?;
    if url.cannot_be_a_base() {
        return Err(StoreError::configuration(format!(
            "base URL cannot hold a path: {}",
            raw
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Store backend whose records live in a hosted REST service.
///
/// One backend serves one resource kind. Records are addressed under
/// `{base}/organizations/{org}/{resource-name}/{id}`; every operation is a
/// single blocking round-trip.
pub struct CloudStoreBackend<T: Transport = HttpTransport> {
    transport: T,
    credentials: Credentials,
    base_url: Url,
    kind: ResourceKind,
    resource_name: String,
    config: BackendConfig,
    store_backend_id: Option<String>,
}

impl CloudStoreBackend<HttpTransport> {
    /// Create a backend talking to the remote service over HTTP
    pub fn new(settings: BackendSettings) -> Result<Self> {
        let transport = HttpTransport::new().map_err(|e| {
            StoreError::configuration(format!("failed to create HTTP client: {}", e))
        })?;
        Self::with_transport(settings, transport)
    }
}

impl<T: Transport> CloudStoreBackend<T> {
    /// Create a backend that sends its requests through `transport`
    pub fn with_transport(settings: BackendSettings, transport: T) -> Result<Self> {
        let (kind, resource_name) = settings.resolve_resource()?;
        let credentials = settings.credentials.clone().normalized()?;
        let base_url = parse_base_url(&settings.base_url)?;
        let config = settings.snapshot(kind, resource_name.clone());

        let store_backend_id = if settings.suppress_store_backend_id {
            None
        } else {
            Some(
                config
                    .manually_initialize_store_backend_id
                    .clone()
                    .unwrap_or_else(|| Uuid::new_v4().to_string()),
            )
        };

        Ok(CloudStoreBackend {
            transport,
            credentials,
            base_url,
            kind,
            resource_name,
            config,
            store_backend_id,
        })
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Credentials after legacy key migration
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Identity of this store; `None` when suppressed
    pub fn store_backend_id(&self) -> Option<&str> {
        self.store_backend_id.as_deref()
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Extra fields accepted on create for this backend's kind
    pub fn allowed_fields(&self) -> &'static [&'static str] {
        self.kind.allowed_fields()
    }

    /// Reject any field outside the kind's allow-list
    pub fn validate_fields(&self, fields: &Fields) -> Result<()> {
        let allowed = self.allowed_fields();
        let mut rejected: Vec<String> = fields
            .keys()
            .filter(|name| !allowed.contains(&name.as_str()))
            .cloned()
            .collect();

        if rejected.is_empty() {
            return Ok(());
        }
        rejected.sort();
        Err(StoreError::InvalidFields {
            kind: self.kind,
            fields: rejected,
        })
    }

    fn check_kind(&self, key: &StoreKey) -> Result<()> {
        if key.kind() != self.kind {
            return Err(StoreError::KindMismatch {
                expected: self.kind,
                actual: key.kind(),
            });
        }
        Ok(())
    }

    fn collection_url(&self) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::configuration("base URL cannot hold a path"))?
            .pop_if_empty()
            .extend([
                "organizations",
                self.credentials.organization_id(),
                hyphen(&self.resource_name).as_str(),
            ]);
        Ok(url)
    }

    /// `.` and `..` would be dropped as path segments, leaving the collection URL
    fn item_url(&self, id: &str) -> Result<Url> {
        if id == "." || id == ".." {
            return Err(StoreError::InvalidIdentifier { id: id.to_string() });
        }
        let mut url = self.collection_url()?;
        url.path_segments_mut()
            .map_err(|_| StoreError::configuration("base URL cannot hold a path"))?
            .push(id);
        Ok(url)
    }

    fn url_for(&self, key: &StoreKey) -> Result<Url> {
        match key.id() {
            Some(id) => self.item_url(id),
            None => self.collection_url(),
        }
    }

    /// URL of the record (or, for an unaddressed key, the collection)
    pub fn url_for_key(&self, key: &StoreKey) -> Result<String> {
        self.check_kind(key)?;
        Ok(self.url_for(key)?.to_string())
    }

    fn fail(&self, operation: Operation, cause: impl Into<BackendCause>) -> StoreError {
        let cause = cause.into();
        tracing::debug!("{} {} failed: {}", operation, self.kind, cause);
        StoreError::backend(operation, cause)
    }

    fn send(
        &self,
        operation: Operation,
        method: Method,
        url: &Url,
        body: Option<&Value>,
    ) -> Result<HttpReply> {
        self.transport
            .send(method, url.as_str(), &self.credentials.access_token, body)
            .map_err(|e| self.fail(operation, e))
    }

    /// Parse a reply body; undecodable error replies report their status
    fn parse(&self, operation: Operation, reply: &HttpReply) -> Result<Document> {
        reply.json().map(Document).map_err(|e| {
            if reply.is_success() {
                self.fail(operation, e)
            } else {
                self.fail(operation, status_cause(reply))
            }
        })
    }

    /// Read endpoints treat any error status as a failure
    fn read(&self, operation: Operation, url: &Url) -> Result<Document> {
        let reply = self.send(operation, Method::GET, url, None)?;
        if !reply.is_success() {
            return Err(self.fail(operation, status_cause(&reply)));
        }
        reply.json().map(Document).map_err(|e| self.fail(operation, e))
    }

    /// Read the full JSON document of a record
    pub fn get(&self, key: &StoreKey) -> Result<Value> {
        self.check_kind(key)?;
        let url = self.url_for(key)?;
        Ok(self.read(Operation::Get, &url)?.into_inner())
    }

    /// Read only the stored value, as nested under the kind's attribute key
    pub fn get_payload(&self, key: &StoreKey) -> Result<Value> {
        let document = Document(self.get(key)?);
        let path = format!("data/attributes/{}", self.kind.attribute_key());
        document
            .get(&path)
            .cloned()
            .ok_or_else(|| self.fail(Operation::Get, BackendCause::MissingField("data.attributes")))
    }

    /// Create or update a record.
    ///
    /// A key with an id updates that record; any other key creates a new
    /// one. `fields` are checked against the kind's allow-list before
    /// anything is sent, and are ignored on update.
    pub fn set(&self, key: &StoreKey, value: Value, fields: Fields) -> Result<SetOutcome> {
        self.check_kind(key)?;
        if let Some(id) = key.id() {
            return self.update(id, value).map(SetOutcome::Updated);
        }
        self.validate_fields(&fields)?;
        self.create(value, fields).map(SetOutcome::Created)
    }

    /// `set` with typed extra fields
    pub fn set_with_options<V: Serialize>(
        &self,
        key: &StoreKey,
        value: &V,
        options: WriteOptions,
    ) -> Result<SetOutcome> {
        if let Some(kind) = options.kind().filter(|kind| *kind != key.kind()) {
            return Err(StoreError::InvalidFields {
                kind: key.kind(),
                fields: kind.allowed_fields().iter().map(|s| s.to_string()).collect(),
            });
        }
        let value = serde_json::to_value(value).map_err(|e| self.fail(Operation::Set, e))?;
        self.set(key, value, options.into_fields())
    }

    fn create(&self, value: Value, fields: Fields) -> Result<ResourceRef> {
        let url = self.collection_url()?;
        let body = document::create_body(self.kind, self.credentials.organization_id(), value, fields);

        let reply = self.send(Operation::Set, Method::POST, &url, Some(&body))?;
        let response = self.parse(Operation::Set, &reply)?;

        let remote_id = match response.get_id("data/id") {
            Some(id) => id,
            None if !reply.is_success() => {
                return Err(self.fail(Operation::Set, status_cause(&reply)))
            }
            None => return Err(self.fail(Operation::Set, BackendCause::MissingField("data.id"))),
        };

        let url = self.item_url(&remote_id)?.to_string();
        tracing::debug!("created {} {}", self.kind, remote_id);
        Ok(ResourceRef {
            resource_kind: self.kind,
            remote_id,
            url,
        })
    }

    fn update(&self, id: &str, value: Value) -> Result<bool> {
        let url = self.item_url(id)?;
        let body = document::update_body(self.kind, id, self.credentials.organization_id(), value);
        let reply = self.send(Operation::Update, Method::PATCH, &url, Some(&body))?;
        Ok(reply.is_success())
    }

    /// Keys of every record in this backend's collection
    pub fn list_keys(&self) -> Result<Vec<StoreKey>> {
        let url = self.collection_url()?;
        let response = self.read(Operation::List, &url)?;
        self.decode_listing(&response)
    }

    /// Map each `data[].id` of a listing into a key of this backend's kind
    pub fn decode_listing(&self, response: &Document) -> Result<Vec<StoreKey>> {
        response
            .data_items()
            .iter()
            .map(|item| {
                item.get("id")
                    .and_then(document::id_of)
                    .map(|id| StoreKey::Addressed {
                        kind: self.kind,
                        id,
                    })
                    .ok_or_else(|| {
                        self.fail(Operation::List, BackendCause::MissingField("data[].id"))
                    })
            })
            .collect()
    }

    /// Soft-delete a record by flagging it as deleted
    pub fn remove_key(&self, key: &StoreKey) -> Result<bool> {
        self.check_kind(key)?;
        let id = key.id().ok_or(StoreError::MissingIdentifier {
            operation: Operation::Remove,
        })?;
        let url = self.item_url(id)?;
        let body = document::delete_body(self.kind, id);
        let reply = self.send(Operation::Remove, Method::PATCH, &url, Some(&body))?;
        Ok(reply.is_success())
    }

    pub fn has_key(&self, key: &StoreKey) -> Result<bool> {
        Ok(self.list_keys()?.contains(key))
    }
}

impl<T: Transport> StoreBackend for CloudStoreBackend<T> {
    fn get(&self, key: &StoreKey) -> Result<Value> {
        CloudStoreBackend::get(self, key)
    }

    fn set(&self, key: &StoreKey, value: Value, fields: Fields) -> Result<SetOutcome> {
        CloudStoreBackend::set(self, key, value, fields)
    }

    fn list_keys(&self) -> Result<Vec<StoreKey>> {
        CloudStoreBackend::list_keys(self)
    }

    fn remove_key(&self, key: &StoreKey) -> Result<bool> {
        CloudStoreBackend::remove_key(self, key)
    }

    fn has_key(&self, key: &StoreKey) -> Result<bool> {
        CloudStoreBackend::has_key(self, key)
    }

    fn url_for_key(&self, key: &StoreKey) -> Result<String> {
        CloudStoreBackend::url_for_key(self, key)
    }

    fn config(&self) -> &BackendConfig {
        CloudStoreBackend::config(self)
    }
}

impl<T: Transport> std::fmt::Debug for CloudStoreBackend<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudStoreBackend")
            .field("base_url", &self.base_url.as_str())
            .field("kind", &self.kind)
            .field("resource_name", &self.resource_name)
            .field("credentials", &self.credentials)
            .finish()
    }
}
