//! # cloud-store - key-value store backend over a hosted REST service
//!
//! Stores typed records (expectation suites, checkpoints, validation
//! results, ...) in a remote JSON:API service behind a plain key-value
//! interface. Callers never see HTTP or the remote resource model.
//!
//! ## Features
//!
//! - One closed registry of resource kinds, each with its wire attribute
//!   name and allow-list of extra write fields
//! - Create vs update chosen by whether the key carries a remote id
//! - Soft delete, listing, membership and URL lookup
//! - Legacy credential migration at construction
//! - One error type with the failed operation and underlying cause
//!
//! ## Basic Usage
//!
//! ```no_run
//! use cloud_store::{
//!     BackendSettings, CloudStoreBackend, Credentials, Fields, ResourceKind, StoreKey,
//! };
//!
//! fn main() -> Result<(), cloud_store::StoreError> {
//!     let credentials = Credentials::new("access_token".to_string(), "org-id".to_string());
//!     let settings = BackendSettings::new(credentials)
//!         .with_resource_kind(ResourceKind::ExpectationSuite);
//!     let store = CloudStoreBackend::new(settings)?;
//!
//!     // Create a record
//!     let created = store.set(
//!         &StoreKey::unaddressed(ResourceKind::ExpectationSuite),
//!         cloud_store::json!({"expectations": []}),
//!         Fields::new(),
//!     )?;
//!
//!     // Read it back
//!     if let Some(reference) = created.resource_ref() {
//!         let suite = store.get_payload(&reference.key())?;
//!         println!("{}: {}", reference.url, suite);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Typed write options
//!
//! ```no_run
//! use cloud_store::{
//!     BackendSettings, CloudStoreBackend, Credentials, ResourceKind, StoreKey, WriteOptions,
//! };
//!
//! let settings = BackendSettings::new(Credentials::new("t".to_string(), "o".to_string()))
//!     .with_resource_name("rendered_data_docs");
//! let store = CloudStoreBackend::new(settings)?;
//!
//! store.set_with_options(
//!     &StoreKey::unaddressed(ResourceKind::RenderedDataDoc),
//!     &cloud_store::json!({"sections": []}),
//!     WriteOptions::RenderedDataDoc {
//!         source_type: Some("expectation_suite".to_string()),
//!         source_id: Some("42".to_string()),
//!     },
//! )?;
//! # Ok::<(), cloud_store::StoreError>(())
//! ```

pub mod backend;
pub mod client;
pub mod config;
pub mod credentials;
pub mod document;
pub mod error;
pub mod key;
pub mod options;
pub mod resource;
pub mod store;

// Re-export main types for convenience
pub use backend::CloudStoreBackend;
pub use client::{HttpReply, HttpTransport, Transport};
pub use config::{BackendConfig, BackendSettings, DEFAULT_BASE_URL};
pub use credentials::Credentials;
pub use document::{Document, Fields};
pub use error::{BackendCause, Operation, Result, StoreError};
pub use key::{ResourceRef, StoreKey};
pub use options::WriteOptions;
pub use resource::{hyphen, ResourceKind};
pub use store::{SetOutcome, StoreBackend};

// Re-export serde_json for convenience
pub use serde_json::json;
