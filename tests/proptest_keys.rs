//! Property-based tests using proptest
//!
//! These check key/URL round-tripping, create/update dispatch and the
//! refusal of `.`/`..` ids over randomized input, with a transport that
//! records methods instead of touching the network.

use cloud_store::{
    BackendCause, BackendSettings, CloudStoreBackend, Credentials, Document, Fields, HttpReply,
    ResourceKind, StoreKey, Transport,
};
use proptest::prelude::*;
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use url::Url;

/// Records request methods and answers every call the same way
#[derive(Default)]
struct MethodLog {
    methods: Mutex<Vec<Method>>,
}

impl Transport for MethodLog {
    fn send(
        &self,
        method: Method,
        _url: &str,
        _token: &str,
        _body: Option<&Value>,
    ) -> Result<HttpReply, BackendCause> {
        self.methods.lock().unwrap().push(method);
        Ok(HttpReply::new(201, r#"{"data":{"id":"new"}}"#))
    }
}

fn store(kind: ResourceKind) -> (CloudStoreBackend<Arc<MethodLog>>, Arc<MethodLog>) {
    let log = Arc::new(MethodLog::default());
    let settings = BackendSettings::new(Credentials::new("t".to_string(), "org".to_string()))
        .with_base_url("https://cloud.example.test/")
        .with_resource_kind(kind);
    let backend = CloudStoreBackend::with_transport(settings, log.clone()).unwrap();
    (backend, log)
}

fn arb_kind() -> impl Strategy<Value = ResourceKind> {
    prop::sample::select(ResourceKind::ALL.to_vec())
}

/// Ids mixing ordinary names with the `.` and `..` segments
fn arb_id() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[A-Za-z0-9._-]{1,40}",
        1 => Just(".".to_string()),
        1 => Just("..".to_string()),
    ]
}

fn is_dot_segment(id: &str) -> bool {
    id == "." || id == ".."
}

fn last_segment(url: &str) -> String {
    Url::parse(url)
        .unwrap()
        .path_segments()
        .and_then(|segments| segments.last().map(|s| s.to_string()))
        .unwrap()
}

proptest! {
    /// The trailing path segment of a key's URL is its id
    #[test]
    fn url_ends_with_id(kind in arb_kind(), id in arb_id()) {
        let (backend, _) = store(kind);
        let result = backend.url_for_key(&StoreKey::new(kind, id.clone()));
        if is_dot_segment(&id) {
            prop_assert!(result.unwrap_err().is_validation());
        } else {
            prop_assert_eq!(last_segment(&result.unwrap()), id);
        }
    }

    /// Ids that cannot be a path segment are refused without a request
    #[test]
    fn dot_segment_ids_send_nothing(kind in arb_kind(), id in prop_oneof![Just("."), Just("..")]) {
        let (backend, log) = store(kind);
        let key = StoreKey::new(kind, id);
        let empty = json!({});
        prop_assert!(backend.set(&key, empty, Fields::new()).unwrap_err().is_validation());
        prop_assert!(backend.remove_key(&key).unwrap_err().is_validation());
        prop_assert!(backend.get(&key).unwrap_err().is_validation());
        prop_assert!(log.methods.lock().unwrap().is_empty());
    }

    /// Keys decoded from a listing address the listed records
    #[test]
    fn listing_keys_round_trip(kind in arb_kind(), id in "[A-Za-z0-9][A-Za-z0-9_-]{0,39}") {
        let (backend, _) = store(kind);
        let keys = backend
            .decode_listing(&Document(json!({"data": [{"id": id.clone()}]})))
            .unwrap();
        prop_assert_eq!(keys.len(), 1);
        let url = backend.url_for_key(&keys[0]).unwrap();
        prop_assert_eq!(last_segment(&url), id);
    }

    /// Non-empty ids always update, never create
    #[test]
    fn set_with_id_patches(kind in arb_kind(), id in "[A-Za-z0-9]{1,24}") {
        let (backend, log) = store(kind);
        backend.set(&StoreKey::new(kind, id), json!({}), Fields::new()).unwrap();
        prop_assert_eq!(log.methods.lock().unwrap().clone(), vec![Method::PATCH]);
    }

    /// Keys without an id always create
    #[test]
    fn set_without_id_posts(kind in arb_kind()) {
        let (backend, log) = store(kind);
        backend.set(&StoreKey::unaddressed(kind), json!({}), Fields::new()).unwrap();
        prop_assert_eq!(log.methods.lock().unwrap().clone(), vec![Method::POST]);
    }
}
