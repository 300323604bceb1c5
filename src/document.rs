use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::resource::ResourceKind;

/// Extra top-level attributes supplied on write
pub type Fields = Map<String, Value>;

/// JSON:API document exchanged with the remote service.
///
/// Wraps the raw JSON and provides slash-separated path access, e.g.
/// `"data/attributes/suite"` or `"data/0/id"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(pub Value);

impl Document {
    pub fn into_inner(self) -> Value {
        self.0
    }

    /// Get a value by a slash-separated path
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.0;

        for part in path.split('/').filter(|s| !s.is_empty()) {
            current = match current {
                Value::Object(map) => map.get(part)?,
                Value::Array(arr) => {
                    let index: usize = part.parse().ok()?;
                    arr.get(index)?
                }
                _ => return None,
            };
        }

        Some(current)
    }

    /// Get a resource id by path; numeric ids are rendered as decimal strings
    pub fn get_id(&self, path: &str) -> Option<String> {
        self.get(path).and_then(id_of)
    }

    /// Items of the top-level `data` array; absent or null `data` is empty
    pub fn data_items(&self) -> &[Value] {
        match self.get("data") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        }
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Document(value)
    }
}

/// Read an `id` that may be sent as a string or a number
pub fn id_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn envelope(kind: ResourceKind, id: Option<&str>, attributes: Map<String, Value>) -> Value {
    let mut data = Map::new();
    data.insert("type".to_string(), Value::String(kind.type_name().to_string()));
    if let Some(id) = id {
        data.insert("id".to_string(), Value::String(id.to_string()));
    }
    data.insert("attributes".to_string(), Value::Object(attributes));

    let mut document = Map::new();
    document.insert("data".to_string(), Value::Object(data));
    Value::Object(document)
}

/// Body of a create (POST) request
pub fn create_body(kind: ResourceKind, organization_id: &str, value: Value, fields: Fields) -> Value {
    let mut attributes = Map::new();
    attributes.insert(
        "organization_id".to_string(),
        Value::String(organization_id.to_string()),
    );
    attributes.insert(kind.attribute_key().to_string(), value);
    attributes.extend(fields);
    envelope(kind, None, attributes)
}

/// Body of an update (PATCH) request
pub fn update_body(kind: ResourceKind, id: &str, organization_id: &str, value: Value) -> Value {
    let mut attributes = Map::new();
    attributes.insert(kind.attribute_key().to_string(), value);
    attributes.insert(
        "organization_id".to_string(),
        Value::String(organization_id.to_string()),
    );
    envelope(kind, Some(id), attributes)
}

/// Body of a soft-delete (PATCH) request
pub fn delete_body(kind: ResourceKind, id: &str) -> Value {
    let mut attributes = Map::new();
    attributes.insert("deleted".to_string(), Value::Bool(true));
    envelope(kind, Some(id), attributes)
}
