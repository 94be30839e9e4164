use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RecordError;

/// Name of the identifier field as exposed to clients.
pub const ID_FIELD: &str = "_id";

/// Generate a fresh record identifier.
///
/// `UUIDv7` ids are time ordered and unique across processes, like the
/// object ids of the document store the dashboard was built against.
#[must_use]
pub fn new_record_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// A stored document: the generated id plus the JSON body.
///
/// The body never contains [`ID_FIELD`]; the id lives beside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub body: Map<String, Value>,
}

impl Document {
    /// Build a document, dropping any client-supplied `_id` from the body.
    #[must_use]
    pub fn new(id: String, mut body: Map<String, Value>) -> Self {
        body.remove(ID_FIELD);
        Self { id, body }
    }

    /// The body with the id merged back in under [`ID_FIELD`].
    #[must_use]
    pub fn into_json(self) -> Map<String, Value> {
        let mut body = self.body;
        body.insert(ID_FIELD.to_owned(), Value::String(self.id));
        body
    }

    /// Decode into a typed record whose id field is named `_id`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, RecordError> {
        let json = self.clone().into_json();
        serde_json::from_value(Value::Object(json))
            .map_err(|e| RecordError::Serialization(format!("document {}: {e}", self.id)))
    }
}

/// Encode a typed record into a document body, stripping its `_id`.
pub fn encode<T: Serialize>(record: &T) -> Result<Map<String, Value>, RecordError> {
    match serde_json::to_value(record) {
        Ok(Value::Object(mut body)) => {
            body.remove(ID_FIELD);
            Ok(body)
        }
        Ok(other) => Err(RecordError::Serialization(format!(
            "expected a JSON object, got {other}"
        ))),
        Err(e) => Err(RecordError::Serialization(e.to_string())),
    }
}
