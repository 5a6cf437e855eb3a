/// Shared types used across the codebase

use serde_json::{Map, Value};

/// A stored document: any JSON object. Quests are documents, but the store
/// itself never looks past `_id`.
pub type Document = Map<String, Value>;

/// Primary key field present on every stored document
pub const ID_FIELD: &str = "_id";

/// Read the `_id` of a document, if it is a string
pub fn document_id(doc: &Document) -> Option<&str> {
    doc.get(ID_FIELD).and_then(Value::as_str)
}
