//! JSON document batches.
//!
//! A batch is a JSON array of objects mapping property names to values:
//!
//! ```json
//! [
//!   {
//!     "google:docid": "doc-1",
//!     "google:content": "hello",
//!     "google:aclusers": ["alice=reader", {"name": "bob", "namespace": "corp"}],
//!     "author": "carol"
//!   }
//! ]
//! ```
//!
//! Strings, booleans and numbers map to the matching [`Value`]. Objects
//! are principals. Arrays give a property several values.

use docfeed_spi::{CaseSensitivityType, Principal, PrincipalType, SimpleDocument, Value};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

/// Errors reading a document batch.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The batch file could not be opened.
    #[error("cannot open {path}: {source}")]
    Open {
        /// The batch file.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The batch is not valid JSON of the expected shape.
    #[error("malformed batch: {0}")]
    Json(#[from] serde_json::Error),

    /// A property holds an array inside an array.
    #[error("document {index}: property {property} nests arrays")]
    NestedArray {
        /// Position of the document in the batch.
        index: usize,
        /// The offending property.
        property: String,
    },
}

/// One principal written as a JSON object.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonPrincipal {
    name: String,
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default)]
    unqualified: bool,
    #[serde(default)]
    case_insensitive: bool,
}

impl JsonPrincipal {
    fn to_principal(&self) -> Principal {
        let mut principal = Principal::new(self.name.as_str());
        if let Some(namespace) = &self.namespace {
            principal = principal.with_namespace(namespace.as_str());
        }
        if self.unqualified {
            principal = principal.with_principal_type(PrincipalType::Unqualified);
        }
        if self.case_insensitive {
            principal =
                principal.with_case_sensitivity(CaseSensitivityType::EverythingCaseInsensitive);
        }
        principal
    }
}

/// A property value as it appears in JSON.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum JsonValue {
    /// `true` or `false`.
    Bool(bool),
    /// An integer.
    Long(i64),
    /// Any other number.
    Double(f64),
    /// A string.
    String(String),
    /// Several values. Tried before `Principal`, whose derived visitor
    /// would also accept an array.
    List(Vec<JsonValue>),
    /// A principal.
    Principal(JsonPrincipal),
}

impl JsonValue {
    fn to_value(&self) -> Option<Value> {
        match self {
            Self::Bool(b) => Some(Value::Boolean(*b)),
            Self::Long(n) => Some(Value::Long(*n)),
            Self::Double(x) => Some(Value::Double(*x)),
            Self::String(s) => Some(Value::string(s.as_str())),
            Self::Principal(p) => Some(Value::Principal(p.to_principal())),
            Self::List(_) => None,
        }
    }
}

/// A document as it appears in JSON.
pub type JsonDocument = BTreeMap<String, JsonValue>;

/// Converts one JSON document, `index` being its position in the batch.
pub fn to_document(index: usize, json: &JsonDocument) -> Result<SimpleDocument, BatchError> {
    let mut document = SimpleDocument::new();
    for (name, value) in json {
        let values = match value {
            JsonValue::List(items) => items.as_slice(),
            single => std::slice::from_ref(single),
        };
        for item in values {
            let value = item.to_value().ok_or_else(|| BatchError::NestedArray {
                index,
                property: name.clone(),
            })?;
            document.add_value(name.as_str(), value);
        }
    }
    Ok(document)
}

/// Reads a batch file.
pub fn read_batch(path: &Path) -> Result<Vec<JsonDocument>, BatchError> {
    let file = File::open(path).map_err(|source| BatchError::Open {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docfeed_spi::{doc_utils, properties, Document};

    fn parse(json: &str) -> Vec<JsonDocument> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn scalar_values() {
        let batch = parse(
            r#"[{"google:docid": "1", "google:ispublic": false, "rank": 7, "score": 0.5}]"#,
        );
        let doc = to_document(0, &batch[0]).unwrap();
        assert_eq!(
            doc_utils::get_optional_string(&doc, properties::DOCID).unwrap().as_deref(),
            Some("1")
        );
        let mut public = doc.find_property(properties::ISPUBLIC).unwrap().unwrap();
        assert_eq!(public.next_value().unwrap(), Some(Value::Boolean(false)));
        let mut rank = doc.find_property("rank").unwrap().unwrap();
        assert_eq!(rank.next_value().unwrap(), Some(Value::Long(7)));
        let mut score = doc.find_property("score").unwrap().unwrap();
        assert_eq!(score.next_value().unwrap(), Some(Value::Double(0.5)));
    }

    #[test]
    fn lists_and_principals() {
        let batch = parse(
            r#"[{"google:aclusers": ["alice", {"name": "bob", "namespace": "corp", "unqualified": true}]}]"#,
        );
        let doc = to_document(0, &batch[0]).unwrap();
        let mut users = doc.find_property(properties::ACLUSERS).unwrap().unwrap();
        assert_eq!(users.next_value().unwrap(), Some(Value::from("alice")));
        let Some(Value::Principal(bob)) = users.next_value().unwrap() else {
            panic!("expected a principal");
        };
        assert_eq!(bob.name(), "bob");
        assert_eq!(bob.namespace(), "corp");
        assert_eq!(bob.principal_type(), PrincipalType::Unqualified);
        assert_eq!(users.next_value().unwrap(), None);
    }

    #[test]
    fn string_arrays_stay_lists() {
        let batch = parse(r#"[{"google:aclusers": ["alice", "bob"], "tags": ["x"]}]"#);
        assert!(matches!(batch[0]["google:aclusers"], JsonValue::List(_)));
        let doc = to_document(0, &batch[0]).unwrap();
        let mut users = doc.find_property(properties::ACLUSERS).unwrap().unwrap();
        assert_eq!(users.next_value().unwrap(), Some(Value::from("alice")));
        assert_eq!(users.next_value().unwrap(), Some(Value::from("bob")));
        assert_eq!(users.next_value().unwrap(), None);
        let mut tags = doc.find_property("tags").unwrap().unwrap();
        assert_eq!(tags.next_value().unwrap(), Some(Value::from("x")));
        assert_eq!(tags.next_value().unwrap(), None);
    }

    #[test]
    fn nested_arrays_are_rejected() {
        let batch = parse(r#"[{"x": [["a"]]}]"#);
        assert!(matches!(
            to_document(3, &batch[0]),
            Err(BatchError::NestedArray { index: 3, .. })
        ));
    }

    #[test]
    fn read_batch_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_batch(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, BatchError::Open { .. }));
    }
}
