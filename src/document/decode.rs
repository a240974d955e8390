//! JSON body decoding.
//!
//! Only the first JSON value of the stream is read; trailing data is left
//! alone. A top-level `null` decodes to an empty document (or list).

use std::io::Read;

use super::{into_document, Document};
use crate::types::{Error, Result};

/// Decode a single JSON object.
pub fn decode_document<R: Read>(reader: R) -> Result<Document> {
    match first_value(reader)? {
        serde_json::Value::Object(map) => Ok(into_document(map)),
        serde_json::Value::Null => Ok(Document::new()),
        other => Err(unexpected_shape("object", &other)),
    }
}

/// Decode a JSON array of objects.
pub fn decode_document_list<R: Read>(reader: R) -> Result<Vec<Document>> {
    match first_value(reader)? {
        serde_json::Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                serde_json::Value::Object(map) => Ok(into_document(map)),
                serde_json::Value::Null => Ok(Document::new()),
                other => Err(Error::decode(format!(
                    "expected object at index {index}, found {}",
                    shape_name(&other)
                ))),
            })
            .collect(),
        serde_json::Value::Null => Ok(Vec::new()),
        other => Err(unexpected_shape("array", &other)),
    }
}

/// Decode a single JSON object from an already buffered body.
pub fn decode_document_slice(body: &[u8]) -> Result<Document> {
    decode_document(body)
}

fn first_value<R: Read>(reader: R) -> Result<serde_json::Value> {
    let mut stream = serde_json::Deserializer::from_reader(reader).into_iter::<serde_json::Value>();
    match stream.next() {
        Some(Ok(value)) => Ok(value),
        Some(Err(e)) => {
            tracing::debug!("JSON decode failed: {}", e);
            Err(Error::decode(e.to_string()))
        }
        None => Err(Error::decode("empty body")),
    }
}

fn unexpected_shape(expected: &str, found: &serde_json::Value) -> Error {
    Error::decode(format!("expected JSON {expected}, found {}", shape_name(found)))
}

fn shape_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{NumberLiteral, Value};

    #[test]
    fn test_numeric_literal_survives_decode() {
        let doc = decode_document(&br#"{"a": 123456789012345678, "b": "v", "c": 1.50}"#[..]).unwrap();

        assert_eq!(
            doc["a"],
            Value::Number(NumberLiteral::new("123456789012345678"))
        );
        assert_eq!(doc["c"].as_number().unwrap().as_str(), "1.50");
        assert_eq!(doc["b"].as_str(), Some("v"));
    }

    #[test]
    fn test_explicit_null_is_kept() {
        let doc = decode_document(&br#"{"a": null}"#[..]).unwrap();
        assert_eq!(doc.get("a"), Some(&Value::Null));
        assert_eq!(doc.get("b"), None);
    }

    #[test]
    fn test_top_level_null_is_empty_document() {
        assert!(decode_document(&b"null"[..]).unwrap().is_empty());
        assert!(decode_document_list(&b"null"[..]).unwrap().is_empty());
    }

    #[test]
    fn test_wrong_shape_is_decode_error() {
        let err = decode_document(&b"[1, 2]"[..]).unwrap_err();
        assert!(matches!(err, Error::Decode(ref msg) if msg == "expected JSON object, found array"));

        let err = decode_document_list(&br#"{"a": 1}"#[..]).unwrap_err();
        assert!(matches!(err, Error::Decode(ref msg) if msg == "expected JSON array, found object"));
    }

    #[test]
    fn test_malformed_and_empty_input() {
        assert!(matches!(
            decode_document(&br#"{"a": "#[..]).unwrap_err(),
            Error::Decode(_)
        ));
        assert!(matches!(
            decode_document(&b"  \n"[..]).unwrap_err(),
            Error::Decode(ref msg) if msg == "empty body"
        ));
    }

    #[test]
    fn test_trailing_data_is_ignored() {
        let doc = decode_document(&br#"{"a": 1} {"b": 2}"#[..]).unwrap();
        assert_eq!(doc.len(), 1);
        assert!(doc.contains_key("a"));
    }

    #[test]
    fn test_document_list() {
        let docs = decode_document_list(&br#"[{"id": 1}, null, {"id": 2}]"#[..]).unwrap();
        assert_eq!(docs.len(), 3);
        assert!(docs[1].is_empty());
        assert_eq!(docs[2]["id"].as_number().unwrap().as_i64(), Some(2));
    }

    #[test]
    fn test_document_list_rejects_non_object_element() {
        let err = decode_document_list(&br#"[{"id": 1}, 7]"#[..]).unwrap_err();
        assert!(matches!(err, Error::Decode(ref msg) if msg == "expected object at index 1, found number"));
    }
}
