//! Decode-then-validate over request bodies.
//!
//! Decode errors short-circuit: validation only runs on a well-formed
//! document.

use std::collections::HashMap;
use std::io::Read;

use axum::body::Body;

use crate::document::{decode_document, decode_document_slice, Document, Value};
use crate::types::{Error, Result};
use crate::validation::{FieldSpec, Validator};

/// Decode a JSON object from `body` and check `specs` against it.
pub fn decode_and_check<R: Read>(
    body: R,
    specs: &[FieldSpec],
    validator: &Validator,
) -> Result<Document> {
    let document = decode_document(body)?;
    validator.check(&document, specs)?;
    Ok(document)
}

/// Async form over an axum request body, buffering at most `limit` bytes.
pub async fn decode_request_and_check(
    body: Body,
    specs: &[FieldSpec],
    validator: &Validator,
    limit: usize,
) -> Result<Document> {
    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| Error::body_read(e.to_string()))?;
    let document = decode_document_slice(&bytes)?;
    validator.check(&document, specs)?;
    Ok(document)
}

/// Build a document from query parameters, keeping the first value of each.
pub fn document_from_query(params: HashMap<String, Vec<String>>) -> Document {
    params
        .into_iter()
        .filter_map(|(key, values)| {
            values
                .into_iter()
                .next()
                .map(|first| (key, Value::Text(first)))
        })
        .collect()
}
