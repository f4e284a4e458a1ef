//! The OpenAPI document this server implements, compiled into the binary as
//! gzip-compressed, base64-encoded text.
//!
//! Decoding happens on first use and is cached for the life of the process.

use std::collections::BTreeMap;
use std::io::Read;
use std::sync::OnceLock;

use base64::{engine::general_purpose, Engine};
use flate2::read::GzDecoder;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

const EMBEDDED_SPEC: &str = include_str!("../../openapi/openapi.json.gz.b64");

static SPEC: OnceLock<Result<LoadedSpec, SpecError>> = OnceLock::new();

struct LoadedSpec {
    raw: Vec<u8>,
    document: OpenApiDocument,
}

#[derive(Debug, Error)]
pub enum SpecError {
    #[error("error base64 decoding spec: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("error decompressing spec: {0}")]
    Decompress(#[from] std::io::Error),

    #[error("error parsing spec: {0}")]
    Parse(#[from] serde_json::Error),
}

fn decode(blob: &str) -> Result<Vec<u8>, SpecError> {
    let compact: String = blob.split_whitespace().collect();
    let zipped = general_purpose::STANDARD.decode(compact)?;

    let mut raw = Vec::new();
    GzDecoder::new(zipped.as_slice()).read_to_end(&mut raw)?;
    Ok(raw)
}

fn load() -> Result<LoadedSpec, SpecError> {
    let raw = decode(EMBEDDED_SPEC)?;
    let document = serde_json::from_slice(&raw)?;
    debug!(bytes = raw.len(), "Decoded embedded OpenAPI document");
    Ok(LoadedSpec { raw, document })
}

fn loaded() -> Result<&'static LoadedSpec, &'static SpecError> {
    SPEC.get_or_init(load).as_ref()
}

/// The JSON text of the document. Every call returns the same bytes.
pub fn raw_spec() -> Result<&'static [u8], &'static SpecError> {
    loaded().map(|spec| spec.raw.as_slice())
}

/// The parsed document.
pub fn document() -> Result<&'static OpenApiDocument, &'static SpecError> {
    loaded().map(|spec| &spec.document)
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenApiDocument {
    pub openapi: String,
    pub info: Info,
    #[serde(default)]
    pub paths: BTreeMap<String, BTreeMap<String, OperationObject>>,
    #[serde(default)]
    pub components: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Info {
    pub title: String,
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationObject {
    pub operation_id: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub explode: Option<bool>,
    #[serde(default)]
    pub schema: Value,
}

impl OpenApiDocument {
    /// Looks up an operation by lower-case method and path template.
    pub fn operation(&self, method: &str, path: &str) -> Option<&OperationObject> {
        self.paths.get(path)?.get(&method.to_ascii_lowercase())
    }

    pub fn operations(&self) -> impl Iterator<Item = (&str, &str, &OperationObject)> {
        self.paths.iter().flat_map(|(path, methods)| {
            methods
                .iter()
                .map(move |(method, op)| (method.as_str(), path.as_str(), op))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::operation::Operation;

    #[test]
    fn test_raw_spec_is_decoded_once() {
        let first = raw_spec().unwrap();
        let second = raw_spec().unwrap();
        assert!(std::ptr::eq(first, second));
        assert!(first.starts_with(b"{"));
    }

    #[test]
    fn test_embedded_blob_matches_source_document() {
        let source: Value =
            serde_json::from_str(include_str!("../../openapi/openapi.json")).unwrap();
        let embedded: Value = serde_json::from_slice(raw_spec().unwrap()).unwrap();
        assert_eq!(source, embedded);
    }

    #[test]
    fn test_document_is_cached() {
        let doc = document().unwrap();
        assert!(std::ptr::eq(doc, document().unwrap()));
        assert_eq!(doc.info.title, "AgentCo API");
        assert!(doc.openapi.starts_with("3."));
    }

    #[test]
    fn test_document_declares_every_operation() {
        let doc = document().unwrap();
        for op in Operation::ALL {
            let declared = doc
                .operation(op.method().as_str(), op.path())
                .unwrap_or_else(|| panic!("{} {} missing", op.method(), op.path()));
            assert_eq!(declared.operation_id, op.operation_id());
        }
        assert_eq!(doc.operations().count(), Operation::ALL.len());
    }

    #[test]
    fn test_parameter_styles() {
        let doc = document().unwrap();
        let view = doc.operation("GET", "/jobs/{id}").unwrap();
        assert_eq!(view.parameters[0].style.as_deref(), Some("simple"));
        assert_eq!(view.parameters[0].explode, Some(false));
        assert!(view.parameters[0].required);

        let search = doc.operation("GET", "/jobs").unwrap();
        let pets = search.parameters.iter().find(|p| p.name == "pets").unwrap();
        assert_eq!(pets.location, "query");
        assert_eq!(pets.style.as_deref(), Some("deepObject"));

        let user_apps = doc.operation("GET", "/users/{id}/job-applications").unwrap();
        assert_eq!(user_apps.parameters[0].schema["type"], "integer");
    }

    #[test]
    fn test_decode_reports_bad_base64() {
        assert!(matches!(decode("***"), Err(SpecError::Base64(_))));
    }

    #[test]
    fn test_decode_reports_non_gzip_payload() {
        let not_gzip = general_purpose::STANDARD.encode(b"plain text");
        assert!(matches!(decode(&not_gzip), Err(SpecError::Decompress(_))));
    }
}
