use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// [DID Resolution Result](https://w3c-ccg.github.io/did-resolution/#did-resolution-result)
/// as returned by the Sidetree REST API.
///
/// The DID document is kept as JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub did_document: Option<Value>,

    #[serde(default)]
    pub did_resolution_metadata: ResolutionMetadata,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub did_document_metadata: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(flatten)]
    pub property_set: Map<String, Value>,
}

impl ResolutionResult {
    /// Resolution error, if one is set and not empty.
    pub fn error(&self) -> Option<&str> {
        self.did_resolution_metadata
            .error
            .as_deref()
            .filter(|error| !error.is_empty())
    }
}
