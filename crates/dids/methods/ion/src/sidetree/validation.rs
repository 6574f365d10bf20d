//! Input checks applied to public keys, services and patches before they are
//! put in an operation.
//!
//! Reference: [Sidetree §12.1 Standard Patch Actions](https://identity.foundation/sidetree/spec/v1.0.0/#standard-patch-actions)
use std::collections::HashSet;

use super::{
    DIDStatePatch, DocumentState, ProofPurpose, PublicKeyEntry, ServiceEndpoint,
    ServiceEndpointEntry, ValidationError,
};

/// Maximum length of a public key or service `id`.
pub const MAX_ID_LENGTH: usize = 50;

/// Service `type` must be strictly shorter than this.
pub const MAX_SERVICE_TYPE_LENGTH: usize = 30;

/// Check that `id` is at most [`MAX_ID_LENGTH`] base64url characters.
pub fn validate_id(kind: &'static str, id: &str) -> Result<(), ValidationError> {
    if id.len() > MAX_ID_LENGTH {
        return Err(ValidationError::IdTooLong {
            kind,
            id: id.to_owned(),
        });
    }
    let base64url = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_';
    if id.is_empty() || !id.chars().all(base64url) {
        return Err(ValidationError::IdCharset {
            kind,
            id: id.to_owned(),
        });
    }
    Ok(())
}

/// Each purpose may appear once per key.
pub fn validate_purposes(id: &str, purposes: &[ProofPurpose]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    match purposes.iter().find(|purpose| !seen.insert(**purpose)) {
        Some(purpose) => Err(ValidationError::DuplicatePurpose {
            id: id.to_owned(),
            purpose: purpose.to_string(),
        }),
        None => Ok(()),
    }
}

pub fn validate_public_keys(public_keys: &[PublicKeyEntry]) -> Result<(), ValidationError> {
    let mut ids = HashSet::new();
    for key in public_keys {
        validate_id("public key", &key.id)?;
        if !ids.insert(key.id.as_str()) {
            return Err(ValidationError::DuplicatePublicKeyId(key.id.clone()));
        }
        validate_purposes(&key.id, &key.purposes)?;
    }
    Ok(())
}

pub fn validate_services(services: &[ServiceEndpointEntry]) -> Result<(), ValidationError> {
    let mut ids = HashSet::new();
    for service in services {
        validate_id("service", &service.id)?;
        if !ids.insert(service.id.as_str()) {
            return Err(ValidationError::DuplicateServiceId(service.id.clone()));
        }
        if service.r#type.len() >= MAX_SERVICE_TYPE_LENGTH {
            return Err(ValidationError::ServiceTypeTooLong(service.r#type.clone()));
        }
        validate_service_endpoint(&service.service_endpoint)?;
    }
    Ok(())
}

fn validate_service_endpoint(endpoint: &ServiceEndpoint) -> Result<(), ValidationError> {
    match endpoint {
        ServiceEndpoint::Uri(uri) => reqwest::Url::parse(uri)
            .map(|_| ())
            .map_err(|_| ValidationError::InvalidServiceEndpoint(uri.clone())),
        ServiceEndpoint::Map(value) if value.is_object() => Ok(()),
        ServiceEndpoint::Map(value) => Err(ValidationError::InvalidServiceEndpoint(
            value.to_string(),
        )),
    }
}

pub fn validate_document(document: &DocumentState) -> Result<(), ValidationError> {
    if let Some(public_keys) = &document.public_keys {
        validate_public_keys(public_keys)?;
    }
    if let Some(services) = &document.services {
        validate_services(services)?;
    }
    Ok(())
}

pub fn validate_patch(patch: &DIDStatePatch) -> Result<(), ValidationError> {
    match patch {
        DIDStatePatch::AddPublicKeys { public_keys } => validate_public_keys(public_keys),
        DIDStatePatch::RemovePublicKeys { ids } => ids
            .iter()
            .try_for_each(|id| validate_id("public key", id)),
        DIDStatePatch::AddServices { services } => validate_services(services),
        DIDStatePatch::RemoveServices { ids } => {
            ids.iter().try_for_each(|id| validate_id("service", id))
        }
        DIDStatePatch::Replace { document } => validate_document(document),
    }
}
