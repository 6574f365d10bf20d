use std::marker::PhantomData;

use reqwest::{
    header::{ACCEPT, USER_AGENT},
    Url,
};
use serde_json::Value;

use super::{
    hash::EncodingError, CreateOutput, Operation, ResolutionResult, Sidetree, SidetreeError,
};

/// Client for the [Sidetree REST API](https://identity.foundation/sidetree/api/).
///
/// Operations are posted to `{endpoint}operations/` and DIDs resolved at
/// `{resolver_endpoint}identifiers/{did}`. Both endpoints default to the same
/// URL.
#[derive(Debug, Clone)]
pub struct SidetreeClient<S: Sidetree> {
    endpoint: Url,
    resolver_endpoint: Url,
    http: reqwest::Client,
    _marker: PhantomData<S>,
}

/// Endpoints are used as bases for relative URLs and need a trailing slash.
fn base_url(mut url: Url) -> Result<Url, SidetreeError> {
    if url.cannot_be_a_base() {
        return Err(SidetreeError::InvalidEndpoint(url.to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn join(base: &Url, path: &str) -> Result<Url, SidetreeError> {
    base.join(path)
        .map_err(|e| SidetreeError::InvalidEndpoint(format!("{base}{path}: {e}")))
}

impl<S: Sidetree> SidetreeClient<S> {
    pub fn new(endpoint: Url) -> Result<Self, SidetreeError> {
        let endpoint = base_url(endpoint)?;
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            resolver_endpoint: endpoint.clone(),
            endpoint,
            http,
            _marker: PhantomData,
        })
    }

    /// Resolve DIDs against a different node than the one operations are
    /// submitted to.
    pub fn with_resolver_endpoint(mut self, resolver_endpoint: Url) -> Result<Self, SidetreeError> {
        self.resolver_endpoint = base_url(resolver_endpoint)?;
        Ok(self)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn resolver_endpoint(&self) -> &Url {
        &self.resolver_endpoint
    }

    /// Submit an operation.
    ///
    /// Returns the response body, or `null` if it is empty. Update operations
    /// typically return an empty body.
    ///
    /// <https://identity.foundation/sidetree/api/#sidetree-operations>
    pub async fn submit(&self, operation: &Operation) -> Result<Value, SidetreeError> {
        let url = join(&self.endpoint, "operations/")?;
        log::debug!("submitting operation to {url}");
        let resp = self
            .http
            .post(url)
            .json(operation)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, crate::USER_AGENT)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        log::debug!("operation submission returned {status}");
        if !status.is_success() {
            return Err(SidetreeError::InvalidStatus {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        if body.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&body).map_err(|e| EncodingError::Json(e).into())
    }

    /// Resolve a short or long-form DID.
    ///
    /// A resolution result carrying an error fails with
    /// [`SidetreeError::ResolutionFailure`], whatever the HTTP status.
    pub async fn resolve(&self, did: &str) -> Result<ResolutionResult, SidetreeError> {
        let url = join(&self.resolver_endpoint, &format!("identifiers/{did}"))?;
        log::debug!("resolving {did} at {url}");
        let resp = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, crate::USER_AGENT)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        let result = serde_json::from_slice::<ResolutionResult>(&body);
        if let Ok(result) = &result {
            if let Some(error) = result.error() {
                return Err(SidetreeError::ResolutionFailure(error.to_owned()));
            }
        }
        if !status.is_success() {
            return Err(SidetreeError::InvalidStatus {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        result.map_err(|e| EncodingError::Json(e).into())
    }

    /// Submit a create operation, then resolve the new DID by its long form.
    pub async fn publish_create(
        &self,
        create: &CreateOutput,
    ) -> Result<ResolutionResult, SidetreeError> {
        self.submit(&create.operation).await?;
        self.resolve(&create.long_form_did).await
    }
}
