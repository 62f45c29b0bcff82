//! Catalog API client.
//!
//! The engine talks to the remote catalog through the [`CatalogApi`] trait;
//! [`CatalogClient`] is the reqwest-backed implementation the CLI wires in.
//! Errors keep the HTTP status line verbatim (`500 Internal Server Error`)
//! because row-level error reporting surfaces it untouched.

use thiserror::Error;

use crate::model::{ParamPayload, Parameter};

/// Errors returned by catalog API calls.
///
/// Row-scoped by design: the synchronizer converts each one into an entry in
/// the outcome's error map and moves on to the next row.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx HTTP response.
    #[error("{line}")]
    Status {
        code: u16,
        /// Full status line, e.g. `404 Not Found`.
        line: String,
    },

    /// Transport failure: connection refused, timeout, malformed body.
    #[error("{0}")]
    Transport(String),
}

impl ApiError {
    /// Build a status error from an HTTP status code.
    #[must_use]
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        Self::Status {
            code: status.as_u16(),
            line: status.to_string(),
        }
    }

    /// Whether the remote reported the resource as absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { code: 404, .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

/// The seam between the synchronizer and the transport.
///
/// One method per remote operation the engine needs; no retries, no
/// pagination. Implementations are expected to be row-scoped and stateless
/// across calls.
pub trait CatalogApi {
    /// Fetch the current remote record for a parameter.
    async fn get_parameter(
        &self,
        product_id: &str,
        param_id: &str,
    ) -> Result<Parameter, ApiError>;

    /// Create a new parameter under the product.
    async fn create_parameter(
        &self,
        product_id: &str,
        payload: &ParamPayload,
    ) -> Result<Parameter, ApiError>;

    /// Replace an existing parameter.
    async fn update_parameter(
        &self,
        product_id: &str,
        param_id: &str,
        payload: &ParamPayload,
    ) -> Result<Parameter, ApiError>;

    /// Delete a parameter. A 404 surfaces as [`ApiError::Status`]; the
    /// synchronizer folds it into the deleted counter.
    async fn delete_parameter(&self, product_id: &str, param_id: &str) -> Result<(), ApiError>;
}

/// Reqwest-backed catalog client.
///
/// Talks to `{endpoint}/products/{product_id}/parameters[/{param_id}]`,
/// sending the API key as the `Authorization` header.
pub struct CatalogClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl CatalogClient {
    /// Create a client for the given endpoint and API key.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn collection_url(&self, product_id: &str) -> String {
        format!("{}/products/{product_id}/parameters", self.endpoint)
    }

    fn resource_url(&self, product_id: &str, param_id: &str) -> String {
        format!("{}/products/{product_id}/parameters/{param_id}", self.endpoint)
    }

    async fn parse_parameter(response: reqwest::Response) -> Result<Parameter, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::from_status(status));
        }
        Ok(response.json().await?)
    }
}

impl CatalogApi for CatalogClient {
    async fn get_parameter(
        &self,
        product_id: &str,
        param_id: &str,
    ) -> Result<Parameter, ApiError> {
        tracing::debug!(product_id, param_id, "GET parameter");
        let response = self
            .client
            .get(self.resource_url(product_id, param_id))
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .send()
            .await?;
        Self::parse_parameter(response).await
    }

    async fn create_parameter(
        &self,
        product_id: &str,
        payload: &ParamPayload,
    ) -> Result<Parameter, ApiError> {
        tracing::debug!(product_id, name = %payload.name, "POST parameter");
        let response = self
            .client
            .post(self.collection_url(product_id))
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .json(payload)
            .send()
            .await?;
        Self::parse_parameter(response).await
    }

    async fn update_parameter(
        &self,
        product_id: &str,
        param_id: &str,
        payload: &ParamPayload,
    ) -> Result<Parameter, ApiError> {
        tracing::debug!(product_id, param_id, "PUT parameter");
        let response = self
            .client
            .put(self.resource_url(product_id, param_id))
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .json(payload)
            .send()
            .await?;
        Self::parse_parameter(response).await
    }

    async fn delete_parameter(&self, product_id: &str, param_id: &str) -> Result<(), ApiError> {
        tracing::debug!(product_id, param_id, "DELETE parameter");
        let response = self
            .client
            .delete(self.resource_url(product_id, param_id))
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::from_status(status));
        }
        Ok(())
    }
}
