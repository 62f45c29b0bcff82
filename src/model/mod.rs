//! Remote parameter representations.
//!
//! [`Parameter`] is what the catalog API returns; [`ParamPayload`] is what
//! create/update calls send. The payload is built once from a validated row
//! and the engine never looks back at raw cells after that.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A parameter as held by the remote catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    /// Remote identifier (`PRM-…`).
    pub id: String,
    /// Slug identifier, unique within the product.
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// `ordering` | `fulfillment`; absent for configuration parameters.
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(rename = "type")]
    pub param_type: String,
    #[serde(default)]
    pub constraints: Option<Value>,
}

/// Outgoing parameter representation for create and update calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamPayload {
    pub name: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    pub scope: String,
    #[serde(rename = "type")]
    pub param_type: String,
    /// Required/unique/hidden flags merged with the row's JSON properties.
    pub constraints: serde_json::Map<String, Value>,
}
