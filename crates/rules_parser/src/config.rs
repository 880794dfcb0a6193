use rules_core::FieldRule;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Validation rules for a service's endpoints.
///
/// A rule file holds two sections, `requests` and `responses`, each mapping
/// an endpoint name to the rules its payload must satisfy. Either section may
/// be omitted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Request rules keyed by endpoint name
    #[serde(default)]
    pub requests: BTreeMap<String, EndpointValidation>,

    /// Response rules keyed by endpoint name
    #[serde(default)]
    pub responses: BTreeMap<String, EndpointValidation>,
}

impl ValidationConfig {
    /// Returns the request rules for `endpoint`, if any.
    pub fn request_validation(&self, endpoint: &str) -> Option<&EndpointValidation> {
        self.requests.get(endpoint)
    }

    /// Returns the response rules for `endpoint`, if any.
    pub fn response_validation(&self, endpoint: &str) -> Option<&EndpointValidation> {
        self.responses.get(endpoint)
    }
}

/// Rules for one endpoint's payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EndpointValidation {
    /// Route the endpoint is served on (informational)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// HTTP method (informational)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// Rule tree applied to the payload root
    #[serde(default)]
    pub validations: Vec<FieldRule>,
}
