//! Response types for custom resource handlers and the CloudFormation
//! callback document.
//!
//! Handlers produce a [`ResourceResponse`]; the router folds it together
//! with the envelope identity fields into a [`CloudFormationResponse`], the
//! wire document delivered to the callback endpoint.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Terminal status of a provisioning session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    /// The operation completed successfully
    Success,
    /// The operation failed
    Failed,
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "SUCCESS"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// The success value returned by a phase handler.
///
/// A handler that completes normally always produces a `SUCCESS` terminal
/// outcome; failures are expressed by returning an error instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceResponse {
    /// Identity of the provisioned resource; overrides the envelope's id
    /// (or the derived default) in the terminal response when set
    pub physical_resource_id: Option<String>,

    /// Output attributes made available to the template via `Fn::GetAtt`
    pub data: Option<Map<String, Value>>,
}

impl ResourceResponse {
    /// Creates an empty success response.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the physical resource id reported to CloudFormation.
    pub fn with_physical_resource_id(mut self, id: impl Into<String>) -> Self {
        self.physical_resource_id = Some(id.into());
        self
    }

    /// Replaces the output data map.
    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = Some(data);
        self
    }

    /// Adds a single output attribute.
    pub fn with_data_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }
}

/// The terminal outcome document delivered to the callback endpoint.
///
/// Exactly one of these is sent per provisioning session, regardless of how
/// many chained executions the session spanned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudFormationResponse {
    /// Terminal status of the session
    #[serde(rename = "Status")]
    pub status: ResponseStatus,

    /// Failure reason; also used to carry informational text on success
    #[serde(rename = "Reason", skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Identity of the provisioned resource
    #[serde(rename = "PhysicalResourceId")]
    pub physical_resource_id: String,

    /// Stack identity echoed from the request
    #[serde(rename = "StackId")]
    pub stack_id: String,

    /// Request identity echoed from the request
    #[serde(rename = "RequestId")]
    pub request_id: String,

    /// Logical resource identity echoed from the request
    #[serde(rename = "LogicalResourceId")]
    pub logical_resource_id: String,

    /// Output attributes from the handler, if any
    #[serde(rename = "Data", skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

impl CloudFormationResponse {
    /// Serializes the response with sensitive output attributes masked.
    ///
    /// Used for logging only; the delivered document is never masked.
    /// Attribute names listed in `secure_attributes` have their values
    /// replaced with `*******`, matching what operators expect to see in
    /// place of credentials.
    pub fn sanitized(&self, secure_attributes: &[String]) -> String {
        let mut masked = self.clone();
        if let Some(data) = masked.data.as_mut() {
            for (key, value) in data.iter_mut() {
                if secure_attributes.iter().any(|attr| attr == key) {
                    *value = Value::String("*******".to_string());
                }
            }
        }
        serde_json::to_string(&masked)
            .unwrap_or_else(|_| "<unserializable response>".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_response() -> CloudFormationResponse {
        CloudFormationResponse {
            status: ResponseStatus::Success,
            reason: None,
            physical_resource_id: "r-1".to_string(),
            stack_id: "stack-1".to_string(),
            request_id: "req-1".to_string(),
            logical_resource_id: "MyResource".to_string(),
            data: None,
        }
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&ResponseStatus::Success).unwrap(),
            r#""SUCCESS""#
        );
        assert_eq!(
            serde_json::to_string(&ResponseStatus::Failed).unwrap(),
            r#""FAILED""#
        );
        assert_eq!(ResponseStatus::Failed.to_string(), "FAILED");
    }

    #[test]
    fn test_response_document_field_names() {
        let mut response = sample_response();
        response.data = Some(
            json!({"Endpoint": "db.example.com"})
                .as_object()
                .unwrap()
                .clone(),
        );
        let serialized = serde_json::to_string(&response).unwrap();
        assert!(serialized.contains(r#""Status":"SUCCESS""#));
        assert!(serialized.contains(r#""PhysicalResourceId":"r-1""#));
        assert!(serialized.contains(r#""StackId":"stack-1""#));
        assert!(serialized.contains(r#""RequestId":"req-1""#));
        assert!(serialized.contains(r#""LogicalResourceId":"MyResource""#));
        assert!(serialized.contains(r#""Data""#));
        assert!(!serialized.contains("Reason"));
    }

    #[test]
    fn test_resource_response_builders() {
        let response = ResourceResponse::new()
            .with_physical_resource_id("r-42")
            .with_data_entry("Endpoint", "db.example.com")
            .with_data_entry("Port", 5432);
        assert_eq!(response.physical_resource_id.as_deref(), Some("r-42"));
        let data = response.data.unwrap();
        assert_eq!(data.get("Endpoint"), Some(&json!("db.example.com")));
        assert_eq!(data.get("Port"), Some(&json!(5432)));
    }

    #[test]
    fn test_sanitized_masks_secure_attributes() {
        let mut response = sample_response();
        response.data = Some(
            json!({"Password": "hunter2", "Endpoint": "db.example.com"})
                .as_object()
                .unwrap()
                .clone(),
        );
        let sanitized = response.sanitized(&["Password".to_string()]);
        assert!(!sanitized.contains("hunter2"));
        assert!(sanitized.contains("*******"));
        assert!(sanitized.contains("db.example.com"));
    }

    #[test]
    fn test_sanitized_without_data_is_plain_serialization() {
        let response = sample_response();
        let sanitized = response.sanitized(&["Password".to_string()]);
        assert_eq!(sanitized, serde_json::to_string(&response).unwrap());
    }
}
