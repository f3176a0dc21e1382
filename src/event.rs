//! Request envelope types for CloudFormation custom resource invocations.
//!
//! A [`CustomResourceRequest`] is the unit of input threaded through every
//! execution of a provisioning session. CloudFormation creates the initial
//! envelope; the continuation invoker creates every subsequent one, carrying
//! forward the session fields (`CreationTime`, `Timeout`, identity) and the
//! latest checkpoint state (`EventState`).

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use blake2::{Blake2b512, Digest};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lifecycle operation declared by CloudFormation for this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestType {
    /// Provision a new resource
    Create,
    /// Update an existing resource
    Update,
    /// Remove an existing resource
    Delete,
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "Create"),
            Self::Update => write!(f, "Update"),
            Self::Delete => write!(f, "Delete"),
        }
    }
}

/// The phase a single execution is dispatched as.
///
/// The first execution of a session runs as the orchestrator-declared
/// lifecycle operation; every continuation runs as [`ResourcePhase::Poll`],
/// resolved from the presence of checkpoint state on the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourcePhase {
    /// Initial create invocation
    Create,
    /// Initial update invocation
    Update,
    /// Initial delete invocation
    Delete,
    /// Continuation of an earlier execution, resuming from checkpoint state
    Poll,
}

impl From<RequestType> for ResourcePhase {
    fn from(request_type: RequestType) -> Self {
        match request_type {
            RequestType::Create => Self::Create,
            RequestType::Update => Self::Update,
            RequestType::Delete => Self::Delete,
        }
    }
}

impl fmt::Display for ResourcePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "Create"),
            Self::Update => write!(f, "Update"),
            Self::Delete => write!(f, "Delete"),
            Self::Poll => write!(f, "Poll"),
        }
    }
}

/// The request envelope for a custom resource invocation.
///
/// Field names follow the CloudFormation custom resource request schema.
/// The session fields (`Timeout`, `CreationTime`, `EventState`,
/// `StackStatus`, `StackStatusReason`) are owned by this SDK and are not
/// part of what CloudFormation itself sends: `CreationTime` is stamped by
/// the router on first sight of a session, `EventState` is attached by the
/// continuation invoker, and the status fields are filled by enrichment
/// before dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomResourceRequest {
    /// The declared lifecycle operation; immutable for the whole session
    #[serde(rename = "RequestType")]
    pub request_type: RequestType,

    /// Presigned URL for delivering the terminal response
    #[serde(rename = "ResponseURL")]
    pub response_url: String,

    /// Identity of the owning stack
    #[serde(rename = "StackId")]
    pub stack_id: String,

    /// Identity of this provisioning request
    #[serde(rename = "RequestId")]
    pub request_id: String,

    /// Template-level name of the resource
    #[serde(rename = "LogicalResourceId")]
    pub logical_resource_id: String,

    /// Identity of the provisioned resource; absent on first Create
    #[serde(rename = "PhysicalResourceId", skip_serializing_if = "Option::is_none")]
    pub physical_resource_id: Option<String>,

    /// Custom resource type name, e.g. `Custom::DatabaseSeed`
    #[serde(rename = "ResourceType", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    /// ARN of the Lambda function backing this resource
    #[serde(rename = "ServiceToken", skip_serializing_if = "Option::is_none")]
    pub service_token: Option<String>,

    /// Provisioning input; may contain secret reference tokens
    #[serde(rename = "ResourceProperties", default)]
    pub resource_properties: Map<String, Value>,

    /// Previous provisioning input, supplied by CloudFormation on Update
    #[serde(rename = "OldResourceProperties", skip_serializing_if = "Option::is_none")]
    pub old_resource_properties: Option<Map<String, Value>>,

    /// Total wall-clock budget in seconds for the whole session
    #[serde(rename = "Timeout", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Epoch seconds at which the session started; set exactly once
    #[serde(rename = "CreationTime", skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<i64>,

    /// Checkpoint state from the previous execution; present only on
    /// continuations and never inspected by the router
    #[serde(rename = "EventState", skip_serializing_if = "Option::is_none")]
    pub event_state: Option<Value>,

    /// Stack status populated by enrichment for Update/Delete requests
    #[serde(rename = "StackStatus", skip_serializing_if = "Option::is_none")]
    pub stack_status: Option<String>,

    /// Stack status reason populated alongside `stack_status`
    #[serde(rename = "StackStatusReason", skip_serializing_if = "Option::is_none")]
    pub stack_status_reason: Option<String>,
}

impl CustomResourceRequest {
    /// Returns true if this envelope resumes an earlier execution.
    ///
    /// Continuation is derived from the presence of checkpoint state; it is
    /// never transmitted as a separate flag.
    pub fn is_continuation(&self) -> bool {
        self.event_state.is_some()
    }

    /// Resolves the phase this execution should be dispatched as.
    pub fn phase(&self) -> ResourcePhase {
        if self.is_continuation() {
            ResourcePhase::Poll
        } else {
            self.request_type.into()
        }
    }
}

/// Derives a stable default physical resource id from the stack and logical
/// resource identities.
///
/// Used when the envelope carries no `PhysicalResourceId` (the first Create
/// call). The digest depends only on its inputs, so every execution of the
/// session and every later Update/Delete derives the same id.
pub fn derive_physical_resource_id(stack_id: &str, logical_resource_id: &str) -> String {
    let mut hasher = Blake2b512::new();
    hasher.update(stack_id.as_bytes());
    hasher.update(logical_resource_id.as_bytes());
    let digest = hasher.finalize();
    digest[..16].iter().map(|b| format!("{b:02x}")).collect()
}

/// Milliseconds left before the current execution is forcibly terminated.
///
/// Supplied by the execution host (the Lambda invocation deadline) and
/// consulted only by user handlers to decide when to checkpoint; the router
/// never queries it.
#[derive(Debug, Clone, Copy)]
pub struct RemainingTime {
    deadline_epoch_ms: u64,
}

impl RemainingTime {
    /// Creates a remaining-time hint from an absolute deadline in epoch
    /// milliseconds.
    pub fn from_deadline_ms(deadline_epoch_ms: u64) -> Self {
        Self { deadline_epoch_ms }
    }

    /// Time left in the current execution, saturating at zero.
    pub fn remaining(&self) -> Duration {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Duration::from_millis(self.deadline_epoch_ms.saturating_sub(now_ms))
    }

    /// Milliseconds left in the current execution, saturating at zero.
    pub fn remaining_millis(&self) -> u64 {
        self.remaining().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_event_json() -> &'static str {
        r#"{
            "RequestType": "Create",
            "ResponseURL": "https://cloudformation-custom-resource-response.example/cb",
            "StackId": "arn:aws:cloudformation:us-east-1:123456789012:stack/demo/guid",
            "RequestId": "req-1",
            "LogicalResourceId": "MyResource",
            "ResourceType": "Custom::DatabaseSeed",
            "ServiceToken": "arn:aws:lambda:us-east-1:123456789012:function:seed",
            "ResourceProperties": {
                "TableName": "users"
            }
        }"#
    }

    #[test]
    fn test_deserialize_initial_event() {
        let event: CustomResourceRequest = serde_json::from_str(sample_event_json()).unwrap();
        assert_eq!(event.request_type, RequestType::Create);
        assert_eq!(event.logical_resource_id, "MyResource");
        assert_eq!(
            event.resource_properties.get("TableName"),
            Some(&json!("users"))
        );
        assert!(event.physical_resource_id.is_none());
        assert!(event.creation_time.is_none());
        assert!(!event.is_continuation());
        assert_eq!(event.phase(), ResourcePhase::Create);
    }

    #[test]
    fn test_phase_resolves_to_poll_for_continuations() {
        let mut event: CustomResourceRequest =
            serde_json::from_str(sample_event_json()).unwrap();
        event.event_state = Some(json!({"progress": 3}));
        assert!(event.is_continuation());
        assert_eq!(event.phase(), ResourcePhase::Poll);
    }

    #[test]
    fn test_session_fields_round_trip() {
        let mut event: CustomResourceRequest =
            serde_json::from_str(sample_event_json()).unwrap();
        event.creation_time = Some(1_700_000_000);
        event.timeout = Some(600);
        event.event_state = Some(json!({"step": "waiting"}));

        let serialized = serde_json::to_string(&event).unwrap();
        assert!(serialized.contains("\"CreationTime\":1700000000"));
        assert!(serialized.contains("\"Timeout\":600"));
        assert!(serialized.contains("\"EventState\""));

        let round_tripped: CustomResourceRequest =
            serde_json::from_str(&serialized).unwrap();
        assert_eq!(round_tripped.creation_time, Some(1_700_000_000));
        assert_eq!(round_tripped.timeout, Some(600));
        assert_eq!(round_tripped.event_state, Some(json!({"step": "waiting"})));
    }

    #[test]
    fn test_absent_optional_fields_are_not_serialized() {
        let event: CustomResourceRequest = serde_json::from_str(sample_event_json()).unwrap();
        let serialized = serde_json::to_string(&event).unwrap();
        assert!(!serialized.contains("PhysicalResourceId"));
        assert!(!serialized.contains("CreationTime"));
        assert!(!serialized.contains("EventState"));
        assert!(!serialized.contains("StackStatus"));
    }

    #[test]
    fn test_derived_physical_resource_id_is_stable() {
        let a = derive_physical_resource_id("stack-1", "Resource");
        let b = derive_physical_resource_id("stack-1", "Resource");
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn test_derived_physical_resource_id_varies_by_identity() {
        let a = derive_physical_resource_id("stack-1", "Resource");
        let b = derive_physical_resource_id("stack-2", "Resource");
        let c = derive_physical_resource_id("stack-1", "Other");
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_remaining_time_saturates_at_zero() {
        let expired = RemainingTime::from_deadline_ms(0);
        assert_eq!(expired.remaining_millis(), 0);
    }

    #[test]
    fn test_remaining_time_for_future_deadline() {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;
        let hint = RemainingTime::from_deadline_ms(now_ms + 60_000);
        assert!(hint.remaining_millis() > 30_000);
    }
}
