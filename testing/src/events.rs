//! Request envelope builders for tests.

use cfn_resource_sdk::{CustomResourceRequest, RequestType};
use serde_json::{json, Value};

/// Stack identity used by the builders.
pub const TEST_STACK_ID: &str =
    "arn:aws:cloudformation:us-east-1:123456789012:stack/test-stack/guid";
/// Request identity used by the builders.
pub const TEST_REQUEST_ID: &str = "req-1";
/// Logical resource id used by the builders.
pub const TEST_LOGICAL_RESOURCE_ID: &str = "TestResource";
/// Callback endpoint used by the builders.
pub const TEST_RESPONSE_URL: &str = "https://cloudformation-response.example/cb";

fn base_event(request_type: RequestType) -> CustomResourceRequest {
    CustomResourceRequest {
        request_type,
        response_url: TEST_RESPONSE_URL.to_string(),
        stack_id: TEST_STACK_ID.to_string(),
        request_id: TEST_REQUEST_ID.to_string(),
        logical_resource_id: TEST_LOGICAL_RESOURCE_ID.to_string(),
        physical_resource_id: None,
        resource_type: Some("Custom::TestResource".to_string()),
        service_token: None,
        resource_properties: json!({"Name": "test"})
            .as_object()
            .expect("literal object")
            .clone(),
        old_resource_properties: None,
        timeout: None,
        creation_time: None,
        event_state: None,
        stack_status: None,
        stack_status_reason: None,
    }
}

/// An initial Create invocation, as CloudFormation would send it.
pub fn create_event() -> CustomResourceRequest {
    base_event(RequestType::Create)
}

/// An initial Update invocation carrying old resource properties.
pub fn update_event() -> CustomResourceRequest {
    let mut event = base_event(RequestType::Update);
    event.physical_resource_id = Some("r-existing".to_string());
    event.old_resource_properties = Some(
        json!({"Name": "previous"})
            .as_object()
            .expect("literal object")
            .clone(),
    );
    event
}

/// An initial Delete invocation.
pub fn delete_event() -> CustomResourceRequest {
    let mut event = base_event(RequestType::Delete);
    event.physical_resource_id = Some("r-existing".to_string());
    event
}

/// A continuation invocation resuming a session.
///
/// `request_type` stays the declared lifecycle operation of the session;
/// the envelope resolves to the Poll phase through the attached state.
pub fn continuation_event(
    request_type: RequestType,
    state: Value,
    creation_time: i64,
    timeout: u64,
) -> CustomResourceRequest {
    let mut event = base_event(request_type);
    event.event_state = Some(state);
    event.creation_time = Some(creation_time);
    event.timeout = Some(timeout);
    event
}
