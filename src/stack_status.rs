//! Stack status enrichment for Update and Delete requests.
//!
//! Before dispatching an Update or Delete, the router asks the status
//! provider for the owning stack's current status so handlers can tell an
//! ordinary update apart from, say, a rollback in progress. Lookup failure
//! is never fatal: the status fields degrade to [`UNKNOWN_STATUS`] and
//! provisioning proceeds.

use async_trait::async_trait;

use crate::error::HandlerError;

/// Placeholder used for both status fields when lookup fails.
pub const UNKNOWN_STATUS: &str = "UNKNOWN";

/// Current status of a CloudFormation stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackStatusInfo {
    /// Status name, e.g. `UPDATE_IN_PROGRESS`
    pub status: String,
    /// Human-readable reason accompanying the status
    pub reason: String,
}

impl StackStatusInfo {
    /// Creates a status record.
    pub fn new(status: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            reason: reason.into(),
        }
    }

    /// The degraded record used when lookup fails.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_STATUS, UNKNOWN_STATUS)
    }
}

/// Looks up the current status of a stack.
#[async_trait]
pub trait StackStatusProvider: Send + Sync {
    /// Returns the status of the stack identified by `stack_id`.
    async fn stack_status(&self, stack_id: &str) -> Result<StackStatusInfo, HandlerError>;
}

/// [`StackStatusProvider`] backed by the CloudFormation DescribeStacks API.
pub struct CloudFormationStatusProvider {
    client: aws_sdk_cloudformation::Client,
}

impl CloudFormationStatusProvider {
    /// Creates a provider from an existing CloudFormation client.
    pub fn new(client: aws_sdk_cloudformation::Client) -> Self {
        Self { client }
    }

    /// Creates a provider from the ambient AWS configuration.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(aws_sdk_cloudformation::Client::new(&config))
    }
}

#[async_trait]
impl StackStatusProvider for CloudFormationStatusProvider {
    async fn stack_status(&self, stack_id: &str) -> Result<StackStatusInfo, HandlerError> {
        let output = self
            .client
            .describe_stacks()
            .stack_name(stack_id)
            .send()
            .await
            .map_err(|e| HandlerError::status_lookup(e.to_string()))?;

        let stack = output.stacks().first().ok_or_else(|| {
            HandlerError::status_lookup(format!("no stack found for '{stack_id}'"))
        })?;

        let status = stack
            .stack_status()
            .map(|s| s.as_str().to_string())
            .unwrap_or_else(|| UNKNOWN_STATUS.to_string());
        let reason = stack
            .stack_status_reason()
            .unwrap_or(UNKNOWN_STATUS)
            .to_string();

        Ok(StackStatusInfo { status, reason })
    }
}
