//! Continuation invocation: scheduling a fresh execution of the same
//! function with the checkpointed envelope as input.
//!
//! The invoker fires an asynchronous (`Event`-type) self-invocation and
//! returns without waiting for or inspecting any result; the continuation
//! chain is held together solely by the envelope each execution passes to
//! the next. A submission failure is terminal for the session, since
//! otherwise no execution would be pending and CloudFormation would never
//! hear back.

use async_trait::async_trait;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::InvocationType;

use crate::error::HandlerError;
use crate::event::CustomResourceRequest;

/// Schedules a new execution of the current unit of work.
#[async_trait]
pub trait ContinuationInvoker: Send + Sync {
    /// Submits `event` as the input of a new, independent execution.
    async fn invoke(&self, event: &CustomResourceRequest) -> Result<(), HandlerError>;
}

/// [`ContinuationInvoker`] that re-invokes the current Lambda function
/// asynchronously.
pub struct LambdaContinuationInvoker {
    client: aws_sdk_lambda::Client,
    function_name: String,
}

impl LambdaContinuationInvoker {
    /// Creates an invoker targeting `function_name`.
    pub fn new(client: aws_sdk_lambda::Client, function_name: impl Into<String>) -> Self {
        Self {
            client,
            function_name: function_name.into(),
        }
    }

    /// Creates an invoker from the ambient AWS configuration, targeting the
    /// function named by `AWS_LAMBDA_FUNCTION_NAME`.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let function_name = std::env::var("AWS_LAMBDA_FUNCTION_NAME").unwrap_or_default();
        Self::new(aws_sdk_lambda::Client::new(&config), function_name)
    }

    /// The function this invoker targets.
    pub fn function_name(&self) -> &str {
        &self.function_name
    }
}

#[async_trait]
impl ContinuationInvoker for LambdaContinuationInvoker {
    async fn invoke(&self, event: &CustomResourceRequest) -> Result<(), HandlerError> {
        let payload = serde_json::to_vec(event).map_err(|e| {
            HandlerError::continuation(format!("failed to serialize continuation event: {e}"))
        })?;

        tracing::info!(
            function_name = %self.function_name,
            request_id = %event.request_id,
            "submitting continuation invocation"
        );

        self.client
            .invoke()
            .function_name(&self.function_name)
            .invocation_type(InvocationType::Event)
            .payload(Blob::new(payload))
            .send()
            .await
            .map_err(|e| HandlerError::continuation(e.to_string()))?;

        Ok(())
    }
}
