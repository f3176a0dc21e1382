//! Recording fake for the continuation invoker seam.

use std::sync::Mutex;

use async_trait::async_trait;
use cfn_resource_sdk::{ContinuationInvoker, CustomResourceRequest, HandlerError};

/// A [`ContinuationInvoker`] that records submitted envelopes instead of
/// invoking anything.
///
/// Continuation chains are driven by taking a recorded envelope and routing
/// it again as the next execution's input.
#[derive(Debug, Default)]
pub struct RecordingInvoker {
    calls: Mutex<Vec<CustomResourceRequest>>,
    fail_submission: bool,
}

impl RecordingInvoker {
    /// Creates an invoker that accepts every submission.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an invoker whose submissions fail (after recording), for
    /// exercising the continuation-submission-failure path.
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_submission: true,
        }
    }

    /// All envelopes submitted so far.
    pub fn calls(&self) -> Vec<CustomResourceRequest> {
        self.calls.lock().expect("invoker mutex poisoned").clone()
    }

    /// Convenience accessor for the single recorded envelope.
    pub fn only_call(&self) -> CustomResourceRequest {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one continuation");
        calls.into_iter().next().expect("one call present")
    }
}

#[async_trait]
impl ContinuationInvoker for RecordingInvoker {
    async fn invoke(&self, event: &CustomResourceRequest) -> Result<(), HandlerError> {
        self.calls
            .lock()
            .expect("invoker mutex poisoned")
            .push(event.clone());
        if self.fail_submission {
            return Err(HandlerError::continuation("simulated submission failure"));
        }
        Ok(())
    }
}
