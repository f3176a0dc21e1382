//! Recording fake for the result reporter seam.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use cfn_resource_sdk::{CloudFormationResponse, HandlerError, ResultReporter};

/// Record of one delivery attempt made through the fake reporter.
#[derive(Debug, Clone)]
pub struct ReportedCall {
    /// The callback endpoint the response was addressed to
    pub response_url: String,
    /// The response document as handed to the reporter
    pub response: CloudFormationResponse,
}

/// A [`ResultReporter`] that records every call instead of delivering.
///
/// Exactly-once assertions are made against [`RecordingReporter::calls`].
/// Configure simulated delivery failures with
/// [`RecordingReporter::failing_times`].
#[derive(Debug, Default)]
pub struct RecordingReporter {
    calls: Mutex<Vec<ReportedCall>>,
    remaining_failures: AtomicU32,
}

impl RecordingReporter {
    /// Creates a reporter that accepts every delivery.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a reporter whose first `failures` calls return a delivery
    /// error (after recording the attempt).
    pub fn failing_times(failures: u32) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            remaining_failures: AtomicU32::new(failures),
        }
    }

    /// All calls recorded so far.
    pub fn calls(&self) -> Vec<ReportedCall> {
        self.calls.lock().expect("reporter mutex poisoned").clone()
    }

    /// Convenience accessor for the single recorded response.
    ///
    /// Panics unless exactly one call was recorded, which is the invariant
    /// most tests are asserting anyway.
    pub fn only_call(&self) -> ReportedCall {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one reported response");
        calls.into_iter().next().expect("one call present")
    }
}

#[async_trait]
impl ResultReporter for RecordingReporter {
    async fn report(
        &self,
        response_url: &str,
        response: &CloudFormationResponse,
    ) -> Result<(), HandlerError> {
        self.calls
            .lock()
            .expect("reporter mutex poisoned")
            .push(ReportedCall {
                response_url: response_url.to_string(),
                response: response.clone(),
            });

        let remaining = self.remaining_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.remaining_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(HandlerError::callback("simulated delivery failure"));
        }
        Ok(())
    }
}
