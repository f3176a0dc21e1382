//! Terminal result delivery to the CloudFormation callback endpoint.
//!
//! Exactly one terminal response is delivered per provisioning session.
//! Delivery is a single HTTP PUT of the response document to the presigned
//! callback URL, with a bounded best-effort retry; unbounded retry is
//! deliberately avoided because CloudFormation does not define duplicate
//! delivery semantics. If every attempt fails the outcome is lost from the
//! orchestrator's perspective, which is surfaced to the operator through
//! error-level logs rather than hidden.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::HandlerError;
use crate::response::CloudFormationResponse;

/// Delivers the terminal outcome of a session to the callback endpoint.
#[async_trait]
pub trait ResultReporter: Send + Sync {
    /// Serializes `response` and delivers it to `response_url`.
    async fn report(
        &self,
        response_url: &str,
        response: &CloudFormationResponse,
    ) -> Result<(), HandlerError>;
}

/// [`ResultReporter`] delivering over HTTP PUT.
///
/// The presigned callback URL requires an empty `Content-Type` header; a
/// signed content type would invalidate the URL's signature.
pub struct HttpResultReporter {
    http: reqwest::Client,
    retries: u32,
    secure_attributes: Vec<String>,
}

impl HttpResultReporter {
    /// Creates a reporter with one best-effort retry and no masked
    /// attributes.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            retries: 1,
            secure_attributes: Vec::new(),
        }
    }

    /// Sets the number of delivery retries after the first attempt.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Sets the output attribute names masked in logged responses.
    pub fn with_secure_attributes(mut self, attributes: Vec<String>) -> Self {
        self.secure_attributes = attributes;
        self
    }

    /// Total number of delivery attempts this reporter will make.
    pub fn attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

impl Default for HttpResultReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResultReporter for HttpResultReporter {
    async fn report(
        &self,
        response_url: &str,
        response: &CloudFormationResponse,
    ) -> Result<(), HandlerError> {
        let body = serde_json::to_string(response)
            .map_err(|e| HandlerError::serialization(e.to_string()))?;

        info!(
            status = %response.status,
            request_id = %response.request_id,
            "responding to CloudFormation with: {}",
            response.sanitized(&self.secure_attributes)
        );

        let mut last_error: Option<reqwest::Error> = None;
        for attempt in 1..=self.attempts() {
            let result = self
                .http
                .put(response_url)
                .header(reqwest::header::CONTENT_TYPE, "")
                .body(body.clone())
                .send()
                .await
                .and_then(|r| r.error_for_status());

            match result {
                Ok(_) => {
                    debug!(attempt, "terminal response delivered");
                    return Ok(());
                }
                Err(err) => {
                    warn!(attempt, error = %err, "callback delivery attempt failed");
                    last_error = Some(err);
                }
            }
        }

        Err(HandlerError::callback(
            last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no delivery attempts were made".to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reporter_makes_two_attempts() {
        assert_eq!(HttpResultReporter::new().attempts(), 2);
    }

    #[test]
    fn test_retries_zero_means_single_attempt() {
        assert_eq!(HttpResultReporter::new().with_retries(0).attempts(), 1);
    }

    #[test]
    fn test_attempts_saturate() {
        assert_eq!(
            HttpResultReporter::new().with_retries(u32::MAX).attempts(),
            u32::MAX
        );
    }
}
