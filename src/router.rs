//! Phase routing: the per-execution control loop of a provisioning session.
//!
//! Every execution of the session runs [`Router::route`] exactly once. The
//! router resolves the phase, stamps the session fields on first sight,
//! enriches the envelope (stack status, secret resolution), enforces the
//! session deadline, dispatches to the registered handler, and finishes the
//! execution in one of two ways: delivering the single terminal response
//! for the whole session, or submitting a continuation and reporting
//! nothing. Reporting is deferred to whichever execution in the chain
//! terminates the session, which is what keeps the terminal response
//! exactly-once.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::RouterConfig;
use crate::deadline::{Clock, SessionDeadline};
use crate::error::HandlerError;
use crate::event::{derive_physical_resource_id, CustomResourceRequest, RemainingTime, RequestType};
use crate::invoker::ContinuationInvoker;
use crate::registry::HandlerRegistry;
use crate::reporter::ResultReporter;
use crate::response::{CloudFormationResponse, ResourceResponse, ResponseStatus};
use crate::secrets::{resolve_properties, SecretResolver};
use crate::stack_status::{StackStatusProvider, UNKNOWN_STATUS};

/// How an execution ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterOutcome {
    /// The session terminated; one response with this status was delivered
    /// (or delivery was attempted and the failure logged).
    Reported(ResponseStatus),
    /// A continuation was submitted; no response was sent and a later
    /// execution will terminate the session.
    Continued,
}

/// The injected collaborators a router dispatches through.
///
/// Everything the router does outside its own process boundary goes
/// through these trait objects, which is what makes the full routing
/// contract drivable in tests with recording fakes.
pub struct Collaborators {
    /// Stack status lookup for Update/Delete enrichment
    pub stack_status: Arc<dyn StackStatusProvider>,
    /// Secret reference resolution for resource properties
    pub secrets: Arc<dyn SecretResolver>,
    /// Continuation scheduling
    pub invoker: Arc<dyn ContinuationInvoker>,
    /// Terminal response delivery
    pub reporter: Arc<dyn ResultReporter>,
    /// Wall-clock source for deadline decisions
    pub clock: Arc<dyn Clock>,
}

/// Routes custom resource invocations to registered phase handlers.
pub struct Router {
    registry: HandlerRegistry,
    config: RouterConfig,
    collaborators: Collaborators,
}

impl Router {
    /// Creates a router over a registry, configuration, and collaborators.
    pub fn new(
        registry: HandlerRegistry,
        config: RouterConfig,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            registry,
            config,
            collaborators,
        }
    }

    /// Processes one execution of a provisioning session.
    ///
    /// Never returns an error: every failure mode is converted into a
    /// terminal `FAILED` response, because the alternative is a session
    /// CloudFormation waits on until its own timeout.
    pub async fn route(
        &self,
        event: CustomResourceRequest,
        remaining: RemainingTime,
    ) -> RouterOutcome {
        let mut event = event;
        let phase = event.phase();

        // First sight of a session: stamp the start time and default the
        // budget. Continuations carry both forward unchanged.
        if event.creation_time.is_none() {
            event.creation_time = Some(self.collaborators.clock.now_epoch_secs());
        }
        if event.timeout.is_none() {
            event.timeout = Some(self.config.default_timeout_secs);
        }

        let physical_resource_id = event.physical_resource_id.clone().unwrap_or_else(|| {
            derive_physical_resource_id(&event.stack_id, &event.logical_resource_id)
        });

        info!(
            phase = %phase,
            request_id = %event.request_id,
            logical_resource_id = %event.logical_resource_id,
            continuation = event.is_continuation(),
            "routing custom resource request"
        );

        // Status enrichment keys off the declared lifecycle operation, so
        // continuations of an Update or Delete are enriched too.
        if matches!(event.request_type, RequestType::Update | RequestType::Delete) {
            match self
                .collaborators
                .stack_status
                .stack_status(&event.stack_id)
                .await
            {
                Ok(info) => {
                    event.stack_status = Some(info.status);
                    event.stack_status_reason = Some(info.reason);
                }
                Err(err) => {
                    warn!(
                        error = %err,
                        stack_id = %event.stack_id,
                        "stack status lookup failed, proceeding with UNKNOWN"
                    );
                    event.stack_status = Some(UNKNOWN_STATUS.to_string());
                    event.stack_status_reason = Some(UNKNOWN_STATUS.to_string());
                }
            }
        }

        if self.config.resolve_secrets {
            if let Err(err) = resolve_properties(
                &mut event.resource_properties,
                self.collaborators.secrets.as_ref(),
            )
            .await
            {
                return self
                    .report_failure(&event, physical_resource_id, err.to_string())
                    .await;
            }
        }

        // creation_time and timeout are always present past the stamping
        // above; the unwrap_or values are unreachable defaults.
        let deadline = SessionDeadline::new(
            event.creation_time.unwrap_or(0),
            event.timeout.unwrap_or(self.config.default_timeout_secs),
        );

        if deadline.is_expired_at(self.collaborators.clock.now_epoch_secs()) {
            info!(
                timeout_secs = deadline.timeout_secs(),
                "session reached its maximum timeout before dispatch"
            );
            let reason = HandlerError::session_timeout(deadline.timeout_secs()).to_string();
            return self.report_failure(&event, physical_resource_id, reason).await;
        }

        let handler = match self.registry.get(phase) {
            Some(handler) => handler,
            None => {
                let reason = HandlerError::UnregisteredPhase { phase }.to_string();
                return self.report_failure(&event, physical_resource_id, reason).await;
            }
        };

        match (handler.as_ref())(event.clone(), remaining).await {
            Ok(resource) => {
                self.report_success(&event, physical_resource_id, resource)
                    .await
            }
            Err(HandlerError::Checkpoint { state }) => {
                // Re-check with a fresh clock reading: the handler may have
                // run right up to the last available instant.
                if deadline.is_expired_at(self.collaborators.clock.now_epoch_secs()) {
                    info!(
                        timeout_secs = deadline.timeout_secs(),
                        "session reached its maximum timeout at checkpoint"
                    );
                    let reason =
                        HandlerError::session_timeout(deadline.timeout_secs()).to_string();
                    return self.report_failure(&event, physical_resource_id, reason).await;
                }

                let mut continuation = event.clone();
                continuation.event_state = Some(state);

                match self.collaborators.invoker.invoke(&continuation).await {
                    Ok(()) => {
                        info!(
                            request_id = %event.request_id,
                            "checkpoint captured, continuation submitted"
                        );
                        RouterOutcome::Continued
                    }
                    Err(err) => {
                        error!(error = %err, "continuation submission failed");
                        self.report_failure(&event, physical_resource_id, err.to_string())
                            .await
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, phase = %phase, "resource handler failed");
                self.report_failure(&event, physical_resource_id, err.to_string())
                    .await
            }
        }
    }

    async fn report_success(
        &self,
        event: &CustomResourceRequest,
        default_physical_resource_id: String,
        resource: ResourceResponse,
    ) -> RouterOutcome {
        let response = CloudFormationResponse {
            status: ResponseStatus::Success,
            reason: None,
            physical_resource_id: resource
                .physical_resource_id
                .unwrap_or(default_physical_resource_id),
            stack_id: event.stack_id.clone(),
            request_id: event.request_id.clone(),
            logical_resource_id: event.logical_resource_id.clone(),
            data: resource.data,
        };
        self.deliver(event, response).await
    }

    async fn report_failure(
        &self,
        event: &CustomResourceRequest,
        physical_resource_id: String,
        reason: String,
    ) -> RouterOutcome {
        let response = CloudFormationResponse {
            status: ResponseStatus::Failed,
            reason: Some(reason),
            physical_resource_id,
            stack_id: event.stack_id.clone(),
            request_id: event.request_id.clone(),
            logical_resource_id: event.logical_resource_id.clone(),
            data: None,
        };
        self.deliver(event, response).await
    }

    async fn deliver(
        &self,
        event: &CustomResourceRequest,
        response: CloudFormationResponse,
    ) -> RouterOutcome {
        let status = response.status;
        if let Err(err) = self
            .collaborators
            .reporter
            .report(&event.response_url, &response)
            .await
        {
            // The outcome is lost from CloudFormation's perspective; all we
            // can do is make sure an operator can see why.
            error!(
                error = %err,
                request_id = %event.request_id,
                "failed to deliver terminal response to CloudFormation"
            );
        }
        RouterOutcome::Reported(status)
    }
}
