//! Shared fixture for routing integration tests.

#![allow(dead_code)] // Used by the individual integration test files.

use std::sync::Arc;

use cfn_resource_sdk::{
    Collaborators, HandlerRegistry, RemainingTime, Router, RouterConfig, SecretResolver,
    StackStatusProvider,
};
use cfn_resource_sdk_testing::{
    ManualClock, NullSecretResolver, RecordingInvoker, RecordingReporter, StaticStatusProvider,
};

/// Session start instant used across the tests.
pub const START: i64 = 1_700_000_000;

/// A remaining-time hint far enough out that no handler cares about it.
pub fn far_future() -> RemainingTime {
    RemainingTime::from_deadline_ms(u64::MAX)
}

/// Recording collaborators wired around a router under test.
pub struct Fixture {
    pub reporter: Arc<RecordingReporter>,
    pub invoker: Arc<RecordingInvoker>,
    pub clock: Arc<ManualClock>,
    pub status: Arc<dyn StackStatusProvider>,
    pub secrets: Arc<dyn SecretResolver>,
}

impl Fixture {
    /// A fixture with accepting fakes and the clock at [`START`].
    pub fn new() -> Self {
        Self {
            reporter: Arc::new(RecordingReporter::new()),
            invoker: Arc::new(RecordingInvoker::new()),
            clock: Arc::new(ManualClock::at(START)),
            status: Arc::new(StaticStatusProvider::new("UPDATE_IN_PROGRESS", "User initiated")),
            secrets: Arc::new(NullSecretResolver),
        }
    }

    pub fn with_status(mut self, status: Arc<dyn StackStatusProvider>) -> Self {
        self.status = status;
        self
    }

    pub fn with_secrets(mut self, secrets: Arc<dyn SecretResolver>) -> Self {
        self.secrets = secrets;
        self
    }

    pub fn with_invoker(mut self, invoker: Arc<RecordingInvoker>) -> Self {
        self.invoker = invoker;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<RecordingReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Builds a router over this fixture's collaborators.
    pub fn router(&self, registry: HandlerRegistry, config: RouterConfig) -> Router {
        Router::new(
            registry,
            config,
            Collaborators {
                stack_status: self.status.clone(),
                secrets: self.secrets.clone(),
                invoker: self.invoker.clone(),
                reporter: self.reporter.clone(),
                clock: self.clock.clone(),
            },
        )
    }
}
