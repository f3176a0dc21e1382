//! Testing utilities for `cfn-resource-sdk`.
//!
//! This crate provides recording fakes for every collaborator seam of the
//! router, plus a manual clock and request envelope builders, so complete
//! provisioning sessions, including multi-execution continuation chains,
//! can be driven in-process without AWS infrastructure.
//!
//! # Driving a full session
//!
//! ```
//! use std::sync::Arc;
//! use cfn_resource_sdk::{
//!     Collaborators, HandlerRegistry, RemainingTime, ResourceResponse,
//!     Router, RouterConfig, RouterOutcome, ResponseStatus,
//! };
//! use cfn_resource_sdk_testing::{
//!     create_event, ManualClock, NullSecretResolver, RecordingInvoker,
//!     RecordingReporter, StaticStatusProvider,
//! };
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let reporter = Arc::new(RecordingReporter::new());
//! let invoker = Arc::new(RecordingInvoker::new());
//! let clock = Arc::new(ManualClock::at(1_000));
//!
//! let registry = HandlerRegistry::new().on_create(|_event, _remaining| async move {
//!     Ok(ResourceResponse::new().with_physical_resource_id("r-1"))
//! });
//!
//! let router = Router::new(
//!     registry,
//!     RouterConfig::default(),
//!     Collaborators {
//!         stack_status: Arc::new(StaticStatusProvider::new("CREATE_IN_PROGRESS", "ok")),
//!         secrets: Arc::new(NullSecretResolver),
//!         invoker: invoker.clone(),
//!         reporter: reporter.clone(),
//!         clock: clock.clone(),
//!     },
//! );
//!
//! let outcome = router
//!     .route(create_event(), RemainingTime::from_deadline_ms(u64::MAX))
//!     .await;
//! assert_eq!(outcome, RouterOutcome::Reported(ResponseStatus::Success));
//! assert_eq!(reporter.calls().len(), 1);
//! assert!(invoker.calls().is_empty());
//! # });
//! ```

mod clock;
mod enrichment;
mod events;
mod invoker;
mod reporter;

pub use clock::ManualClock;
pub use enrichment::{
    FailingSecretResolver, FailingStatusProvider, MapSecretResolver, NullSecretResolver,
    StaticStatusProvider,
};
pub use events::{
    continuation_event, create_event, delete_event, update_event, TEST_LOGICAL_RESOURCE_ID,
    TEST_REQUEST_ID, TEST_RESPONSE_URL, TEST_STACK_ID,
};
pub use invoker::RecordingInvoker;
pub use reporter::{RecordingReporter, ReportedCall};
