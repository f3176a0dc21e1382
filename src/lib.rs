//! # CloudFormation Custom Resource SDK for the Lambda Rust Runtime
//!
//! This SDK lets CloudFormation custom resource handlers run provisioning
//! logic that outlives a single Lambda invocation. A handler that is about
//! to hit its execution time limit checkpoints its progress; the SDK spawns
//! a fresh asynchronous invocation of the same function carrying the
//! checkpoint, and the new execution resumes where the last one left off.
//! Whichever execution finally completes (or fails) delivers exactly one
//! terminal response to CloudFormation for the whole session.
//!
//! ## How a session flows
//!
//! 1. CloudFormation invokes the function with a Create, Update, or Delete
//!    request.
//! 2. The [`Router`] stamps the session start time, enriches the envelope
//!    (stack status for Update/Delete, secret reference resolution), checks
//!    the session deadline, and dispatches to the registered handler.
//! 3. The handler either finishes, in which case a terminal response is
//!    delivered to the callback URL, or returns
//!    [`HandlerError::Checkpoint`] with an opaque state payload.
//! 4. On a checkpoint, the SDK re-invokes the function asynchronously with
//!    the state attached as `EventState`. The next execution resolves to
//!    the Poll phase and hands that state back to your poll handler.
//! 5. The chain repeats until a handler completes, fails, or the session's
//!    total wall-clock budget (`Timeout`, default 300 seconds) runs out.
//!    The deadline spans the whole chain, not one invocation, and stops
//!    runaway re-invocation.
//!
//! ## Getting started
//!
//! ```toml
//! [dependencies]
//! cfn-resource-sdk = "0.1"
//! lambda_runtime = "0.13"
//! serde_json = "1"
//! tokio = { version = "1", features = ["macros"] }
//! ```
//!
//! ```rust,ignore
//! use cfn_resource_sdk::{
//!     runtime, HandlerError, HandlerRegistry, ResourceResponse, RouterConfig,
//! };
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), lambda_runtime::Error> {
//!     runtime::init_tracing();
//!
//!     let registry = HandlerRegistry::new()
//!         .on_create(|event, remaining| async move {
//!             start_long_provisioning(&event).await?;
//!             // Not enough time left in this invocation to see it through:
//!             // checkpoint and let a continuation take over.
//!             if remaining.remaining_millis() < 30_000 {
//!                 return Err(HandlerError::checkpoint(json!({ "phase": "started" })));
//!             }
//!             Ok(ResourceResponse::new().with_physical_resource_id("cluster-1"))
//!         })
//!         .on_poll(|event, _remaining| async move {
//!             let state = event.event_state.clone().unwrap_or_default();
//!             if still_provisioning(&state).await? {
//!                 return Err(HandlerError::checkpoint(state));
//!             }
//!             Ok(ResourceResponse::new()
//!                 .with_physical_resource_id("cluster-1")
//!                 .with_data_entry("Endpoint", "db.example.com"))
//!         })
//!         .on_delete(|event, _remaining| async move {
//!             tear_down(&event).await?;
//!             Ok(ResourceResponse::new())
//!         });
//!
//!     runtime::run(registry, RouterConfig::default()).await
//! }
//! ```
//!
//! ## Secret references
//!
//! Resource property values of the form
//! `{{resolve:secretsmanager:<secret-id>}}` are replaced with the resolved
//! plaintext before your handler runs, so templates can pass credentials
//! without embedding them. An unresolvable reference fails the session;
//! the raw token is never passed through. Disable the step with
//! [`RouterConfig::with_resolve_secrets`] if your properties can contain
//! literal `{{...}}` text.
//!
//! ## Testing handlers
//!
//! The `cfn-resource-sdk-testing` crate provides recording fakes for every
//! collaborator seam (reporter, invoker, status lookup, secret resolution,
//! clock), so a full continuation chain can be driven in-process: route an
//! event, take the envelope the fake invoker recorded, feed it back in, and
//! assert that exactly one terminal response came out.
//!
//! ## Module organization
//!
//! - [`config`]: router configuration
//! - [`deadline`]: session deadline tracking across chained executions
//! - [`error`]: error taxonomy, including the checkpoint signal
//! - [`event`]: the request envelope and remaining-time hint
//! - [`invoker`]: continuation scheduling
//! - [`registry`]: phase handler registration
//! - [`reporter`]: terminal response delivery
//! - [`response`]: handler results and the callback wire document
//! - [`router`]: the per-execution control loop
//! - [`runtime`]: Lambda runtime integration
//! - [`secrets`]: secret reference scanning and resolution
//! - [`stack_status`]: stack status enrichment

pub mod config;
pub mod deadline;
pub mod error;
pub mod event;
pub mod invoker;
pub mod registry;
pub mod reporter;
pub mod response;
pub mod router;
pub mod runtime;
pub mod secrets;
pub mod stack_status;

pub use config::{RouterConfig, DEFAULT_SESSION_TIMEOUT_SECS};
pub use deadline::{Clock, SessionDeadline, SystemClock};
pub use error::HandlerError;
pub use event::{
    derive_physical_resource_id, CustomResourceRequest, RemainingTime, RequestType,
    ResourcePhase,
};
pub use invoker::{ContinuationInvoker, LambdaContinuationInvoker};
pub use registry::{HandlerFuture, HandlerRegistry};
pub use reporter::{HttpResultReporter, ResultReporter};
pub use response::{CloudFormationResponse, ResourceResponse, ResponseStatus};
pub use router::{Collaborators, Router, RouterOutcome};
pub use secrets::{
    resolve_properties, secret_reference, SecretResolver, SecretsManagerResolver,
};
pub use stack_status::{
    CloudFormationStatusProvider, StackStatusInfo, StackStatusProvider, UNKNOWN_STATUS,
};
