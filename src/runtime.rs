//! Lambda runtime integration.
//!
//! Wires the real AWS collaborators to a [`Router`] and drives the
//! `lambda_runtime` event loop. The remaining-time hint handed to user
//! handlers is derived from the invocation context deadline.

use std::sync::Arc;

use lambda_runtime::{service_fn, LambdaEvent};
use tracing::warn;

use crate::config::RouterConfig;
use crate::deadline::SystemClock;
use crate::event::{CustomResourceRequest, RemainingTime};
use crate::invoker::LambdaContinuationInvoker;
use crate::registry::HandlerRegistry;
use crate::reporter::HttpResultReporter;
use crate::router::{Collaborators, Router};
use crate::secrets::SecretsManagerResolver;
use crate::stack_status::CloudFormationStatusProvider;

/// Initializes a plain `tracing` subscriber suitable for Lambda logs.
///
/// Call once from `main` before [`run`]. Skip this if the binary installs
/// its own subscriber.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();
}

/// Runs the Lambda event loop with the given registry and configuration.
///
/// Builds the production collaborators (CloudFormation status lookup,
/// Secrets Manager resolution, asynchronous self-invocation, HTTP callback
/// delivery) from the ambient AWS configuration. A terminal failure inside
/// a session is reported to CloudFormation and never surfaces as a Lambda
/// invocation error.
pub async fn run(
    registry: HandlerRegistry,
    config: RouterConfig,
) -> Result<(), lambda_runtime::Error> {
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

    let function_name = std::env::var("AWS_LAMBDA_FUNCTION_NAME").unwrap_or_default();
    if function_name.is_empty() {
        warn!("AWS_LAMBDA_FUNCTION_NAME is not set; continuation invocations will fail");
    }

    let reporter = HttpResultReporter::new()
        .with_retries(config.callback_retries)
        .with_secure_attributes(config.secure_attributes.clone());

    let collaborators = Collaborators {
        stack_status: Arc::new(CloudFormationStatusProvider::new(
            aws_sdk_cloudformation::Client::new(&aws_config),
        )),
        secrets: Arc::new(SecretsManagerResolver::new(
            aws_sdk_secretsmanager::Client::new(&aws_config),
        )),
        invoker: Arc::new(LambdaContinuationInvoker::new(
            aws_sdk_lambda::Client::new(&aws_config),
            function_name,
        )),
        reporter: Arc::new(reporter),
        clock: Arc::new(SystemClock),
    };

    let router = Arc::new(Router::new(registry, config, collaborators));

    lambda_runtime::run(service_fn(
        move |event: LambdaEvent<CustomResourceRequest>| {
            let router = Arc::clone(&router);
            async move {
                let remaining = RemainingTime::from_deadline_ms(event.context.deadline);
                let outcome = router.route(event.payload, remaining).await;
                tracing::debug!(?outcome, "invocation complete");
                Ok::<(), lambda_runtime::Error>(())
            }
        },
    ))
    .await
}
