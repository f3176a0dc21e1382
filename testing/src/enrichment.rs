//! Fakes for the enrichment collaborator seams: stack status lookup and
//! secret resolution.

use std::collections::HashMap;

use async_trait::async_trait;
use cfn_resource_sdk::{
    HandlerError, SecretResolver, StackStatusInfo, StackStatusProvider,
};

/// A [`StackStatusProvider`] that always returns the same status record.
#[derive(Debug, Clone)]
pub struct StaticStatusProvider {
    info: StackStatusInfo,
}

impl StaticStatusProvider {
    /// Creates a provider returning the given status and reason.
    pub fn new(status: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            info: StackStatusInfo::new(status, reason),
        }
    }
}

#[async_trait]
impl StackStatusProvider for StaticStatusProvider {
    async fn stack_status(&self, _stack_id: &str) -> Result<StackStatusInfo, HandlerError> {
        Ok(self.info.clone())
    }
}

/// A [`StackStatusProvider`] whose lookups always fail, for exercising the
/// degrade-to-UNKNOWN path.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingStatusProvider;

#[async_trait]
impl StackStatusProvider for FailingStatusProvider {
    async fn stack_status(&self, stack_id: &str) -> Result<StackStatusInfo, HandlerError> {
        Err(HandlerError::status_lookup(format!(
            "simulated DescribeStacks failure for '{stack_id}'"
        )))
    }
}

/// A [`SecretResolver`] backed by an in-memory map of reference bodies to
/// plaintext values. References absent from the map fail to resolve.
#[derive(Debug, Clone, Default)]
pub struct MapSecretResolver {
    secrets: HashMap<String, String>,
}

impl MapSecretResolver {
    /// Creates an empty resolver; every resolution fails until secrets are
    /// added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resolvable secret.
    pub fn with_secret(mut self, reference: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(reference.into(), value.into());
        self
    }
}

#[async_trait]
impl SecretResolver for MapSecretResolver {
    async fn resolve(&self, reference: &str) -> Result<String, HandlerError> {
        self.secrets
            .get(reference)
            .cloned()
            .ok_or_else(|| HandlerError::secret_resolution(reference, "secret not found"))
    }
}

/// A [`SecretResolver`] for tests whose properties carry no secret tokens;
/// any resolution attempt fails loudly so an unexpected token is caught.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSecretResolver;

#[async_trait]
impl SecretResolver for NullSecretResolver {
    async fn resolve(&self, reference: &str) -> Result<String, HandlerError> {
        Err(HandlerError::secret_resolution(
            reference,
            "no resolver configured for this test",
        ))
    }
}

/// A [`SecretResolver`] whose resolutions always fail with the given
/// message.
#[derive(Debug, Clone)]
pub struct FailingSecretResolver {
    message: String,
}

impl FailingSecretResolver {
    /// Creates a resolver failing with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl SecretResolver for FailingSecretResolver {
    async fn resolve(&self, reference: &str) -> Result<String, HandlerError> {
        Err(HandlerError::secret_resolution(reference, self.message.clone()))
    }
}
