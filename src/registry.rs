//! Handler registration keyed by lifecycle phase.
//!
//! The registry is an explicit value constructed once per process and
//! handed to the router; there is no global registration state. Each of
//! the four phases accepts one async handler of signature
//! `(CustomResourceRequest, RemainingTime) -> Result<ResourceResponse,
//! HandlerError>`.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::HandlerError;
use crate::event::{CustomResourceRequest, RemainingTime, ResourcePhase};
use crate::response::ResourceResponse;

/// Boxed future returned by a registered phase handler.
pub type HandlerFuture =
    Pin<Box<dyn Future<Output = Result<ResourceResponse, HandlerError>> + Send>>;

type BoxedHandler =
    Arc<dyn Fn(CustomResourceRequest, RemainingTime) -> HandlerFuture + Send + Sync>;

/// Registry of phase handlers for one custom resource function.
///
/// ```
/// use cfn_resource_sdk::{HandlerRegistry, ResourceResponse};
///
/// let registry = HandlerRegistry::new()
///     .on_create(|_event, _remaining| async move {
///         Ok(ResourceResponse::new().with_physical_resource_id("r-1"))
///     })
///     .on_delete(|_event, _remaining| async move {
///         Ok(ResourceResponse::new())
///     });
/// assert!(registry.is_registered(cfn_resource_sdk::ResourcePhase::Create));
/// assert!(!registry.is_registered(cfn_resource_sdk::ResourcePhase::Update));
/// ```
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<ResourcePhase, BoxedHandler>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registers the handler for initial Create invocations.
    pub fn on_create<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(CustomResourceRequest, RemainingTime) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ResourceResponse, HandlerError>> + Send + 'static,
    {
        self.register(ResourcePhase::Create, handler)
    }

    /// Registers the handler for initial Update invocations.
    pub fn on_update<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(CustomResourceRequest, RemainingTime) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ResourceResponse, HandlerError>> + Send + 'static,
    {
        self.register(ResourcePhase::Update, handler)
    }

    /// Registers the handler for initial Delete invocations.
    pub fn on_delete<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(CustomResourceRequest, RemainingTime) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ResourceResponse, HandlerError>> + Send + 'static,
    {
        self.register(ResourcePhase::Delete, handler)
    }

    /// Registers the handler for continuation (Poll) invocations.
    pub fn on_poll<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(CustomResourceRequest, RemainingTime) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ResourceResponse, HandlerError>> + Send + 'static,
    {
        self.register(ResourcePhase::Poll, handler)
    }

    /// Registers a handler for an arbitrary phase.
    pub fn register<F, Fut>(mut self, phase: ResourcePhase, handler: F) -> Self
    where
        F: Fn(CustomResourceRequest, RemainingTime) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ResourceResponse, HandlerError>> + Send + 'static,
    {
        let boxed: BoxedHandler =
            Arc::new(move |event, remaining| Box::pin(handler(event, remaining)));
        self.handlers.insert(phase, boxed);
        self
    }

    /// Returns true if a handler is registered for `phase`.
    pub fn is_registered(&self, phase: ResourcePhase) -> bool {
        self.handlers.contains_key(&phase)
    }

    pub(crate) fn get(
        &self,
        phase: ResourcePhase,
    ) -> Option<Arc<dyn Fn(CustomResourceRequest, RemainingTime) -> HandlerFuture + Send + Sync>>
    {
        self.handlers.get(&phase).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry_has_no_handlers() {
        let registry = HandlerRegistry::new();
        assert!(!registry.is_registered(ResourcePhase::Create));
        assert!(!registry.is_registered(ResourcePhase::Poll));
        assert!(registry.get(ResourcePhase::Create).is_none());
    }

    #[test]
    fn test_registration_is_per_phase() {
        let registry = HandlerRegistry::new()
            .on_create(|_event, _remaining| async move { Ok(ResourceResponse::new()) })
            .on_poll(|_event, _remaining| async move { Ok(ResourceResponse::new()) });

        assert!(registry.is_registered(ResourcePhase::Create));
        assert!(registry.is_registered(ResourcePhase::Poll));
        assert!(!registry.is_registered(ResourcePhase::Update));
        assert!(!registry.is_registered(ResourcePhase::Delete));
    }

    #[test]
    fn test_later_registration_replaces_earlier() {
        let registry = HandlerRegistry::new()
            .on_create(|_event, _remaining| async move {
                Err(HandlerError::resource("first"))
            })
            .on_create(|_event, _remaining| async move { Ok(ResourceResponse::new()) });

        assert!(registry.is_registered(ResourcePhase::Create));
        assert!(registry.get(ResourcePhase::Create).is_some());
    }
}
