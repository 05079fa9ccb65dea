use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::pattern::Captures;
use super::responder::Responder;
use crate::errors::HandlerError;

pub type HandlerResult = Result<Value, HandlerError>;

/// Application state shared with every handler (the bot instance).
pub type BotContext = Arc<dyn Any + Send + Sync>;

/// Everything a handler receives besides the response handle.
#[derive(Clone, Default)]
pub struct Invocation {
    pub captures: Captures,
    pub payload: Value,
    pub context: Option<BotContext>,
}

impl Invocation {
    /// Borrow the bot context as `T`, if one was supplied with that type.
    #[must_use]
    pub fn context<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.context.as_deref().and_then(|ctx| ctx.downcast_ref::<T>())
    }
}

impl std::fmt::Debug for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invocation")
            .field("captures", &self.captures)
            .field("payload", &self.payload)
            .field("context", &self.context.is_some())
            .finish()
    }
}

#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, res: Responder, call: Invocation) -> HandlerResult;
}

pub type SharedHandler = Arc<dyn Handler>;

/// Adapts an async closure into a [`Handler`].
pub struct FnHandler<F>(F);

#[async_trait]
impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(Responder, Invocation) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn handle(&self, res: Responder, call: Invocation) -> HandlerResult {
        (self.0)(res, call).await
    }
}

pub fn handler_fn<F, Fut>(f: F) -> SharedHandler
where
    F: Fn(Responder, Invocation) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    Arc::new(FnHandler(f))
}

/// Handler that does nothing and yields `null`.
pub(crate) struct Noop;

#[async_trait]
impl Handler for Noop {
    async fn handle(&self, _res: Responder, _call: Invocation) -> HandlerResult {
        Ok(Value::Null)
    }
}
