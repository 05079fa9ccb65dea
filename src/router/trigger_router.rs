use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tracing::error;

use super::handler::{
    BotContext, HandlerResult, Invocation, Noop, SharedHandler, handler_fn,
};
use super::pattern::{Captures, Pattern};
use super::responder::Responder;
use crate::telemetry::{ErrorReporter, TracingReporter};

pub const DEFAULT_USER_ERROR_MESSAGE: &str = "Something went wrong :(";

/// A registered (pattern, handler) pair.
#[derive(Clone)]
pub struct Trigger {
    pub pattern: Pattern,
    pub handler: SharedHandler,
}

/// Ordered list of triggers with a fallback; the first matching pattern wins.
pub struct TriggerRouter {
    responses: Vec<Trigger>,
    default: Trigger,
    default_user_error_message: String,
    reporter: Arc<dyn ErrorReporter>,
}

impl Default for TriggerRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl TriggerRouter {
    #[must_use]
    pub fn new() -> Self {
        Self::with_reporter(Arc::new(TracingReporter))
    }

    #[must_use]
    pub fn with_reporter(reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            responses: Vec::new(),
            default: Trigger {
                pattern: Pattern::catch_all(),
                handler: Arc::new(Noop),
            },
            default_user_error_message: DEFAULT_USER_ERROR_MESSAGE.to_string(),
            reporter,
        }
    }

    /// Append a trigger. No uniqueness check happens here.
    pub fn add_response<F, Fut>(&mut self, pattern: Pattern, handler: F)
    where
        F: Fn(Responder, Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.add_shared_response(pattern, handler_fn(handler));
    }

    pub fn add_shared_response(&mut self, pattern: Pattern, handler: SharedHandler) {
        self.responses.push(Trigger { pattern, handler });
    }

    pub fn set_default_response<F, Fut>(&mut self, handler: F)
    where
        F: Fn(Responder, Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.default = Trigger {
            pattern: Pattern::catch_all(),
            handler: handler_fn(handler),
        };
    }

    pub fn set_reporter(&mut self, reporter: Arc<dyn ErrorReporter>) {
        self.reporter = reporter;
    }

    pub fn set_default_user_error_message(&mut self, text: impl Into<String>) {
        self.default_user_error_message = text.into();
    }

    #[must_use]
    pub fn default_user_error_message(&self) -> &str {
        &self.default_user_error_message
    }

    #[must_use]
    pub fn triggers(&self) -> &[Trigger] {
        &self.responses
    }

    /// True if a trigger with the same source and flags is already registered.
    #[must_use]
    pub fn contains_pattern(&self, pattern: &Pattern) -> bool {
        self.responses.iter().any(|t| &t.pattern == pattern)
    }

    /// Select the first trigger matching `key`, or the default.
    #[must_use]
    pub fn choose(&self, key: &str) -> Chosen<'_> {
        let found = self
            .responses
            .iter()
            .find_map(|t| t.pattern.captures(key).map(|caps| (t, caps)));

        match found {
            Some((trigger, captures)) => Chosen {
                router: self,
                handler: Arc::clone(&trigger.handler),
                captures,
                is_default: false,
            },
            None => Chosen {
                router: self,
                handler: Arc::clone(&self.default.handler),
                captures: self.default.pattern.captures(key).unwrap_or_default(),
                is_default: true,
            },
        }
    }

    /// Select the default response when there is no dispatch key at all.
    #[must_use]
    pub fn choose_default(&self) -> Chosen<'_> {
        Chosen {
            router: self,
            handler: Arc::clone(&self.default.handler),
            captures: Captures::default(),
            is_default: true,
        }
    }

    fn log_error(&self, err: &crate::errors::HandlerError) {
        self.reporter.report(err);
        error!(error = %err, "Handler failed");
    }
}

/// The handler picked by [`TriggerRouter::choose`], consumed once.
pub struct Chosen<'r> {
    router: &'r TriggerRouter,
    handler: SharedHandler,
    captures: Captures,
    is_default: bool,
}

impl Chosen<'_> {
    #[must_use]
    pub fn captures(&self) -> &Captures {
        &self.captures
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    /// Run the handler, turning failures into a reply on `res`.
    ///
    /// A failure with a user message is sent as-is and not reported. Any
    /// other failure is reported and answered with the router's default
    /// user error message. Both cases return `null`.
    pub async fn exec(self, res: Responder) -> Value {
        let call = Invocation {
            captures: self.captures,
            ..Invocation::default()
        };

        match self.handler.handle(res.clone(), call).await {
            Ok(value) => value,
            Err(err) => {
                if let Some(user_message) = err.user_message() {
                    res.send(user_message);
                    return Value::Null;
                }

                self.router.log_error(&err);
                res.send(self.router.default_user_error_message.clone());
                Value::Null
            }
        }
    }

    /// Run the handler with a payload and bot context, returning its result
    /// unchanged so the caller decides how to map errors.
    pub async fn dispatch(
        self,
        res: Responder,
        payload: Value,
        context: Option<BotContext>,
    ) -> HandlerResult {
        let call = Invocation {
            captures: self.captures,
            payload,
            context,
        };
        self.handler.handle(res, call).await
    }
}
