//! Registration tables for every interaction category and the shared
//! routing/failure plumbing used by the endpoint handlers.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error};

use super::ack::{Acknowledger, HttpAcknowledger};
use super::category::Category;
use super::helpers::status_only;
use crate::core::config::DispatcherConfig;
use crate::errors::{DispatchError, HandlerError};
use crate::router::{
    BotContext, HandlerResult, IntoPattern, Invocation, Pattern, Responder, Trigger,
    TriggerRouter,
};
use crate::telemetry::{ErrorReporter, TracingReporter};

/// Routes Slack webhooks to handlers registered per interaction category.
///
/// Build it once at startup, register every trigger, then share it
/// (for example behind an `Arc`) with the request-serving code. Trigger
/// tables are never changed while requests are served.
pub struct InteractionDispatcher {
    pub(crate) config: DispatcherConfig,
    legacy_actions: TriggerRouter,
    block_actions: TriggerRouter,
    slash_commands: TriggerRouter,
    events: TriggerRouter,
    pub(crate) handshakes: TriggerRouter,
    external_data: TriggerRouter,
    pub(crate) acknowledger: Arc<dyn Acknowledger>,
    reporter: Arc<dyn ErrorReporter>,
    pub(crate) context: Option<BotContext>,
}

impl InteractionDispatcher {
    #[must_use]
    pub fn new(config: DispatcherConfig) -> Self {
        let reporter: Arc<dyn ErrorReporter> = Arc::new(TracingReporter);
        let router = |category: Category| {
            let mut router = TriggerRouter::with_reporter(Arc::clone(&reporter));
            router.set_default_user_error_message(config.default_user_error_message.clone());
            router.set_default_response(move |_res: Responder, _call: Invocation| async move {
                Err(HandlerError::NoMatch(category))
            });
            router
        };

        Self {
            legacy_actions: router(Category::LegacyAction),
            block_actions: router(Category::BlockAction),
            slash_commands: router(Category::SlashCommand),
            events: router(Category::Event),
            handshakes: router(Category::Event),
            external_data: router(Category::ExternalData),
            acknowledger: Arc::new(HttpAcknowledger::default()),
            reporter,
            context: None,
            config,
        }
    }

    /// Replace the client used for deferred acknowledgements.
    #[must_use]
    pub fn with_acknowledger(mut self, acknowledger: Arc<dyn Acknowledger>) -> Self {
        self.acknowledger = acknowledger;
        self
    }

    /// Replace the sink that receives unexpected errors.
    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        for router in [
            &mut self.legacy_actions,
            &mut self.block_actions,
            &mut self.slash_commands,
            &mut self.events,
            &mut self.handshakes,
            &mut self.external_data,
        ] {
            router.set_reporter(Arc::clone(&reporter));
        }
        self.reporter = reporter;
        self
    }

    /// Shared bot state handed to every handler.
    #[must_use]
    pub fn with_context(mut self, context: BotContext) -> Self {
        self.context = Some(context);
        self
    }

    #[must_use]
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// The trigger table serving `category`. View submissions share the
    /// legacy action table.
    #[must_use]
    pub fn router(&self, category: Category) -> &TriggerRouter {
        match category {
            Category::LegacyAction | Category::ViewSubmission => &self.legacy_actions,
            Category::BlockAction => &self.block_actions,
            Category::SlashCommand => &self.slash_commands,
            Category::Event => &self.events,
            Category::ExternalData => &self.external_data,
        }
    }

    fn router_mut(&mut self, category: Category) -> &mut TriggerRouter {
        match category {
            Category::LegacyAction | Category::ViewSubmission => &mut self.legacy_actions,
            Category::BlockAction => &mut self.block_actions,
            Category::SlashCommand => &mut self.slash_commands,
            Category::Event => &mut self.events,
            Category::ExternalData => &mut self.external_data,
        }
    }

    #[must_use]
    pub fn triggers(&self, category: Category) -> &[Trigger] {
        self.router(category).triggers()
    }

    /// Triggers registered with [`Self::add_event_handshaker`]. Only these
    /// may answer `url_verification`.
    #[must_use]
    pub fn handshake_triggers(&self) -> &[Trigger] {
        self.handshakes.triggers()
    }

    /// Event triggers and handshakers form one namespace for duplicates.
    fn is_registered(&self, category: Category, pattern: &Pattern) -> bool {
        self.router(category).contains_pattern(pattern)
            || (category == Category::Event && self.handshakes.contains_pattern(pattern))
    }

    fn register<P, F, Fut>(
        &mut self,
        category: Category,
        pattern: P,
        handler: F,
    ) -> Result<(), DispatchError>
    where
        P: IntoPattern,
        F: Fn(Responder, Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        let pattern = self.checked_pattern(category, pattern)?;
        debug!(%category, %pattern, "Registered trigger");
        self.router_mut(category).add_response(pattern, handler);
        Ok(())
    }

    fn checked_pattern<P: IntoPattern>(
        &self,
        category: Category,
        pattern: P,
    ) -> Result<Pattern, DispatchError> {
        let pattern = pattern.into_pattern()?;
        if self.is_registered(category, &pattern) {
            error!(%category, %pattern, "Duplicate trigger registration");
            return Err(DispatchError::Duplicate(category));
        }
        Ok(pattern)
    }

    /// Register a legacy interactive message (or view submission) callback.
    ///
    /// # Errors
    ///
    /// Fails with "Callback id duplication" if the pattern is already registered.
    pub fn add_action<P, F, Fut>(&mut self, pattern: P, handler: F) -> Result<(), DispatchError>
    where
        P: IntoPattern,
        F: Fn(Responder, Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.register(Category::LegacyAction, pattern, handler)
    }

    /// Register a Block Kit action by `action_id`.
    ///
    /// # Errors
    ///
    /// Fails with "Block id duplication" if the pattern is already registered.
    pub fn add_block<P, F, Fut>(&mut self, pattern: P, handler: F) -> Result<(), DispatchError>
    where
        P: IntoPattern,
        F: Fn(Responder, Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.register(Category::BlockAction, pattern, handler)
    }

    /// # Errors
    ///
    /// Fails with "Slash command duplication" if the pattern is already registered.
    pub fn add_slash_command<P, F, Fut>(
        &mut self,
        pattern: P,
        handler: F,
    ) -> Result<(), DispatchError>
    where
        P: IntoPattern,
        F: Fn(Responder, Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.register(Category::SlashCommand, pattern, handler)
    }

    /// Register an Events API handler keyed by `<type>:<channel|reaction>`.
    ///
    /// # Errors
    ///
    /// Fails with "Event duplication" if the pattern is already registered.
    pub fn add_event<P, F, Fut>(&mut self, pattern: P, handler: F) -> Result<(), DispatchError>
    where
        P: IntoPattern,
        F: Fn(Responder, Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.register(Category::Event, pattern, handler)
    }

    /// Register the handler answering `url_verification` handshakes.
    ///
    /// Handshakes are matched against these triggers only, so a broad
    /// [`Self::add_event`] pattern never swallows the challenge.
    ///
    /// # Errors
    ///
    /// Fails with "Event duplication" if the pattern is already registered.
    pub fn add_event_handshaker<P, F, Fut>(
        &mut self,
        pattern: P,
        handler: F,
    ) -> Result<(), DispatchError>
    where
        P: IntoPattern,
        F: Fn(Responder, Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        let pattern = self.checked_pattern(Category::Event, pattern)?;
        debug!(%pattern, "Registered handshake trigger");
        self.handshakes.add_response(pattern, handler);
        Ok(())
    }

    /// # Errors
    ///
    /// Fails with "Event duplication" if the pattern is already registered.
    pub fn add_reaction_event<P, F, Fut>(
        &mut self,
        pattern: P,
        handler: F,
    ) -> Result<(), DispatchError>
    where
        P: IntoPattern,
        F: Fn(Responder, Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.add_event(pattern, handler)
    }

    /// Register an external select data source keyed by
    /// `<view.external_id>:<action_id>`.
    ///
    /// # Errors
    ///
    /// Fails with "External data id duplication" if the pattern is already registered.
    pub fn add_external_data<P, F, Fut>(
        &mut self,
        pattern: P,
        handler: F,
    ) -> Result<(), DispatchError>
    where
        P: IntoPattern,
        F: Fn(Responder, Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.register(Category::ExternalData, pattern, handler)
    }

    /// Choose a handler for `key` in `category` and run it with the payload.
    pub(crate) async fn route(
        &self,
        category: Category,
        key: Option<&str>,
        res: Responder,
        payload: Value,
    ) -> HandlerResult {
        let router = self.router(category);
        let chosen = match key {
            Some(key) => router.choose(key),
            None => router.choose_default(),
        };

        debug!(%category, key, fallback = chosen.is_default(), "Dispatching interaction");
        chosen.dispatch(res, payload, self.context.clone()).await
    }

    /// Report an unexpected failure and answer 500.
    pub(crate) fn fail(
        &self,
        scope: impl Display,
        err: &HandlerError,
        payload: Option<&Value>,
    ) -> Value {
        self.reporter.report(err);
        error!(%scope, error = %err, "Interaction handling failed");

        if let Some(data) = err.data() {
            self.reporter
                .report_data(data, payload.unwrap_or(&Value::Null));
        }

        status_only(500)
    }
}
