//! Handler for Slack Events API callbacks.
//!
//! This module processes:
//! - `url_verification` - the one-time handshake echoing `challenge`
//! - `event_callback` - events keyed by `<type>:<channel>` or
//!   `<type>:<reaction>`
//!
//! Events nobody registered for are answered with 200; Slack retries
//! anything else.

use serde_json::Value;
use tracing::{debug, info};

use super::category::{Category, event_key};
use super::dispatcher::InteractionDispatcher;
use super::helpers::{ok_text, status_only};
use super::parsing::{parse_body, v_str};
use crate::errors::HandlerError;
use crate::router::{HandlerResult, Invocation, Responder};

/// Dispatch key used for `url_verification` handshakes.
pub const HANDSHAKE_KEY: &str = "url_verification";

/// Ready-made handshake handler: answers 200 with the request's `challenge`.
///
/// ```no_run
/// # use slack_interactions::api::{InteractionDispatcher, echo_challenge};
/// # use slack_interactions::core::config::DispatcherConfig;
/// let mut dispatcher = InteractionDispatcher::new(DispatcherConfig::default());
/// dispatcher.add_event_handshaker("^url_verification$", echo_challenge)?;
/// # Ok::<(), slack_interactions::DispatchError>(())
/// ```
pub async fn echo_challenge(res: Responder, call: Invocation) -> HandlerResult {
    let challenge = v_str(&call.payload, &["challenge"]).unwrap_or_default();
    res.status(200).send(challenge);
    Ok(Value::Null)
}

impl InteractionDispatcher {
    pub(crate) async fn handle_event_callback(&self, body: &str) -> Value {
        let json_body = match parse_body(body) {
            Ok(json_body) => json_body,
            Err(e) => return self.fail(Category::Event, &HandlerError::from(e), None),
        };

        if v_str(&json_body, &["type"]) == Some(HANDSHAKE_KEY) {
            return self.answer_handshake(json_body).await;
        }

        let key = event_key(&json_body);
        info!(key = key.as_deref(), "Routing event");

        let res = Responder::new();
        match self
            .route(Category::Event, key.as_deref(), res.clone(), json_body.clone())
            .await
        {
            Ok(_) => res.into_response(),
            Err(err) if err.is_no_match() => {
                debug!(key = key.as_deref(), "No handler for event");
                status_only(200)
            }
            Err(err) => self.fail(Category::Event, &err, Some(&json_body)),
        }
    }

    async fn answer_handshake(&self, json_body: Value) -> Value {
        let chosen = self.handshakes.choose(HANDSHAKE_KEY);
        if chosen.is_default() {
            info!("Answering url_verification handshake");
            let challenge = v_str(&json_body, &["challenge"]).unwrap_or_default();
            return ok_text(challenge);
        }

        let res = Responder::new();
        match chosen
            .dispatch(res.clone(), json_body.clone(), self.context.clone())
            .await
        {
            Ok(_) => res.into_response(),
            Err(err) => self.fail(Category::Event, &err, Some(&json_body)),
        }
    }
}
