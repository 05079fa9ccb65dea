//! Handler for Slack slash commands.
//!
//! Slash commands arrive as plain form fields (no `payload` wrapper); the
//! `command` field selects the trigger.

use serde_json::Value;
use tracing::info;

use super::category::{Category, slash_command_key};
use super::dispatcher::InteractionDispatcher;
use super::parsing::parse_body;
use crate::errors::HandlerError;
use crate::router::Responder;

impl InteractionDispatcher {
    pub(crate) async fn handle_slash_command(&self, body: &str) -> Value {
        let fields = match parse_body(body) {
            Ok(fields) => fields,
            Err(e) => return self.fail(Category::SlashCommand, &HandlerError::from(e), None),
        };

        let key = slash_command_key(&fields);
        info!(command = key.as_deref(), "Routing slash command");

        let res = Responder::new();
        match self
            .route(Category::SlashCommand, key.as_deref(), res.clone(), fields.clone())
            .await
        {
            Ok(_) => res.into_response(),
            Err(err) => self.fail(Category::SlashCommand, &err, Some(&fields)),
        }
    }
}
