//! Handler for Slack interactive components.
//!
//! This module processes interactive payloads including:
//! - `interactive_message` - Legacy attachment buttons and menus (also the
//!   fallback for unknown types)
//! - `block_actions` - Block Kit buttons and select menus
//! - `view_submission` - Modal form submissions

use serde_json::Value;
use tracing::info;

use super::ack::send_processing_notice;
use super::category::InteractiveKind;
use super::dispatcher::InteractionDispatcher;
use super::handler::Endpoint;
use super::parsing::{parse_body, parse_interactive_payload};
use super::unescape::unescape_query_params;
use crate::errors::HandlerError;
use crate::router::Responder;

impl InteractionDispatcher {
    /// Handle a form post carrying an interactive `payload`.
    pub(crate) async fn handle_interactive(&self, body: &str) -> Value {
        let mut payload = match parse_body(body).and_then(|b| parse_interactive_payload(&b)) {
            Ok(payload) => payload,
            Err(e) => return self.fail(Endpoint::Interactive, &HandlerError::from(e), None),
        };

        if unescape_query_params(&mut payload) {
            info!("Unescaped selected option value");
        }

        if let Err(e) = send_processing_notice(self.acknowledger.as_ref(), &payload).await {
            return self.fail(Endpoint::Interactive, &HandlerError::from(e), Some(&payload));
        }

        let kind = InteractiveKind::classify(&payload);
        let category = kind.category();
        let key = kind.dispatch_key(&payload);
        info!(%category, key = key.as_deref(), "Routing interactive payload");

        let res = Responder::new();
        match self
            .route(category, key.as_deref(), res.clone(), payload.clone())
            .await
        {
            Ok(_) => res.into_response(),
            Err(err) => self.fail(category, &err, Some(&payload)),
        }
    }
}
