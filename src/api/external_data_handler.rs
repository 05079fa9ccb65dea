//! Handler for external select menus loading their options.

use serde_json::Value;
use tracing::info;

use super::category::{Category, external_data_key};
use super::dispatcher::InteractionDispatcher;
use super::parsing::{parse_body, parse_interactive_payload};
use crate::errors::HandlerError;
use crate::router::Responder;

impl InteractionDispatcher {
    pub(crate) async fn handle_external_data(&self, body: &str) -> Value {
        let payload = match parse_body(body).and_then(|b| parse_interactive_payload(&b)) {
            Ok(payload) => payload,
            Err(e) => return self.fail(Category::ExternalData, &HandlerError::from(e), None),
        };

        let key = external_data_key(&payload);
        info!(key = key.as_deref(), "Routing external data request");

        let res = Responder::new();
        match self
            .route(Category::ExternalData, key.as_deref(), res.clone(), payload.clone())
            .await
        {
            Ok(_) => res.into_response(),
            Err(err) => self.fail(Category::ExternalData, &err, Some(&payload)),
        }
    }
}
