//! Dispatcher entrypoint - thin router that delegates to endpoint handlers.
//!
//! This module handles:
//! - Request shape (method, path, body) extraction from the Lambda event
//! - Endpoint resolution against the configured paths
//! - Interactive components (delegated to `interactive_handler`)
//! - Slash commands (delegated to `slash_handler`)
//! - Event callbacks (delegated to `event_handler`)
//! - External select data (delegated to `external_data_handler`)

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use super::dispatcher::InteractionDispatcher;
use super::helpers;
use crate::core::config::DispatcherConfig;
use crate::errors::DispatchError;

/// The parts of an HTTP request the dispatcher looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

impl InboundRequest {
    pub fn post(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: "POST".to_string(),
            path: path.into(),
            body: body.into(),
        }
    }

    /// Read an API Gateway / Lambda function URL event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event has no path, or a base64 body fails to decode.
    pub fn from_lambda_payload(payload: &Value) -> Result<Self, DispatchError> {
        let path = payload
            .get("rawPath")
            .and_then(Value::as_str)
            .or_else(|| payload.get("path").and_then(Value::as_str))
            .ok_or_else(|| DispatchError::ParseError("Request missing path".to_string()))?;

        let method = payload
            .pointer("/requestContext/http/method")
            .and_then(Value::as_str)
            .or_else(|| payload.get("httpMethod").and_then(Value::as_str))
            .unwrap_or("POST");

        let raw_body = payload.get("body").and_then(Value::as_str).unwrap_or("");
        let is_base64 = payload
            .get("isBase64Encoded")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let body = if is_base64 {
            let bytes = STANDARD
                .decode(raw_body)
                .map_err(|e| DispatchError::ParseError(format!("Invalid base64 body: {e}")))?;
            String::from_utf8(bytes)
                .map_err(|e| DispatchError::ParseError(format!("Body is not UTF-8: {e}")))?
        } else {
            raw_body.to_string()
        };

        Ok(Self {
            method: method.to_ascii_uppercase(),
            path: path.to_string(),
            body,
        })
    }
}

/// The four webhook endpoints served by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Interactive,
    Slash,
    Events,
    ExternalData,
}

impl Endpoint {
    /// Match `path` against the configured endpoints. A path that ends with
    /// an endpoint also matches, so API Gateway stage prefixes are tolerated.
    #[must_use]
    pub fn resolve(config: &DispatcherConfig, path: &str) -> Option<Self> {
        let routes = [
            (config.actions_endpoint.as_str(), Endpoint::Interactive),
            (config.slash_endpoint.as_str(), Endpoint::Slash),
            (config.events_endpoint.as_str(), Endpoint::Events),
            (config.external_select_endpoint.as_str(), Endpoint::ExternalData),
        ];

        routes
            .iter()
            .find(|(route, _)| path == *route)
            .or_else(|| routes.iter().find(|(route, _)| path.ends_with(*route)))
            .map(|(_, endpoint)| *endpoint)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Endpoint::Interactive => "interactive",
            Endpoint::Slash => "slash",
            Endpoint::Events => "events",
            Endpoint::ExternalData => "external_data",
        };
        f.write_str(name)
    }
}

impl InteractionDispatcher {
    /// The configured paths, one per endpoint.
    #[must_use]
    pub fn endpoints(&self) -> [(&str, Endpoint); 4] {
        [
            (self.config.actions_endpoint.as_str(), Endpoint::Interactive),
            (self.config.slash_endpoint.as_str(), Endpoint::Slash),
            (self.config.events_endpoint.as_str(), Endpoint::Events),
            (self.config.external_select_endpoint.as_str(), Endpoint::ExternalData),
        ]
    }

    /// Handle one webhook request and produce the `{statusCode, body}` reply.
    #[tracing::instrument(
        level = "info",
        skip(self, request),
        fields(path = %request.path, correlation_id = %Uuid::new_v4())
    )]
    pub async fn handle(&self, request: &InboundRequest) -> Value {
        let Some(endpoint) = Endpoint::resolve(&self.config, &request.path) else {
            warn!("No endpoint for path");
            return helpers::err_response(404, "Not found");
        };

        if request.method != "POST" {
            warn!(method = %request.method, %endpoint, "Rejected non-POST request");
            return helpers::err_response(405, "Method not allowed");
        }

        info!(%endpoint, "Slack webhook received");

        match endpoint {
            Endpoint::Interactive => self.handle_interactive(&request.body).await,
            Endpoint::Slash => self.handle_slash_command(&request.body).await,
            Endpoint::Events => self.handle_event_callback(&request.body).await,
            Endpoint::ExternalData => self.handle_external_data(&request.body).await,
        }
    }
}
