/// Slack interaction dispatch for chat-bot integrations.
///
/// This crate routes inbound Slack webhooks to handlers registered by
/// plugin code:
/// 1. A generic [`router::TriggerRouter`] that picks the first handler whose
///    pattern matches a dispatch key
/// 2. An [`api::InteractionDispatcher`] that classifies webhook payloads
///    (interactive messages, block actions, view submissions, slash commands,
///    events, external data requests) and forwards them to the right router
///
/// # Architecture
///
/// The system uses:
/// - `regex` for trigger patterns
/// - `serde_json` for payload inspection
/// - `reqwest` for deferred acknowledgements to Slack `response_url`s
/// - `lambda_runtime` for the optional hosted API binary
/// - Tokio for async runtime
///
/// # Example
///
/// ```no_run
/// use serde_json::json;
/// use slack_interactions::api::{InboundRequest, InteractionDispatcher};
/// use slack_interactions::core::config::DispatcherConfig;
/// use slack_interactions::router::{Invocation, Responder};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     slack_interactions::setup_logging();
///
///     let mut dispatcher = InteractionDispatcher::new(DispatcherConfig::default());
///     dispatcher.add_block("^approve_request$", |res: Responder, call: Invocation| async move {
///         let user = call.payload["user"]["id"].as_str().unwrap_or("someone").to_string();
///         res.json(json!({ "text": format!("Approved by {user}") }));
///         Ok(json!(null))
///     })?;
///
///     let body = r#"{"payload":"{\"type\":\"block_actions\",\"actions\":[{\"action_id\":\"approve_request\"}]}"}"#;
///     let response = dispatcher
///         .handle(&InboundRequest::post("/slack/actions", body))
///         .await;
///     println!("{response}");
///
///     Ok(())
/// }
/// ```
// Module declarations
pub mod api;
pub mod core;
pub mod errors;
pub mod router;
pub mod telemetry;

pub use errors::{DispatchError, HandlerError};

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration, filtered by `RUST_LOG` (default `info`).
/// Calling it more than once is harmless.
///
/// # Example
///
/// ```
/// slack_interactions::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
