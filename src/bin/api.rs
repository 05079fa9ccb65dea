use std::sync::Arc;
use std::time::Duration;

use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde_json::Value;
use slack_interactions::api::{InboundRequest, InteractionDispatcher, echo_challenge};
use slack_interactions::api::ack::HttpAcknowledger;
use slack_interactions::api::helpers::err_response;
use slack_interactions::core::config::DispatcherConfig;
use tracing::{error, info};

fn load_config() -> Result<DispatcherConfig, Error> {
    let config = match std::env::var("SLACK_ACTIONS_CONFIG") {
        Ok(path) => DispatcherConfig::from_file(path),
        Err(_) => DispatcherConfig::from_env(),
    };
    config.map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    slack_interactions::setup_logging();

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()?;
    let mut dispatcher = InteractionDispatcher::new(load_config()?)
        .with_acknowledger(Arc::new(HttpAcknowledger::new(http)));
    dispatcher.add_event_handshaker("^url_verification$", echo_challenge)?;

    for (path, endpoint) in dispatcher.endpoints() {
        info!(%path, %endpoint, "Serving endpoint");
    }

    let dispatcher = Arc::new(dispatcher);
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let dispatcher = Arc::clone(&dispatcher);
        async move {
            let response = match InboundRequest::from_lambda_payload(&event.payload) {
                Ok(request) => dispatcher.handle(&request).await,
                Err(e) => {
                    error!("Malformed request: {}", e);
                    err_response(400, &e.to_string())
                }
            };
            Ok::<Value, Error>(response)
        }
    }))
    .await
}
