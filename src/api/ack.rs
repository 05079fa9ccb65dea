//! Deferred acknowledgement: tell the requester their action is being
//! processed before a slow handler runs.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::{Value, json};
use tracing::info;
use url::Url;

use crate::errors::DispatchError;

pub const PROCESSING_TEXT: &str = "Your request is beeing proccesed";

/// Posts a JSON message to a Slack `response_url`.
#[async_trait]
pub trait Acknowledger: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the request cannot be delivered.
    async fn post(&self, url: &Url, body: &Value) -> Result<(), DispatchError>;
}

/// [`Acknowledger`] backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct HttpAcknowledger {
    http: HttpClient,
}

impl HttpAcknowledger {
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Acknowledger for HttpAcknowledger {
    async fn post(&self, url: &Url, body: &Value) -> Result<(), DispatchError> {
        let resp = self
            .http
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| DispatchError::HttpError(format!("response_url request: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DispatchError::HttpError(format!(
                "response_url returned {status}"
            )));
        }
        Ok(())
    }
}

/// A message destined for a `response_url`, visible only to the requester
/// unless `is_ephemeral` is false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseUrlRequest {
    pub url: Url,
    pub is_ephemeral: bool,
}

impl ResponseUrlRequest {
    /// # Errors
    ///
    /// Returns an error if `url` is not an absolute URL.
    pub fn new(url: &str, is_ephemeral: bool) -> Result<Self, DispatchError> {
        let url = Url::parse(url)
            .map_err(|e| DispatchError::ParseError(format!("Invalid response url {url}: {e}")))?;
        Ok(Self { url, is_ephemeral })
    }

    /// Add `response_type: in_channel` for non-ephemeral messages.
    #[must_use]
    pub fn prepare(&self, mut body: Value) -> Value {
        if !self.is_ephemeral {
            if let Value::Object(fields) = &mut body {
                fields.insert(
                    "response_type".to_string(),
                    Value::String("in_channel".to_string()),
                );
            }
        }
        body
    }

    /// # Errors
    ///
    /// Returns an error if the acknowledger fails to deliver the message.
    pub async fn request(
        &self,
        acknowledger: &dyn Acknowledger,
        body: Value,
    ) -> Result<(), DispatchError> {
        let body = self.prepare(body);
        acknowledger.post(&self.url, &body).await
    }
}

/// Read `state.response.{url,isEphemeral}` from an interactive payload.
///
/// `state` may be an object or a JSON string; an empty string means no state.
///
/// # Errors
///
/// Returns an error if `state` is a non-empty string that is not valid JSON,
/// or if the response url cannot be parsed.
pub fn deferred_ack_target(payload: &Value) -> Result<Option<ResponseUrlRequest>, DispatchError> {
    let parsed;
    let state = match payload.get("state") {
        Some(Value::String(raw)) if raw.is_empty() => return Ok(None),
        Some(Value::String(raw)) => {
            parsed = serde_json::from_str::<Value>(raw)
                .map_err(|e| DispatchError::ParseError(format!("Invalid state JSON: {e}")))?;
            &parsed
        }
        Some(state) => state,
        None => return Ok(None),
    };

    let Some(response) = state.get("response").filter(|r| !r.is_null()) else {
        return Ok(None);
    };

    let url = response
        .get("url")
        .and_then(Value::as_str)
        .ok_or_else(|| DispatchError::ParseError("state.response.url missing".to_string()))?;
    let is_ephemeral = response
        .get("isEphemeral")
        .and_then(Value::as_bool)
        .unwrap_or(true);

    ResponseUrlRequest::new(url, is_ephemeral).map(Some)
}

/// Send the "being processed" notice if the payload asks for one.
///
/// Returns true when a notice was sent.
///
/// # Errors
///
/// Propagates parse and delivery failures; nothing is retried.
pub async fn send_processing_notice(
    acknowledger: &dyn Acknowledger,
    payload: &Value,
) -> Result<bool, DispatchError> {
    let Some(target) = deferred_ack_target(payload)? else {
        return Ok(false);
    };

    info!(url = %target.url, in_channel = !target.is_ephemeral, "Sending deferred acknowledgement");
    target
        .request(acknowledger, json!({ "text": PROCESSING_TEXT }))
        .await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_channel_only_when_not_ephemeral() {
        let shared = ResponseUrlRequest::new("http://x", false).unwrap();
        assert_eq!(
            shared.prepare(json!({"text": PROCESSING_TEXT})),
            json!({"text": PROCESSING_TEXT, "response_type": "in_channel"})
        );

        let private = ResponseUrlRequest::new("http://x", true).unwrap();
        assert_eq!(
            private.prepare(json!({"text": PROCESSING_TEXT})),
            json!({"text": PROCESSING_TEXT})
        );
    }

    #[test]
    fn reads_state_from_string_or_object() {
        let as_string = json!({"state": "{\"response\":{\"url\":\"http://x\",\"isEphemeral\":false}}"});
        let target = deferred_ack_target(&as_string).unwrap().unwrap();
        assert_eq!(target.url.as_str(), "http://x/");
        assert!(!target.is_ephemeral);

        let as_object = json!({"state": {"response": {"url": "http://x"}}});
        let target = deferred_ack_target(&as_object).unwrap().unwrap();
        assert!(target.is_ephemeral);
    }

    #[test]
    fn no_target_without_response() {
        assert!(deferred_ack_target(&json!({})).unwrap().is_none());
        assert!(deferred_ack_target(&json!({"state": ""})).unwrap().is_none());
        assert!(
            deferred_ack_target(&json!({"state": {"values": {}}}))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn malformed_state_is_an_error() {
        assert!(deferred_ack_target(&json!({"state": "{not json"})).is_err());
    }
}
