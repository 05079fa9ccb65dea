use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::{Value, json};

/// What a handler has written so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseState {
    pub status: u16,
    pub body: String,
    pub content_type: &'static str,
    pub sent: bool,
}

impl Default for ResponseState {
    fn default() -> Self {
        Self {
            status: 200,
            body: String::new(),
            content_type: "text/plain",
            sent: false,
        }
    }
}

/// Transport response handle passed to every handler.
///
/// Cloning shares the same underlying response, so a handler can move a
/// clone into a spawned task and still write the reply.
#[derive(Debug, Clone, Default)]
pub struct Responder {
    state: Arc<Mutex<ResponseState>>,
}

impl Responder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ResponseState> {
        // A panicking handler must not take the response down with it.
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Set the status code without sending a body.
    pub fn status(&self, code: u16) -> &Self {
        self.lock().status = code;
        self
    }

    /// Send a plain-text body.
    pub fn send(&self, text: impl Into<String>) {
        let mut state = self.lock();
        state.body = text.into();
        state.content_type = "text/plain";
        state.sent = true;
    }

    /// Send a JSON body.
    pub fn json(&self, value: Value) {
        let mut state = self.lock();
        state.body = value.to_string();
        state.content_type = "application/json";
        state.sent = true;
    }

    /// Send only a status code; the body is the canonical reason phrase.
    pub fn send_status(&self, code: u16) {
        let mut state = self.lock();
        state.status = code;
        state.body = reason_phrase(code).to_string();
        state.content_type = "text/plain";
        state.sent = true;
    }

    #[must_use]
    pub fn snapshot(&self) -> ResponseState {
        self.lock().clone()
    }

    /// Render as the `{statusCode, headers, body}` value returned to the host.
    #[must_use]
    pub fn into_response(self) -> Value {
        let state = self.snapshot();
        json!({
            "statusCode": state.status,
            "headers": { "Content-Type": state.content_type },
            "body": state.body,
        })
    }
}

#[must_use]
pub fn reason_phrase(code: u16) -> &'static str {
    match code {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "",
    }
}
