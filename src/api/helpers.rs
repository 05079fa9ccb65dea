//! Response builders shared by the endpoint handlers.

use serde_json::{Value, json};

use crate::router::responder::reason_phrase;

/// Returns a response with only a status code and its reason phrase.
#[must_use]
pub fn status_only(status_code: u16) -> Value {
    json!({
        "statusCode": status_code,
        "headers": { "Content-Type": "text/plain" },
        "body": reason_phrase(status_code)
    })
}

/// Returns a 200 OK response with a plain-text body.
#[must_use]
pub fn ok_text(text: &str) -> Value {
    json!({
        "statusCode": 200,
        "headers": { "Content-Type": "text/plain" },
        "body": text
    })
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> Value {
    json!({
        "statusCode": status_code,
        "headers": { "Content-Type": "application/json" },
        "body": json!({ "error": message }).to_string()
    })
}
