use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};

use crate::errors::DispatchError;

/// Decode one `application/x-www-form-urlencoded` component.
///
/// # Errors
///
/// Returns an error if the decoded bytes are not valid UTF-8.
pub fn decode_url_component(input: &str) -> Result<String, DispatchError> {
    let spaced = input.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|s| s.to_string())
        .map_err(|e| DispatchError::ParseError(format!("Failed to decode URL component: {e}")))
}

/// Parse a form-encoded body into a flat JSON object of string fields.
///
/// # Errors
///
/// Returns an error if a key or value cannot be decoded.
pub fn parse_form_data(form_body: &str) -> Result<Value, DispatchError> {
    let mut fields = Map::new();
    for pair in form_body.split('&').filter(|p| !p.is_empty()) {
        let (raw_key, raw_val) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_url_component(raw_key)?;
        let value = decode_url_component(raw_val)?;
        fields.insert(key, Value::String(value));
    }
    Ok(Value::Object(fields))
}

/// Parse a request body that is either JSON or form-encoded.
///
/// # Errors
///
/// Returns an error if a JSON-looking body is malformed or form decoding fails.
pub fn parse_body(body: &str) -> Result<Value, DispatchError> {
    let trimmed = body.trim_start();
    if trimmed.starts_with('{') {
        return serde_json::from_str(trimmed)
            .map_err(|e| DispatchError::ParseError(format!("Invalid JSON body: {e}")));
    }
    parse_form_data(body)
}

/// Extract and parse the JSON string carried in the `payload` field.
///
/// # Errors
///
/// Returns an error if the field is missing, not a string, or not valid JSON.
pub fn parse_interactive_payload(body: &Value) -> Result<Value, DispatchError> {
    match body.get("payload") {
        Some(Value::String(raw)) => serde_json::from_str(raw)
            .map_err(|e| DispatchError::ParseError(format!("Invalid JSON payload: {e}"))),
        Some(Value::Object(_)) => Ok(body["payload"].clone()),
        Some(_) => Err(DispatchError::ParseError(
            "payload field is not a string".to_string(),
        )),
        None => Err(DispatchError::ParseError("Missing payload field".to_string())),
    }
}

pub fn v_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = cur.get(*key)?;
    }
    Some(cur)
}

pub fn v_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    v_path(root, path).and_then(|v| v.as_str())
}

pub fn v_array<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Vec<Value>> {
    v_path(root, path).and_then(|v| v.as_array())
}

/// First element of the array at `path`.
pub fn v_first<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    v_array(root, path).and_then(|items| items.first())
}
