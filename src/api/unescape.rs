//! HTML entity decoding for query values Slack escapes inside payloads.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:(amp|lt|gt|quot|apos)|#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6}));")
        .expect("static regex compile")
});

/// Decode HTML entities in a single pass.
///
/// Named `&amp; &lt; &gt; &quot; &apos;` and any numeric reference are
/// decoded; anything else is left as written. Text without entities is
/// returned borrowed.
#[must_use]
pub fn unescape_html(input: &str) -> Cow<'_, str> {
    ENTITY_RE.replace_all(input, |caps: &Captures<'_>| {
        if let Some(name) = caps.get(1) {
            return match name.as_str() {
                "amp" => "&",
                "lt" => "<",
                "gt" => ">",
                "quot" => "\"",
                _ => "'",
            }
            .to_string();
        }

        let code = caps
            .get(2)
            .and_then(|dec| dec.as_str().parse::<u32>().ok())
            .or_else(|| caps.get(3).and_then(|hex| u32::from_str_radix(hex.as_str(), 16).ok()));

        match code.and_then(char::from_u32) {
            Some(ch) => ch.to_string(),
            None => caps[0].to_string(),
        }
    })
}

/// Decode `actions[0].selected_options[0].value` in place when it is a string.
///
/// Returns true when the payload was changed. Nothing else in the payload is
/// touched.
pub fn unescape_query_params(payload: &mut Value) -> bool {
    let Some(Value::String(raw)) = payload
        .pointer_mut("/actions/0/selected_options/0/value")
    else {
        return false;
    };

    let decoded = match unescape_html(raw) {
        Cow::Borrowed(_) => return false,
        Cow::Owned(decoded) => decoded,
    };
    *raw = decoded;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_named_and_numeric_entities() {
        assert_eq!(unescape_html("&lt;foo&gt; &amp; bar"), "<foo> & bar");
        assert_eq!(unescape_html("it&#39;s &#x27;quoted&#x27;"), "it's 'quoted'");
        assert_eq!(unescape_html("&quot;x&quot; &#96;y&#x60;"), "\"x\" `y`");
    }

    #[test]
    fn decodes_a_single_level() {
        assert_eq!(unescape_html("&amp;lt;"), "&lt;");
    }

    #[test]
    fn leaves_unknown_entities_and_plain_text() {
        assert_eq!(unescape_html("&copy; 2024"), "&copy; 2024");
        assert!(matches!(unescape_html("no entities"), Cow::Borrowed(_)));
        assert_eq!(unescape_html("&#1114112;"), "&#1114112;");
    }

    #[test]
    fn rewrites_only_the_query_path() {
        let mut payload = json!({
            "callback_id": "&lt;keep&gt;",
            "actions": [{"selected_options": [{"value": "{\"title\":\"'&lt;foo&gt; &amp; bar\"\"}"}]}]
        });

        assert!(unescape_query_params(&mut payload));
        assert_eq!(
            payload["actions"][0]["selected_options"][0]["value"],
            "{\"title\":\"'<foo> & bar\"\"}"
        );
        assert_eq!(payload["callback_id"], "&lt;keep&gt;");

        let before = payload.clone();
        assert!(!unescape_query_params(&mut payload));
        assert_eq!(payload, before);
    }

    #[test]
    fn ignores_missing_or_non_string_values() {
        let mut missing = json!({"callback_id": "cb"});
        assert!(!unescape_query_params(&mut missing));
        assert_eq!(missing, json!({"callback_id": "cb"}));

        let mut numeric = json!({"actions": [{"selected_options": [{"value": 3}]}]});
        assert!(!unescape_query_params(&mut numeric));
    }
}
