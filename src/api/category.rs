//! Interaction categories and how each one derives its dispatch key.

use std::fmt;

use serde_json::Value;

use super::parsing::{v_first, v_str};

/// Fixed set of interaction kinds the dispatcher routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    LegacyAction,
    BlockAction,
    SlashCommand,
    Event,
    ViewSubmission,
    ExternalData,
}

impl Category {
    /// Raised at registration time when a pattern is already present.
    #[must_use]
    pub fn duplication_message(self) -> &'static str {
        match self {
            Category::LegacyAction | Category::ViewSubmission => "Callback id duplication",
            Category::BlockAction => "Block id duplication",
            Category::SlashCommand => "Slash command duplication",
            Category::Event => "Event duplication",
            Category::ExternalData => "External data id duplication",
        }
    }

    /// Raised by the category's default handler when nothing matched.
    #[must_use]
    pub fn no_match_message(self) -> &'static str {
        match self {
            Category::LegacyAction | Category::ViewSubmission => "No callback found",
            Category::BlockAction => "No block action found",
            Category::SlashCommand => "No slash command found",
            Category::Event => "Default event triggered",
            Category::ExternalData => "No external data action found",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::LegacyAction => "legacy_action",
            Category::BlockAction => "block_action",
            Category::SlashCommand => "slash_command",
            Category::Event => "event",
            Category::ViewSubmission => "view_submission",
            Category::ExternalData => "external_data",
        };
        f.write_str(name)
    }
}

/// Payload kinds that share the interactive endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractiveKind {
    InteractiveMessage,
    BlockActions,
    ViewSubmission,
}

impl InteractiveKind {
    /// Classify by the payload's `type`; missing or unknown types are treated
    /// as legacy interactive messages.
    #[must_use]
    pub fn classify(payload: &Value) -> Self {
        match v_str(payload, &["type"]) {
            Some("block_actions") => InteractiveKind::BlockActions,
            Some("view_submission") => InteractiveKind::ViewSubmission,
            _ => InteractiveKind::InteractiveMessage,
        }
    }

    #[must_use]
    pub fn category(self) -> Category {
        match self {
            InteractiveKind::InteractiveMessage => Category::LegacyAction,
            InteractiveKind::BlockActions => Category::BlockAction,
            InteractiveKind::ViewSubmission => Category::ViewSubmission,
        }
    }

    /// `callback_id`, `actions[0].action_id` or `view.callback_id`.
    #[must_use]
    pub fn dispatch_key(self, payload: &Value) -> Option<String> {
        let key = match self {
            InteractiveKind::InteractiveMessage => v_str(payload, &["callback_id"]),
            InteractiveKind::BlockActions => v_first(payload, &["actions"])
                .and_then(|action| action.get("action_id"))
                .and_then(Value::as_str),
            InteractiveKind::ViewSubmission => v_str(payload, &["view", "callback_id"]),
        };
        key.map(ToString::to_string)
    }
}

/// Slash command key: the `command` form field.
#[must_use]
pub fn slash_command_key(body: &Value) -> Option<String> {
    v_str(body, &["command"]).map(ToString::to_string)
}

/// Event key: `<type>:<channel>` when a channel is present, otherwise
/// `<type>:<reaction>`, otherwise the bare event type.
///
/// The channel may be an object with a `name` or a plain channel id.
#[must_use]
pub fn event_key(body: &Value) -> Option<String> {
    let event = body.get("event")?;
    let event_type = v_str(event, &["type"]).unwrap_or_default();

    let channel = match event.get("channel") {
        Some(Value::Object(channel)) => channel.get("name").and_then(Value::as_str),
        Some(Value::String(id)) => Some(id.as_str()),
        _ => None,
    };

    if let Some(channel) = channel {
        return Some(format!("{event_type}:{channel}"));
    }

    if let Some(reaction) = v_str(event, &["reaction"]) {
        return Some(format!("{event_type}:{reaction}"));
    }

    Some(event_type.to_string())
}

/// External data key: `<view.external_id>:<action_id>` for view containers.
/// Other container types have no key and fall through to the default.
#[must_use]
pub fn external_data_key(payload: &Value) -> Option<String> {
    if v_str(payload, &["container", "type"]) != Some("view") {
        return None;
    }

    let external_id = v_str(payload, &["view", "external_id"]).unwrap_or_default();
    let action_id = v_str(payload, &["action_id"]).unwrap_or_default();
    Some(format!("{external_id}:{action_id}"))
}
