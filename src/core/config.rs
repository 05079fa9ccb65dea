use std::env;
use std::path::Path;

use serde::Deserialize;

use crate::errors::DispatchError;
use crate::router::DEFAULT_USER_ERROR_MESSAGE;

/// Paths the dispatcher serves, plus the text shown when a handler fails.
///
/// Keys deserialize in camelCase so an existing `slackActions.config.json`
/// can be loaded unchanged; missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DispatcherConfig {
    pub actions_endpoint: String,
    pub slash_endpoint: String,
    pub events_endpoint: String,
    pub external_select_endpoint: String,
    pub default_user_error_message: String,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            actions_endpoint: "/slack/actions".to_string(),
            slash_endpoint: "/slack/commands".to_string(),
            events_endpoint: "/slack/events".to_string(),
            external_select_endpoint: "/slack/options".to_string(),
            default_user_error_message: DEFAULT_USER_ERROR_MESSAGE.to_string(),
        }
    }
}

impl DispatcherConfig {
    /// Defaults overridden by `SLACK_ACTIONS_ENDPOINT`, `SLACK_SLASH_ENDPOINT`,
    /// `SLACK_EVENTS_ENDPOINT`, `SLACK_EXTERNAL_SELECT_ENDPOINT` and
    /// `SLACK_DEFAULT_USER_ERROR_MESSAGE`.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting endpoints are invalid.
    pub fn from_env() -> Result<Self, DispatchError> {
        let defaults = Self::default();
        let config = Self {
            actions_endpoint: env::var("SLACK_ACTIONS_ENDPOINT")
                .unwrap_or(defaults.actions_endpoint),
            slash_endpoint: env::var("SLACK_SLASH_ENDPOINT").unwrap_or(defaults.slash_endpoint),
            events_endpoint: env::var("SLACK_EVENTS_ENDPOINT").unwrap_or(defaults.events_endpoint),
            external_select_endpoint: env::var("SLACK_EXTERNAL_SELECT_ENDPOINT")
                .unwrap_or(defaults.external_select_endpoint),
            default_user_error_message: env::var("SLACK_DEFAULT_USER_ERROR_MESSAGE")
                .unwrap_or(defaults.default_user_error_message),
        };
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the endpoints are invalid.
    pub fn from_json_str(raw: &str) -> Result<Self, DispatchError> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| DispatchError::ConfigError(format!("config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its content is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DispatchError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| DispatchError::ConfigError(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&raw)
    }

    /// Every endpoint must be an absolute path and no two may coincide.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::ConfigError` describing the first problem found.
    pub fn validate(&self) -> Result<(), DispatchError> {
        let endpoints = self.endpoints();
        for (i, (name, path)) in endpoints.iter().enumerate() {
            if !path.starts_with('/') {
                return Err(DispatchError::ConfigError(format!(
                    "{name} must start with '/': {path}"
                )));
            }
            if let Some((other, _)) = endpoints[..i].iter().find(|(_, p)| p == path) {
                return Err(DispatchError::ConfigError(format!(
                    "{name} and {other} share the path {path}"
                )));
            }
        }
        Ok(())
    }

    fn endpoints(&self) -> [(&'static str, &str); 4] {
        [
            ("actionsEndpoint", self.actions_endpoint.as_str()),
            ("slashEndpoint", self.slash_endpoint.as_str()),
            ("eventsEndpoint", self.events_endpoint.as_str()),
            ("externalSelectEndpoint", self.external_select_endpoint.as_str()),
        ]
    }
}
