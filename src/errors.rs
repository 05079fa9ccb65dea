use serde_json::Value;
use thiserror::Error;

use crate::api::category::Category;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Failed to parse Slack payload: {0}")]
    ParseError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Invalid dispatcher configuration: {0}")]
    ConfigError(String),

    #[error("Invalid trigger pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("{}", .0.duplication_message())]
    Duplicate(Category),

    #[error("{}", .0.no_match_message())]
    NoMatch(Category),
}

impl From<reqwest::Error> for DispatchError {
    fn from(error: reqwest::Error) -> Self {
        DispatchError::HttpError(error.to_string())
    }
}

impl From<serde_json::Error> for DispatchError {
    fn from(error: serde_json::Error) -> Self {
        DispatchError::ParseError(error.to_string())
    }
}

impl From<anyhow::Error> for DispatchError {
    fn from(error: anyhow::Error) -> Self {
        DispatchError::ParseError(error.to_string())
    }
}

/// Failure returned by a registered handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Expected failure whose `user_message` is shown to the requester as-is.
    #[error("{message}")]
    User {
        message: String,
        user_message: String,
    },

    /// Unexpected failure, optionally carrying structured diagnostic data.
    #[error("{message}")]
    Internal {
        message: String,
        data: Option<Value>,
    },

    #[error("{}", .0.no_match_message())]
    NoMatch(Category),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HandlerError {
    pub fn user(message: impl Into<String>, user_message: impl Into<String>) -> Self {
        HandlerError::User {
            message: message.into(),
            user_message: user_message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        HandlerError::Internal {
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(message: impl Into<String>, data: Value) -> Self {
        HandlerError::Internal {
            message: message.into(),
            data: Some(data),
        }
    }

    #[must_use]
    pub fn user_message(&self) -> Option<&str> {
        match self {
            HandlerError::User { user_message, .. } => Some(user_message),
            _ => None,
        }
    }

    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        match self {
            HandlerError::Internal { data, .. } => data.as_ref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_no_match(&self) -> bool {
        matches!(
            self,
            HandlerError::NoMatch(_) | HandlerError::Dispatch(DispatchError::NoMatch(_))
        )
    }
}
