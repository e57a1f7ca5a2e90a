//! # Errors
//!
//! Typed failures crossing layer boundaries. Start-up failures are fatal and
//! reach the caller of `BotController::start`; everything else is recovered
//! and reported to the chat.

use crate::domain::properties::PropertyKind;
use thiserror::Error;

/// Fatal failures while bringing the bot up.
#[derive(Debug, Error)]
pub enum StartError {
    #[error("failed to load {document}: {reason}")]
    ConfigLoad { document: String, reason: String },

    #[error("failed to connect to chat: {0}")]
    Connect(String),
}

impl StartError {
    pub fn config(document: impl Into<String>, reason: impl ToString) -> Self {
        StartError::ConfigLoad {
            document: document.into(),
            reason: reason.to_string(),
        }
    }
}

/// Failures of the typed get/set protocol on a property group.
#[derive(Debug, Error, PartialEq)]
pub enum PropertyError {
    #[error("property '{key}' not found")]
    UnknownProperty { key: String },

    #[error("property '{key}' must be of type {expected}, got '{raw}'")]
    TypeMismatch {
        key: String,
        expected: PropertyKind,
        raw: String,
    },

    #[error("property '{key}' rejected: {reason}")]
    Rejected { key: String, reason: String },
}

/// The listing source could not produce results.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("listing query failed: {0}")]
pub struct QueryError(pub String);

/// A chat message could not be delivered.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("failed to send message: {0}")]
pub struct SendError(pub String);

/// Malformed arguments to a recognised command.
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("usage: {command} <key> [value]")]
    MissingKey { command: String },

    #[error("usage: {command} <key> [value]")]
    TooManyValues { command: String },

    #[error("usage: {command}")]
    UnexpectedArguments { command: String },
}

impl CommandError {
    /// Keyword of the command that failed to parse.
    pub fn command(&self) -> &str {
        match self {
            CommandError::MissingKey { command }
            | CommandError::TooManyValues { command }
            | CommandError::UnexpectedArguments { command } => command,
        }
    }
}
