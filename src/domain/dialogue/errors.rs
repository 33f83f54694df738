//! Dialogue error taxonomy.
//!
//! Every variant is a reportable outcome of one user interaction, never a
//! process failure. [`DialogueError::user_message`] renders the text shown
//! to the user.

use thiserror::Error;

use super::grammar::ParseError;
use crate::ports::{NetworkError, StoreError};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DialogueError {
    /// Free text arrived while no dialogue was in progress.
    #[error("no active dialogue")]
    NoActiveDialogue,

    /// A menu action was requested without a session.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Input did not match the expected layout; the dialogue is unchanged.
    #[error("malformed input, expected: {expected}")]
    MalformedInput { expected: String },

    /// The remote API could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The remote API answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// A success response whose body could not be interpreted.
    #[error("unreadable response: {0}")]
    UnreadableResponse(String),

    /// Session or dialogue storage failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl DialogueError {
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        DialogueError::Http {
            status,
            body: body.into(),
        }
    }

    /// Text shown to the user for this outcome.
    pub fn user_message(&self) -> String {
        match self {
            DialogueError::NoActiveDialogue => "Choose an action first with /start.".to_string(),
            DialogueError::NotAuthenticated => "You are not signed in. Use /start.".to_string(),
            DialogueError::MalformedInput { expected } => format!("Format: {}", expected),
            DialogueError::Network(message) => format!("Connection error: {}", message),
            DialogueError::Http { status, body } => format!("Error {}: {}", status, body),
            DialogueError::UnreadableResponse(_) => {
                "Could not read the server response.".to_string()
            }
            DialogueError::Storage(_) => "Something went wrong, please try again.".to_string(),
        }
    }

    /// Whether the dialogue state survives this outcome.
    pub fn preserves_dialogue(&self) -> bool {
        matches!(self, DialogueError::MalformedInput { .. })
    }
}

impl From<ParseError> for DialogueError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::MalformedInput { expected } => DialogueError::MalformedInput { expected },
        }
    }
}

impl From<NetworkError> for DialogueError {
    fn from(err: NetworkError) -> Self {
        DialogueError::Network(err.to_string())
    }
}

impl From<StoreError> for DialogueError {
    fn from(err: StoreError) -> Self {
        DialogueError::Storage(err.to_string())
    }
}
