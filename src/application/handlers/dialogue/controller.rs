//! DialogueController - decides what happens next for each user event.
//!
//! The controller owns no state of its own. Everything it knows about a
//! user lives in the session and dialogue stores, so any number of
//! controllers may share the same stores. Callers must serialize events of
//! the same user (see `UserLocks`).

use serde_json::Value;
use std::sync::Arc;

use crate::domain::dialogue::menu::{start_keyboard, user_menu_keyboard};
use crate::domain::dialogue::{DialogueError, Flow, Reply};
use crate::domain::foundation::UserId;
use crate::domain::session::Session;
use crate::ports::{DialogueStore, GatewayResponse, RemoteGateway, SessionStore};

/// Currency of every wallet and task call.
pub(super) const CURRENCY: &str = "BTC";

/// Replies to send, in order, or the failure to report.
pub type DialogueResult = Result<Vec<Reply>, DialogueError>;

/// Orchestrates stores, parser and gateway for every user event.
pub struct DialogueController {
    pub(super) sessions: Arc<dyn SessionStore>,
    pub(super) dialogues: Arc<dyn DialogueStore>,
    pub(super) gateway: Arc<dyn RemoteGateway>,
}

impl DialogueController {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        dialogues: Arc<dyn DialogueStore>,
        gateway: Arc<dyn RemoteGateway>,
    ) -> Self {
        Self {
            sessions,
            dialogues,
            gateway,
        }
    }

    /// `/start`: the user menu for signed-in users, the account choice
    /// otherwise. Never touches the dialogue.
    pub async fn on_start(&self, user_id: UserId) -> DialogueResult {
        if self.sessions.get(user_id).await?.is_some() {
            return Ok(vec![Reply::text("You are already signed in."), user_menu()]);
        }
        Ok(vec![
            Reply::text("Hello! Choose an action:").with_keyboard(start_keyboard())
        ])
    }

    /// Free text: feeds the message to the step the user is on.
    pub async fn on_free_text_input(&self, user_id: UserId, raw: &str) -> DialogueResult {
        let state = self
            .dialogues
            .get(user_id)
            .await?
            .ok_or(DialogueError::NoActiveDialogue)?;

        match state.action.flow() {
            Flow::Account(action) => self.submit_account(state, action, raw).await,
            Flow::Steps(step) => self.advance_step(state, step, raw).await,
        }
    }

    pub(super) async fn require_session(&self, user_id: UserId) -> Result<Session, DialogueError> {
        self.sessions
            .get(user_id)
            .await?
            .ok_or(DialogueError::NotAuthenticated)
    }

    /// Ends the user's flow, then hands back its outcome.
    pub(super) async fn finish<T>(
        &self,
        user_id: UserId,
        outcome: Result<T, DialogueError>,
    ) -> Result<T, DialogueError> {
        self.dialogues.delete(user_id).await?;
        outcome
    }
}

pub(super) fn user_menu() -> Reply {
    Reply::text("User menu:").with_keyboard(user_menu_keyboard())
}

/// Turns a non-2xx response into `DialogueError::Http` with the raw body.
pub(super) fn expect_success(response: GatewayResponse) -> Result<GatewayResponse, DialogueError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(DialogueError::http(response.status, response.raw))
    }
}

/// The JSON body of a success response.
pub(super) fn json_body(response: &GatewayResponse) -> Result<&Value, DialogueError> {
    response
        .json
        .as_ref()
        .ok_or_else(|| DialogueError::UnreadableResponse(response.raw.clone()))
}

/// Text of a scalar JSON value: strings verbatim, numbers and booleans as
/// written by the server.
pub(super) fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Text of a top-level field of the response body.
pub(super) fn display_field(response: &GatewayResponse, key: &str) -> Option<String> {
    response.json.as_ref()?.get(key).and_then(value_text)
}
