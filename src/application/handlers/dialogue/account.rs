//! Register, sign-in and restore flows.
//!
//! Each flow starts with a button press, which fetches a captcha and stores
//! the dialogue, and ends with the next message that parses.

use tracing::{debug, info, warn};

use super::controller::{expect_success, user_menu, DialogueController, DialogueResult};
use crate::domain::dialogue::{grammar_for, AccountAction, DialogueState, Field, Reply};
use crate::domain::foundation::UserId;
use crate::domain::session::{BearerToken, Session};
use crate::ports::{CredentialsRequest, GatewayResponse, RestoreRequest};

/// Response keys that may carry the session token, in priority order.
const TOKEN_KEYS: [&str; 2] = ["token", "encrypted"];

impl DialogueController {
    /// Starts an account flow, replacing any unfinished dialogue.
    pub async fn on_action_selected(&self, user_id: UserId, action: AccountAction) -> DialogueResult {
        // 1. Captcha is best-effort; failures mean "disabled"
        let challenge = match self.gateway.fetch_captcha().await {
            Ok(response) => response.challenge(),
            Err(err) => {
                warn!(user_id = %user_id, error = %err, "Captcha unavailable, continuing without it");
                None
            }
        };

        // 2. Store the new dialogue
        let captcha_id = challenge.as_ref().map(|c| c.captcha_id.clone());
        let state = DialogueState::account(user_id, action, captcha_id);
        self.dialogues.set(&state).await?;
        debug!(
            user_id = %user_id,
            action = %action,
            captcha = state.captcha_present(),
            "Account flow started"
        );

        // 3. Prompt with the grammar the next message must follow
        let prompt = format!(
            "Enter: {}",
            grammar_for(action, state.captcha_present()).format()
        );
        let reply = match challenge {
            Some(challenge) => Reply::photo(challenge.image, prompt),
            None => Reply::text(prompt),
        };
        Ok(vec![reply])
    }

    pub(super) async fn submit_account(
        &self,
        state: DialogueState,
        action: AccountAction,
        raw: &str,
    ) -> DialogueResult {
        let user_id = state.user_id;

        // 1. Parse; malformed input keeps the dialogue for a retry
        let mut parsed = grammar_for(action, state.captcha_present()).parse(raw)?;
        let captcha_answer = state
            .captcha_id
            .as_ref()
            .map(|_| parsed.take(Field::CaptchaAnswer));

        // 2. Call the remote API
        let result = match action {
            AccountAction::Register | AccountAction::Auth => {
                let request = CredentialsRequest {
                    captcha_id: state.captcha_id.clone(),
                    captcha_answer,
                    username: parsed.take(Field::Username),
                    password: parsed.take(Field::Password),
                };
                if action == AccountAction::Register {
                    self.gateway.register(&request).await
                } else {
                    self.gateway.authenticate(&request).await
                }
            }
            AccountAction::Restore => {
                let request = RestoreRequest {
                    captcha_id: state.captcha_id.clone(),
                    captcha_answer,
                    username: parsed.take(Field::Username),
                    mnemonic: parsed.take(Field::Mnemonic),
                    new_password: parsed.take(Field::NewPassword),
                };
                self.gateway.restore_user(&request).await
            }
        };

        // 3. The flow ends here whatever the outcome
        let response = self.finish(user_id, result.map_err(Into::into)).await?;
        let response = expect_success(response)?;
        info!(
            user_id = %user_id,
            action = %action,
            status = response.status,
            "Account request accepted"
        );

        // 4. Keep the token, if the server issued one
        self.commit_token(user_id, &response).await
    }

    async fn commit_token(&self, user_id: UserId, response: &GatewayResponse) -> DialogueResult {
        let message = server_message(response);
        match session_token(response) {
            Some(token) => {
                self.sessions
                    .set(&Session::new(user_id, BearerToken::new(token)))
                    .await?;
                info!(user_id = %user_id, "Session token stored");
                Ok(vec![
                    Reply::text(format!("{}\nToken saved.", message.unwrap_or("OK"))),
                    user_menu(),
                ])
            }
            None => Ok(vec![Reply::text(message.unwrap_or(&response.raw))]),
        }
    }
}

/// First non-empty token under any of [`TOKEN_KEYS`].
fn session_token(response: &GatewayResponse) -> Option<&str> {
    TOKEN_KEYS
        .iter()
        .find_map(|key| response.str_field(key).filter(|token| !token.is_empty()))
}

/// The server's `message`; a body that is not JSON is the message itself.
fn server_message(response: &GatewayResponse) -> Option<&str> {
    match response.json {
        Some(_) => response.str_field("message"),
        None => Some(response.raw.as_str()),
    }
}
