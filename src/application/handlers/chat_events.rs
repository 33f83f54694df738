//! ChatEventHandler - entry point for every incoming chat event.
//!
//! Serializes events per user, runs the controller, and turns the outcome
//! into outgoing messages. Nothing here fails: every error ends up as a
//! message to the user and a log line.

use std::sync::Arc;
use tracing::{debug, error, info_span, warn, Instrument};
use uuid::Uuid;

use super::dialogue::{DialogueController, DialogueResult};
use crate::application::UserLocks;
use crate::domain::dialogue::{AccountAction, DialogueError, MenuKey, Reply};
use crate::domain::foundation::UserId;
use crate::ports::{ChatTransport, TransportError};

/// Handles `/start`, button presses and free text.
pub struct ChatEventHandler {
    controller: Arc<DialogueController>,
    transport: Arc<dyn ChatTransport>,
    locks: UserLocks,
}

impl ChatEventHandler {
    pub fn new(controller: Arc<DialogueController>, transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            controller,
            transport,
            locks: UserLocks::new(),
        }
    }

    pub async fn on_start_command(&self, user_id: UserId) {
        let span = event_span(user_id, "start");
        async {
            let _guard = self.locks.acquire(user_id).await;
            let outcome = self.controller.on_start(user_id).await;
            self.deliver(user_id, outcome).await;
        }
        .instrument(span)
        .await
    }

    /// A button press. The press is acknowledged before anything else.
    pub async fn on_callback(&self, user_id: UserId, callback_id: &str, data: &str) {
        let span = event_span(user_id, "callback");
        async {
            if let Err(err) = self.transport.answer_callback(callback_id).await {
                warn!(error = %err, "Failed to acknowledge button press");
            }

            let _guard = self.locks.acquire(user_id).await;
            debug!(data = %data, "Button pressed");
            let outcome = match AccountAction::from_callback(data) {
                Some(action) => self.controller.on_action_selected(user_id, action).await,
                None => {
                    self.controller
                        .on_menu_action(user_id, MenuKey::parse(data))
                        .await
                }
            };
            self.deliver(user_id, outcome).await;
        }
        .instrument(span)
        .await
    }

    pub async fn on_text(&self, user_id: UserId, text: &str) {
        let span = event_span(user_id, "text");
        async {
            let _guard = self.locks.acquire(user_id).await;
            let outcome = self.controller.on_free_text_input(user_id, text).await;
            self.deliver(user_id, outcome).await;
        }
        .instrument(span)
        .await
    }

    async fn deliver(&self, user_id: UserId, outcome: DialogueResult) {
        let replies = match outcome {
            Ok(replies) => replies,
            Err(err) => {
                log_failure(&err);
                vec![Reply::text(err.user_message())]
            }
        };

        for reply in &replies {
            if let Err(err) = self.send(user_id, reply).await {
                error!(error = %err, "Failed to deliver reply");
                break;
            }
        }
    }

    async fn send(&self, user_id: UserId, reply: &Reply) -> Result<(), TransportError> {
        match &reply.photo {
            Some(image) => {
                self.transport
                    .send_photo(user_id, image, &reply.text, reply.keyboard.as_ref())
                    .await
            }
            None => {
                self.transport
                    .send_message(user_id, &reply.text, reply.format, reply.keyboard.as_ref())
                    .await
            }
        }
    }
}

fn event_span(user_id: UserId, kind: &'static str) -> tracing::Span {
    info_span!(
        "chat_event",
        user_id = %user_id,
        kind = kind,
        correlation_id = %Uuid::new_v4()
    )
}

fn log_failure(err: &DialogueError) {
    match err {
        DialogueError::Storage(_) => error!(error = %err, "Dialogue failed"),
        DialogueError::Network(_)
        | DialogueError::Http { .. }
        | DialogueError::UnreadableResponse(_) => warn!(error = %err, "Remote call failed"),
        DialogueError::NoActiveDialogue
        | DialogueError::NotAuthenticated
        | DialogueError::MalformedInput { .. } => debug!(error = %err, "Input rejected"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::remote::MockRemoteGateway;
    use crate::adapters::storage::{InMemoryDialogueStore, InMemorySessionStore};
    use crate::domain::dialogue::{Keyboard, TextFormat};
    use crate::domain::session::{BearerToken, Session};
    use crate::ports::SessionStore;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Sent {
        Message {
            text: String,
            format: TextFormat,
            callbacks: Vec<String>,
        },
        Photo {
            caption: String,
            size: usize,
        },
        Answer(String),
    }

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<Sent>>,
        fail_messages: bool,
    }

    impl RecordingTransport {
        fn sent(&self) -> Vec<Sent> {
            self.sent.lock().unwrap().clone()
        }

        fn texts(&self) -> Vec<String> {
            self.sent()
                .into_iter()
                .filter_map(|sent| match sent {
                    Sent::Message { text, .. } => Some(text),
                    Sent::Photo { caption, .. } => Some(caption),
                    Sent::Answer(_) => None,
                })
                .collect()
        }
    }

    fn callbacks(keyboard: Option<&Keyboard>) -> Vec<String> {
        keyboard
            .map(|k| k.callbacks().into_iter().map(String::from).collect())
            .unwrap_or_default()
    }

    #[async_trait]
    impl ChatTransport for RecordingTransport {
        async fn send_message(
            &self,
            _user_id: UserId,
            text: &str,
            format: TextFormat,
            keyboard: Option<&Keyboard>,
        ) -> Result<(), TransportError> {
            if self.fail_messages {
                return Err(TransportError::Delivery("chat not found".to_string()));
            }
            self.sent.lock().unwrap().push(Sent::Message {
                text: text.to_string(),
                format,
                callbacks: callbacks(keyboard),
            });
            Ok(())
        }

        async fn send_photo(
            &self,
            _user_id: UserId,
            image: &[u8],
            caption: &str,
            _keyboard: Option<&Keyboard>,
        ) -> Result<(), TransportError> {
            self.sent.lock().unwrap().push(Sent::Photo {
                caption: caption.to_string(),
                size: image.len(),
            });
            Ok(())
        }

        async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError> {
            self.sent
                .lock()
                .unwrap()
                .push(Sent::Answer(callback_id.to_string()));
            Ok(())
        }
    }

    struct Harness {
        handler: ChatEventHandler,
        transport: Arc<RecordingTransport>,
        sessions: Arc<InMemorySessionStore>,
    }

    fn harness(gateway: MockRemoteGateway) -> Harness {
        harness_with(gateway, RecordingTransport::default())
    }

    fn harness_with(gateway: MockRemoteGateway, transport: RecordingTransport) -> Harness {
        let sessions = Arc::new(InMemorySessionStore::new());
        let controller = Arc::new(DialogueController::new(
            sessions.clone(),
            Arc::new(InMemoryDialogueStore::new()),
            Arc::new(gateway),
        ));
        let transport = Arc::new(transport);
        Harness {
            handler: ChatEventHandler::new(controller, transport.clone()),
            transport,
            sessions,
        }
    }

    fn user() -> UserId {
        UserId::new(42)
    }

    #[tokio::test]
    async fn callback_is_answered_before_reply() {
        let h = harness(MockRemoteGateway::new());
        h.handler.on_callback(user(), "cb-1", "auth").await;

        let sent = h.transport.sent();
        assert_eq!(sent[0], Sent::Answer("cb-1".to_string()));
        assert_eq!(
            sent[1],
            Sent::Message {
                text: "Enter: <username> <password>".to_string(),
                format: TextFormat::Plain,
                callbacks: vec![],
            }
        );
    }

    #[tokio::test]
    async fn captcha_prompt_is_sent_as_photo() {
        let h = harness(MockRemoteGateway::new().with_captcha("c-1", vec![1, 2, 3]));
        h.handler.on_callback(user(), "cb-1", "register").await;

        assert_eq!(
            h.transport.sent()[1],
            Sent::Photo {
                caption: "Enter: <captcha> <username> <password>".to_string(),
                size: 3,
            }
        );
    }

    #[tokio::test]
    async fn menu_key_without_session_asks_to_sign_in() {
        let h = harness(MockRemoteGateway::new());
        h.handler.on_callback(user(), "cb-2", "menu_wallet").await;

        assert_eq!(h.transport.texts(), vec!["You are not signed in. Use /start."]);
    }

    #[tokio::test]
    async fn text_without_dialogue_points_to_start() {
        let h = harness(MockRemoteGateway::new());
        h.handler.on_text(user(), "hello").await;

        assert_eq!(h.transport.texts(), vec!["Choose an action first with /start."]);
    }

    #[tokio::test]
    async fn malformed_input_shows_expected_format() {
        let h = harness(MockRemoteGateway::new());
        h.handler.on_callback(user(), "cb", "restore").await;
        h.handler.on_text(user(), "bob only").await;

        assert_eq!(
            h.transport.texts().last().map(String::as_str),
            Some("Format: <username> <mnemonic> <new_password>")
        );
    }

    #[tokio::test]
    async fn successful_sign_in_sends_ack_then_menu() {
        let h = harness(MockRemoteGateway::new().with_json(200, json!({"token": "jwt"})));
        h.handler.on_callback(user(), "cb", "auth").await;
        h.handler.on_text(user(), "alice pw").await;

        let texts = h.transport.texts();
        assert_eq!(&texts[1..], ["OK\nToken saved.", "User menu:"]);
        assert!(h.sessions.get(user()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn wallet_is_sent_as_html() {
        let h = harness(MockRemoteGateway::new().with_json(200, json!({"address": "a", "balance": 1})));
        h.sessions
            .set(&Session::new(user(), BearerToken::new("jwt")))
            .await
            .unwrap();

        h.handler.on_callback(user(), "cb", "menu_wallet").await;
        match &h.transport.sent()[1] {
            Sent::Message { format, callbacks, .. } => {
                assert_eq!(*format, TextFormat::Html);
                assert_eq!(callbacks, &vec!["wallet_send".to_string(), "back_start".to_string()]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn delivery_failure_is_swallowed() {
        let transport = RecordingTransport {
            fail_messages: true,
            ..Default::default()
        };
        let h = harness_with(MockRemoteGateway::new(), transport);

        h.handler.on_start_command(user()).await;
        assert!(h.transport.texts().is_empty());
    }
}
