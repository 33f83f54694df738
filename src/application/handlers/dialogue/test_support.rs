//! Shared fixture for controller tests.

use std::sync::Arc;

pub use crate::adapters::remote::{GatewayCall, MockRemoteGateway};
pub use crate::adapters::storage::{InMemoryDialogueStore, InMemorySessionStore};
pub use crate::ports::{DialogueStore, SessionStore};

use super::DialogueController;
use crate::domain::dialogue::DialogueState;
use crate::domain::foundation::UserId;
use crate::domain::session::{BearerToken, Session};

pub fn alice() -> UserId {
    UserId::new(1001)
}

pub fn bob() -> UserId {
    UserId::new(2002)
}

pub struct Fixture {
    pub controller: DialogueController,
    pub sessions: Arc<InMemorySessionStore>,
    pub dialogues: Arc<InMemoryDialogueStore>,
    pub gateway: MockRemoteGateway,
}

impl Fixture {
    pub fn new(gateway: MockRemoteGateway) -> Self {
        let sessions = Arc::new(InMemorySessionStore::new());
        let dialogues = Arc::new(InMemoryDialogueStore::new());
        let controller = DialogueController::new(
            sessions.clone(),
            dialogues.clone(),
            Arc::new(gateway.clone()),
        );
        Self {
            controller,
            sessions,
            dialogues,
            gateway,
        }
    }

    pub async fn sign_in(&self, user_id: UserId, token: &str) {
        self.sessions
            .set(&Session::new(user_id, BearerToken::new(token)))
            .await
            .unwrap();
    }

    pub async fn token(&self, user_id: UserId) -> Option<String> {
        self.sessions
            .get(user_id)
            .await
            .unwrap()
            .map(|session| session.token.expose().to_string())
    }

    pub async fn dialogue(&self, user_id: UserId) -> Option<DialogueState> {
        self.dialogues.get(user_id).await.unwrap()
    }
}
