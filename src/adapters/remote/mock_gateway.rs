//! Mock Remote Gateway for testing.
//!
//! Provides a configurable mock implementation of the RemoteGateway port,
//! allowing the dialogue controller to be exercised without a live API.
//!
//! # Features
//!
//! - Queued responses, consumed in call order
//! - Fixed captcha behaviour (disabled by default)
//! - Network error injection
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let gateway = MockRemoteGateway::new()
//!     .with_captcha("c-1", vec![0x89, 0x50])
//!     .with_json(200, json!({"token": "jwt", "message": "Welcome"}));
//!
//! let response = gateway.authenticate(&request).await?;
//! assert_eq!(gateway.calls().len(), 1);
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::session::BearerToken;
use crate::ports::{
    BitcoinTransfer, CaptchaResponse, CredentialsRequest, GatewayResponse, GatewayResult,
    NetworkError, RemoteGateway, RestoreRequest, TaskRequest,
};

/// A recorded gateway call.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    FetchCaptcha,
    Register(CredentialsRequest),
    Authenticate(CredentialsRequest),
    RestoreUser(RestoreRequest),
    ListTasks { token: String },
    CreateTask { token: String, request: TaskRequest },
    Wallet { token: String, currency: String },
    SendBitcoin { token: String, transfer: BitcoinTransfer },
}

/// Mock remote gateway for testing.
#[derive(Debug, Clone)]
pub struct MockRemoteGateway {
    captcha: Arc<Mutex<GatewayResult<CaptchaResponse>>>,
    responses: Arc<Mutex<VecDeque<GatewayResult>>>,
    calls: Arc<Mutex<Vec<GatewayCall>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Default for MockRemoteGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRemoteGateway {
    /// Creates a mock with captcha disabled and no queued responses.
    pub fn new() -> Self {
        Self {
            captcha: Arc::new(Mutex::new(Ok(CaptchaResponse {
                status: 200,
                captcha_id: None,
                image: Vec::new(),
            }))),
            responses: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Issues this challenge on every captcha request.
    pub fn with_captcha(self, captcha_id: impl Into<String>, image: Vec<u8>) -> Self {
        *lock(&self.captcha) = Ok(CaptchaResponse {
            status: 200,
            captcha_id: Some(captcha_id.into()),
            image,
        });
        self
    }

    /// Makes captcha requests fail at the network level.
    pub fn with_captcha_error(self, message: impl Into<String>) -> Self {
        *lock(&self.captcha) = Err(NetworkError::Connect(message.into()));
        self
    }

    /// Queues a response with a raw body.
    pub fn with_response(self, status: u16, body: impl Into<String>) -> Self {
        lock(&self.responses).push_back(Ok(GatewayResponse::new(status, body)));
        self
    }

    /// Queues a JSON response.
    pub fn with_json(self, status: u16, body: Value) -> Self {
        lock(&self.responses).push_back(Ok(GatewayResponse::from_json(status, body)));
        self
    }

    /// Queues a network failure.
    pub fn with_network_error(self, message: impl Into<String>) -> Self {
        lock(&self.responses).push_back(Err(NetworkError::Connect(message.into())));
        self
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<GatewayCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Number of queued responses not yet consumed.
    pub fn pending_responses(&self) -> usize {
        lock(&self.responses).len()
    }

    fn record(&self, call: GatewayCall) {
        lock(&self.calls).push(call);
    }

    fn next_response(&self) -> GatewayResult {
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| Err(NetworkError::Transport("no mock response queued".to_string())))
    }
}

#[async_trait]
impl RemoteGateway for MockRemoteGateway {
    async fn fetch_captcha(&self) -> GatewayResult<CaptchaResponse> {
        self.record(GatewayCall::FetchCaptcha);
        lock(&self.captcha).clone()
    }

    async fn register(&self, request: &CredentialsRequest) -> GatewayResult {
        self.record(GatewayCall::Register(request.clone()));
        self.next_response()
    }

    async fn authenticate(&self, request: &CredentialsRequest) -> GatewayResult {
        self.record(GatewayCall::Authenticate(request.clone()));
        self.next_response()
    }

    async fn restore_user(&self, request: &RestoreRequest) -> GatewayResult {
        self.record(GatewayCall::RestoreUser(request.clone()));
        self.next_response()
    }

    async fn list_tasks(&self, token: &BearerToken) -> GatewayResult {
        self.record(GatewayCall::ListTasks {
            token: token.expose().to_string(),
        });
        self.next_response()
    }

    async fn create_task(&self, token: &BearerToken, request: &TaskRequest) -> GatewayResult {
        self.record(GatewayCall::CreateTask {
            token: token.expose().to_string(),
            request: request.clone(),
        });
        self.next_response()
    }

    async fn wallet(&self, token: &BearerToken, currency: &str) -> GatewayResult {
        self.record(GatewayCall::Wallet {
            token: token.expose().to_string(),
            currency: currency.to_string(),
        });
        self.next_response()
    }

    async fn send_bitcoin(
        &self,
        token: &BearerToken,
        transfer: &BitcoinTransfer,
    ) -> GatewayResult {
        self.record(GatewayCall::SendBitcoin {
            token: token.expose().to_string(),
            transfer: transfer.clone(),
        });
        self.next_response()
    }
}
