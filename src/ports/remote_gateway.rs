//! Remote Gateway Port - Interface for the account/wallet/task REST API.
//!
//! Every call returns either a [`GatewayResponse`] (any HTTP status, with
//! the raw body and its JSON parse if there is one) or a [`NetworkError`].
//! Transport failures never escape as panics; callers decide what a
//! non-success status means.
//!
//! Authenticated calls take the caller's [`BearerToken`]. The gateway does
//! not check that the user is signed in; that precondition belongs to the
//! dialogue controller.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::session::BearerToken;

/// Failure to complete an HTTP exchange with the remote API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NetworkError {
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("{0}")]
    Transport(String),
}

/// A completed HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    pub status: u16,
    /// Body as received.
    pub raw: String,
    /// Body parsed as JSON, when it is JSON.
    pub json: Option<Value>,
}

impl GatewayResponse {
    /// Builds a response from a status and raw body, parsing JSON if possible.
    pub fn new(status: u16, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let json = serde_json::from_str(&raw).ok();
        Self { status, raw, json }
    }

    /// Builds a JSON response.
    pub fn from_json(status: u16, body: Value) -> Self {
        Self {
            status,
            raw: body.to_string(),
            json: Some(body),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// A top-level string field of a JSON object body.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.json.as_ref()?.get(key)?.as_str()
    }
}

/// Result of `GET /captcha`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CaptchaResponse {
    pub status: u16,
    /// Value of the `X-Captcha-ID` header; absent when captcha is disabled.
    pub captcha_id: Option<String>,
    pub image: Vec<u8>,
}

impl CaptchaResponse {
    /// The issued challenge, if the service returned one.
    pub fn challenge(self) -> Option<CaptchaChallenge> {
        if self.status != 200 {
            return None;
        }
        let captcha_id = self.captcha_id.filter(|id| !id.is_empty())?;
        Some(CaptchaChallenge {
            captcha_id,
            image: self.image,
        })
    }
}

/// A captcha issued for one flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptchaChallenge {
    pub captcha_id: String,
    pub image: Vec<u8>,
}

/// Body of `POST /register` and `POST /auth`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha_answer: Option<String>,
    pub username: String,
    pub password: String,
}

/// Body of `POST /restoreuser`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoreRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha_answer: Option<String>,
    pub username: String,
    pub mnemonic: String,
    pub new_password: String,
}

/// Body of `POST /api/tasks`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRequest {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub currency: String,
    /// ISO 8601 timestamp, forwarded as entered.
    pub deadline: String,
}

/// Query of `POST /api/wallet/bitcoinSend`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BitcoinTransfer {
    pub to: String,
    /// Forwarded verbatim as entered.
    pub amount: String,
}

pub type GatewayResult<T = GatewayResponse> = Result<T, NetworkError>;

/// Port for the remote account/wallet/task service.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// `GET /captcha`
    async fn fetch_captcha(&self) -> GatewayResult<CaptchaResponse>;

    /// `POST /register`
    async fn register(&self, request: &CredentialsRequest) -> GatewayResult;

    /// `POST /auth`
    async fn authenticate(&self, request: &CredentialsRequest) -> GatewayResult;

    /// `POST /restoreuser`
    async fn restore_user(&self, request: &RestoreRequest) -> GatewayResult;

    /// `GET /api/tasks`
    async fn list_tasks(&self, token: &BearerToken) -> GatewayResult;

    /// `POST /api/tasks`
    async fn create_task(&self, token: &BearerToken, request: &TaskRequest) -> GatewayResult;

    /// `GET /api/wallet?currency=`
    async fn wallet(&self, token: &BearerToken, currency: &str) -> GatewayResult;

    /// `POST /api/wallet/bitcoinSend?to=&amount=`
    async fn send_bitcoin(&self, token: &BearerToken, transfer: &BitcoinTransfer)
        -> GatewayResult;
}
