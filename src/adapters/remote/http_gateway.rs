//! HTTP Remote Gateway - reqwest implementation of the RemoteGateway port.
//!
//! # Configuration
//!
//! ```ignore
//! let config = HttpGatewayConfig::new("https://api.example.com")
//!     .with_timeout(Duration::from_secs(10));
//!
//! let gateway = HttpRemoteGateway::new(config)?;
//! ```
//!
//! Every request is bounded by the configured timeout; expiry surfaces as
//! [`NetworkError::Timeout`]. Any HTTP status is returned as a
//! [`GatewayResponse`]; only failures to complete the exchange are errors.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;

use crate::domain::session::BearerToken;
use crate::ports::{
    BitcoinTransfer, CaptchaResponse, CredentialsRequest, GatewayResponse, GatewayResult,
    NetworkError, RemoteGateway, RestoreRequest, TaskRequest,
};

/// Header carrying the id of an issued captcha.
pub const CAPTCHA_ID_HEADER: &str = "X-Captcha-ID";

/// Configuration for the HTTP gateway.
#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    /// Base URL of the remote API, without trailing slash.
    pub base_url: String,
    /// Bound on every outbound call.
    pub timeout: Duration,
}

impl HttpGatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Remote gateway over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRemoteGateway {
    config: HttpGatewayConfig,
    client: Client,
}

impl HttpRemoteGateway {
    pub fn new(config: HttpGatewayConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn network_error(&self, e: reqwest::Error) -> NetworkError {
        if e.is_timeout() {
            NetworkError::Timeout {
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else if e.is_connect() {
            NetworkError::Connect(e.to_string())
        } else {
            NetworkError::Transport(e.to_string())
        }
    }

    async fn send(&self, request: RequestBuilder) -> GatewayResult<Response> {
        request.send().await.map_err(|e| self.network_error(e))
    }

    /// Sends a request and reads the body as text.
    async fn execute(&self, request: RequestBuilder) -> GatewayResult {
        let response = self.send(request).await?;
        let status = response.status().as_u16();
        let raw = response.text().await.map_err(|e| self.network_error(e))?;

        tracing::debug!(status, bytes = raw.len(), "Remote API responded");
        Ok(GatewayResponse::new(status, raw))
    }

    fn captcha_request(&self) -> RequestBuilder {
        self.client
            .get(self.url("/captcha"))
            .header(ACCEPT, "image/png")
    }

    fn credentials_request(&self, path: &str, request: &CredentialsRequest) -> RequestBuilder {
        self.client.post(self.url(path)).json(request)
    }

    fn restore_request(&self, request: &RestoreRequest) -> RequestBuilder {
        self.client.post(self.url("/restoreuser")).json(request)
    }

    fn list_tasks_request(&self, token: &BearerToken) -> RequestBuilder {
        self.client
            .get(self.url("/api/tasks"))
            .bearer_auth(token.expose())
    }

    fn create_task_request(&self, token: &BearerToken, request: &TaskRequest) -> RequestBuilder {
        self.client
            .post(self.url("/api/tasks"))
            .bearer_auth(token.expose())
            .json(request)
    }

    fn wallet_request(&self, token: &BearerToken, currency: &str) -> RequestBuilder {
        self.client
            .get(self.url("/api/wallet"))
            .bearer_auth(token.expose())
            .query(&[("currency", currency)])
    }

    fn send_bitcoin_request(&self, token: &BearerToken, transfer: &BitcoinTransfer) -> RequestBuilder {
        self.client
            .post(self.url("/api/wallet/bitcoinSend"))
            .bearer_auth(token.expose())
            .query(transfer)
    }
}

#[async_trait]
impl RemoteGateway for HttpRemoteGateway {
    async fn fetch_captcha(&self) -> GatewayResult<CaptchaResponse> {
        let response = self.send(self.captcha_request()).await?;

        let status = response.status().as_u16();
        let captcha_id = response
            .headers()
            .get(CAPTCHA_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let image = response
            .bytes()
            .await
            .map_err(|e| self.network_error(e))?
            .to_vec();

        Ok(CaptchaResponse {
            status,
            captcha_id,
            image,
        })
    }

    async fn register(&self, request: &CredentialsRequest) -> GatewayResult {
        self.execute(self.credentials_request("/register", request))
            .await
    }

    async fn authenticate(&self, request: &CredentialsRequest) -> GatewayResult {
        self.execute(self.credentials_request("/auth", request))
            .await
    }

    async fn restore_user(&self, request: &RestoreRequest) -> GatewayResult {
        self.execute(self.restore_request(request)).await
    }

    async fn list_tasks(&self, token: &BearerToken) -> GatewayResult {
        self.execute(self.list_tasks_request(token)).await
    }

    async fn create_task(&self, token: &BearerToken, request: &TaskRequest) -> GatewayResult {
        self.execute(self.create_task_request(token, request)).await
    }

    async fn wallet(&self, token: &BearerToken, currency: &str) -> GatewayResult {
        self.execute(self.wallet_request(token, currency)).await
    }

    async fn send_bitcoin(
        &self,
        token: &BearerToken,
        transfer: &BitcoinTransfer,
    ) -> GatewayResult {
        self.execute(self.send_bitcoin_request(token, transfer))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn gateway() -> HttpRemoteGateway {
        HttpRemoteGateway::new(HttpGatewayConfig::new("http://localhost:8080")).unwrap()
    }

    fn token() -> BearerToken {
        BearerToken::new("jwt-123")
    }

    fn body_json(request: &reqwest::Request) -> serde_json::Value {
        let bytes = request.body().and_then(|body| body.as_bytes()).unwrap();
        serde_json::from_slice(bytes).unwrap()
    }

    /// Serves one canned HTTP response on a local port and returns its base URL.
    async fn serve_once(response: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{}", addr)
    }

    mod requests {
        use super::*;

        #[test]
        fn test_authenticated_calls_carry_bearer_token() {
            let gateway = gateway();
            let task = TaskRequest {
                title: "Logo".to_string(),
                description: "Vector logo".to_string(),
                price: 0.0015,
                currency: "BTC".to_string(),
                deadline: "2026-12-31T23:59:59Z".to_string(),
            };
            let transfer = BitcoinTransfer {
                to: "bc1qdest".to_string(),
                amount: "0.5".to_string(),
            };

            let requests = [
                gateway.list_tasks_request(&token()),
                gateway.create_task_request(&token(), &task),
                gateway.wallet_request(&token(), "BTC"),
                gateway.send_bitcoin_request(&token(), &transfer),
            ];
            for builder in requests {
                let request = builder.build().unwrap();
                assert_eq!(request.headers()[AUTHORIZATION], "Bearer jwt-123", "{}", request.url());
            }
        }

        #[test]
        fn test_account_calls_are_anonymous() {
            let gateway = gateway();
            let credentials = CredentialsRequest {
                captcha_id: None,
                captcha_answer: None,
                username: "alice".to_string(),
                password: "pw".to_string(),
            };

            let request = gateway
                .credentials_request("/auth", &credentials)
                .build()
                .unwrap();
            assert!(request.headers().get(AUTHORIZATION).is_none());
            assert_eq!(request.method(), reqwest::Method::POST);
            assert_eq!(request.url().path(), "/auth");
        }

        #[test]
        fn test_wallet_asks_for_currency() {
            let request = gateway().wallet_request(&token(), "BTC").build().unwrap();
            assert_eq!(request.method(), reqwest::Method::GET);
            assert_eq!(request.url().path(), "/api/wallet");
            assert_eq!(request.url().query(), Some("currency=BTC"));
        }

        #[test]
        fn test_bitcoin_send_passes_transfer_as_query() {
            let transfer = BitcoinTransfer {
                to: "bc1qdest".to_string(),
                amount: "0.5".to_string(),
            };
            let request = gateway()
                .send_bitcoin_request(&token(), &transfer)
                .build()
                .unwrap();

            assert_eq!(request.method(), reqwest::Method::POST);
            assert_eq!(request.url().path(), "/api/wallet/bitcoinSend");
            assert_eq!(request.url().query(), Some("to=bc1qdest&amount=0.5"));
            assert!(request.body().is_none());
        }

        #[test]
        fn test_register_body_omits_absent_captcha() {
            let credentials = CredentialsRequest {
                captcha_id: None,
                captcha_answer: None,
                username: "alice".to_string(),
                password: "two words".to_string(),
            };
            let request = gateway()
                .credentials_request("/register", &credentials)
                .build()
                .unwrap();

            assert_eq!(request.headers()[CONTENT_TYPE], "application/json");
            assert_eq!(
                body_json(&request),
                json!({"username": "alice", "password": "two words"})
            );
        }

        #[test]
        fn test_restore_body_carries_captcha_and_new_password() {
            let restore = RestoreRequest {
                captcha_id: Some("c-1".to_string()),
                captcha_answer: Some("x7k".to_string()),
                username: "alice".to_string(),
                mnemonic: "word1 word2 word3".to_string(),
                new_password: "secret".to_string(),
            };
            let request = gateway().restore_request(&restore).build().unwrap();

            assert_eq!(request.url().path(), "/restoreuser");
            assert_eq!(
                body_json(&request),
                json!({
                    "captcha_id": "c-1",
                    "captcha_answer": "x7k",
                    "username": "alice",
                    "mnemonic": "word1 word2 word3",
                    "new_password": "secret"
                })
            );
        }

        #[test]
        fn test_create_task_body() {
            let task = TaskRequest {
                title: "Logo".to_string(),
                description: "Vector logo".to_string(),
                price: 0.0015,
                currency: "BTC".to_string(),
                deadline: "2026-12-31T23:59:59Z".to_string(),
            };
            let request = gateway().create_task_request(&token(), &task).build().unwrap();

            assert_eq!(request.url().path(), "/api/tasks");
            assert_eq!(
                body_json(&request),
                json!({
                    "title": "Logo",
                    "description": "Vector logo",
                    "price": 0.0015,
                    "currency": "BTC",
                    "deadline": "2026-12-31T23:59:59Z"
                })
            );
        }
    }

    #[tokio::test]
    async fn test_captcha_id_is_read_from_header() {
        let base_url = serve_once(
            b"HTTP/1.1 200 OK\r\nX-Captcha-ID: c-42\r\nContent-Type: image/png\r\nContent-Length: 4\r\nConnection: close\r\n\r\n\x89PNG",
        )
        .await;
        let gateway = HttpRemoteGateway::new(HttpGatewayConfig::new(base_url)).unwrap();

        let challenge = gateway.fetch_captcha().await.unwrap().challenge().unwrap();
        assert_eq!(challenge.captcha_id, "c-42");
        assert_eq!(challenge.image, b"\x89PNG".to_vec());
    }

    #[tokio::test]
    async fn test_error_status_is_a_response_not_an_error() {
        let base_url = serve_once(
            b"HTTP/1.1 401 Unauthorized\r\nContent-Type: application/json\r\nContent-Length: 23\r\nConnection: close\r\n\r\n{\"message\":\"bad token\"}",
        )
        .await;
        let gateway = HttpRemoteGateway::new(HttpGatewayConfig::new(base_url)).unwrap();

        let response = gateway.list_tasks(&token()).await.unwrap();
        assert_eq!(response.status, 401);
        assert_eq!(response.str_field("message"), Some("bad token"));
    }

    #[tokio::test]
    async fn test_stalled_server_is_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });
        let gateway = HttpRemoteGateway::new(
            HttpGatewayConfig::new(format!("http://{}", addr))
                .with_timeout(Duration::from_millis(100)),
        )
        .unwrap();

        let result = gateway.wallet(&token(), "BTC").await;
        assert!(
            matches!(result, Err(NetworkError::Timeout { .. })),
            "{:?}",
            result
        );
    }

    #[test]
    fn test_config_strips_trailing_slash() {
        let config = HttpGatewayConfig::new("https://api.example.com/");
        assert_eq!(config.base_url, "https://api.example.com");
    }

    #[test]
    fn test_config_default_timeout() {
        let config = HttpGatewayConfig::new("https://api.example.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_url_joins_path() {
        let gateway = HttpRemoteGateway::new(HttpGatewayConfig::new("http://localhost:8080/"))
            .unwrap();
        assert_eq!(gateway.url("/restoreuser"), "http://localhost:8080/restoreuser");
        assert_eq!(
            gateway.url("/api/wallet/bitcoinSend"),
            "http://localhost:8080/api/wallet/bitcoinSend"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let gateway = HttpRemoteGateway::new(
            HttpGatewayConfig::new("http://127.0.0.1:9").with_timeout(Duration::from_secs(2)),
        )
        .unwrap();

        let result = gateway.fetch_captcha().await;
        assert!(result.is_err());
    }
}
