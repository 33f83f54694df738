//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the dialogue core and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `SessionStore` - Bearer token per user
//! - `DialogueStore` - In-progress dialogue per user
//!
//! ## Outbound Ports
//!
//! - `RemoteGateway` - Account/wallet/task REST API
//! - `ChatTransport` - Messages, photos and callback acknowledgements

mod chat_transport;
mod dialogue_store;
mod remote_gateway;
mod session_store;

pub use chat_transport::{ChatTransport, TransportError};
pub use dialogue_store::DialogueStore;
pub use remote_gateway::{
    BitcoinTransfer, CaptchaChallenge, CaptchaResponse, CredentialsRequest, GatewayResponse,
    GatewayResult, NetworkError, RemoteGateway, RestoreRequest, TaskRequest,
};
pub use session_store::{SessionStore, StoreError};
