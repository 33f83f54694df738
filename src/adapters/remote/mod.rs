//! Remote Gateway Adapters.
//!
//! ## Available Adapters
//!
//! - `HttpRemoteGateway` - reqwest client against the live API
//! - `MockRemoteGateway` - Configurable mock for testing

mod http_gateway;
mod mock_gateway;

pub use http_gateway::{HttpGatewayConfig, HttpRemoteGateway, CAPTCHA_ID_HEADER};
pub use mock_gateway::{GatewayCall, MockRemoteGateway};
