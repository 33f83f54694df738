//! Adapters - Implementations of port interfaces.
//!
//! - `storage` - session and dialogue stores (in-memory, Redis)
//! - `remote` - remote account/wallet/task API (reqwest, mock)
//! - `telegram` - chat transport and update dispatch (teloxide)

pub mod remote;
pub mod storage;
pub mod telegram;
