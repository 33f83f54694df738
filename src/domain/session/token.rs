//! Bearer token and the session that owns it.

use secrecy::{ExposeSecret, Secret};
use std::fmt;

use crate::domain::foundation::UserId;

/// Opaque credential issued by the remote API.
///
/// Attached verbatim as a bearer credential on authenticated calls.
/// Never printed by `Debug`.
#[derive(Clone)]
pub struct BearerToken(Secret<String>);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Secret::new(token.into()))
    }

    /// Exposes the raw token (for request headers and persistence only).
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

impl PartialEq for BearerToken {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for BearerToken {}

/// A user's authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub token: BearerToken,
}

impl Session {
    pub fn new(user_id: UserId, token: BearerToken) -> Self {
        Self { user_id, token }
    }
}
