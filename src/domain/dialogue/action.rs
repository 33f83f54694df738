//! Account actions selectable from the start keyboard.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three account flows offered before a user is signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountAction {
    Register,
    Auth,
    Restore,
}

impl AccountAction {
    pub const ALL: [AccountAction; 3] = [Self::Register, Self::Auth, Self::Restore];

    /// Parses the callback payload of a start keyboard button.
    pub fn from_callback(data: &str) -> Option<Self> {
        match data {
            "register" => Some(Self::Register),
            "auth" => Some(Self::Auth),
            "restore" => Some(Self::Restore),
            _ => None,
        }
    }

    /// Callback payload carried by the matching button.
    pub fn callback_data(&self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::Auth => "auth",
            Self::Restore => "restore",
        }
    }

    /// Button label on the start keyboard.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Register => "Sign up",
            Self::Auth => "Sign in",
            Self::Restore => "Restore access",
        }
    }
}

impl fmt::Display for AccountAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.callback_data())
    }
}
