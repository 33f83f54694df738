//! Menu keys and the keyboards that carry them.

use super::action::AccountAction;
use super::reply::{Button, Keyboard};

/// Callback payload of a button shown to a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuKey {
    Tasks,
    TaskList,
    TaskCreate,
    Wallet,
    WalletSend,
    BackStart,
    /// Any key without a handler (reviews, disputes, profile...).
    Other(String),
}

impl MenuKey {
    pub fn parse(data: &str) -> Self {
        match data {
            "menu_tasks" => Self::Tasks,
            "task_list" => Self::TaskList,
            "task_create" => Self::TaskCreate,
            "menu_wallet" => Self::Wallet,
            "wallet_send" => Self::WalletSend,
            "back_start" => Self::BackStart,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn callback_data(&self) -> &str {
        match self {
            Self::Tasks => "menu_tasks",
            Self::TaskList => "task_list",
            Self::TaskCreate => "task_create",
            Self::Wallet => "menu_wallet",
            Self::WalletSend => "wallet_send",
            Self::BackStart => "back_start",
            Self::Other(key) => key,
        }
    }
}

fn button(label: &str, key: MenuKey) -> Button {
    Button::new(label, key.callback_data())
}

/// Register / auth / restore choice shown to signed-out users.
pub fn start_keyboard() -> Keyboard {
    Keyboard::column(
        AccountAction::ALL
            .iter()
            .map(|action| Button::new(action.label(), action.callback_data())),
    )
}

/// Main menu of a signed-in user.
pub fn user_menu_keyboard() -> Keyboard {
    Keyboard::column([
        button("Tasks", MenuKey::Tasks),
        button("Wallet", MenuKey::Wallet),
        Button::new("Reviews", "menu_reviews"),
        Button::new("Disputes", "menu_disputes"),
        Button::new("Profile", "menu_profile"),
        Button::new("Tickets", "menu_tickets"),
        Button::new("Chats", "menu_chats"),
        button("Back", MenuKey::BackStart),
    ])
}

pub fn tasks_keyboard() -> Keyboard {
    Keyboard::column([
        button("Create task", MenuKey::TaskCreate),
        button("My tasks", MenuKey::TaskList),
        button("Back", MenuKey::BackStart),
    ])
}

pub fn wallet_keyboard() -> Keyboard {
    Keyboard::column([
        button("Send BTC", MenuKey::WalletSend),
        button("Back", MenuKey::BackStart),
    ])
}
