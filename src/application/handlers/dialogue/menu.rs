//! Menu buttons of a signed-in user.

use tracing::debug;

use super::controller::{
    display_field, expect_success, json_body, value_text, DialogueController, DialogueResult,
    CURRENCY,
};
use crate::domain::dialogue::menu::{tasks_keyboard, wallet_keyboard};
use crate::domain::dialogue::{escape_html, MenuKey, Reply, StepFlow, TextFormat};
use crate::domain::foundation::UserId;
use crate::domain::session::Session;

/// Most tasks shown by the task list.
pub const TASK_LIST_LIMIT: usize = 5;

impl DialogueController {
    /// Routes a menu button. Every key requires a session; without one no
    /// remote call is made.
    pub async fn on_menu_action(&self, user_id: UserId, key: MenuKey) -> DialogueResult {
        let session = self.require_session(user_id).await?;

        match key {
            MenuKey::Tasks => Ok(vec![Reply::text("Tasks:").with_keyboard(tasks_keyboard())]),
            MenuKey::TaskList => self.list_tasks(&session).await,
            MenuKey::Wallet => self.show_wallet(&session).await,
            MenuKey::WalletSend => self.start_flow(user_id, StepFlow::WalletSend).await,
            MenuKey::TaskCreate => self.start_flow(user_id, StepFlow::TaskCreate).await,
            MenuKey::BackStart => self.on_start(user_id).await,
            MenuKey::Other(key) => {
                debug!(user_id = %user_id, key = %key, "Menu key has no handler");
                Ok(vec![Reply::text("This feature is not implemented yet.")])
            }
        }
    }

    async fn list_tasks(&self, session: &Session) -> DialogueResult {
        let response = expect_success(self.gateway.list_tasks(&session.token).await?)?;
        let body = json_body(&response)?;
        let tasks = body
            .get("tasks")
            .and_then(|tasks| tasks.as_array())
            .map(Vec::as_slice)
            .unwrap_or_default();

        if tasks.is_empty() {
            return Ok(vec![Reply::text("You have no tasks.")]);
        }

        let mut text = String::from("Your tasks:");
        for task in tasks.iter().take(TASK_LIST_LIMIT) {
            let title = task.get("title").and_then(value_text).unwrap_or_default();
            let id = task.get("id").and_then(value_text).unwrap_or_default();
            text.push_str(&format!("\n- {} (ID: {})", title, id));
        }
        Ok(vec![Reply::text(text)])
    }

    async fn show_wallet(&self, session: &Session) -> DialogueResult {
        let response = expect_success(self.gateway.wallet(&session.token, CURRENCY).await?)?;
        json_body(&response)?;

        let address = display_field(&response, "address").unwrap_or_else(|| "unknown".to_string());
        let balance = display_field(&response, "balance").unwrap_or_else(|| "0".to_string());
        let text = format!(
            "<b>Your {currency} wallet</b>\n\nAddress: <code>{}</code>\nBalance: {} {currency}",
            escape_html(&address),
            escape_html(&balance),
            currency = CURRENCY,
        );
        Ok(vec![Reply::text(text)
            .with_format(TextFormat::Html)
            .with_keyboard(wallet_keyboard())])
    }
}
