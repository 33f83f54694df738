//! Dialogue state machine.
//!
//! A user is either idle (no stored state) or awaiting input for one
//! [`DialogueAction`]. Each accepted input either advances to the next
//! action of the same flow or completes the flow:
//!
//! ```text
//! Idle -> Awaiting(action) -> Awaiting(action.next())   intermediate step
//!                          -> Idle                      flow completed or failed
//! ```
//!
//! Selecting a new action from any state replaces the stored state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::action::AccountAction;
use crate::domain::foundation::UserId;

/// Field names recorded in [`DialogueState::collected`].
pub mod fields {
    pub const ADDRESS: &str = "address";
    pub const AMOUNT: &str = "amount";
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const PRICE: &str = "price";
    pub const DEADLINE: &str = "deadline";
}

/// The step a user's dialogue is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueAction {
    Register,
    Auth,
    Restore,
    AskWalletAddress,
    AskWalletAmount,
    AskTaskTitle,
    AskTaskDesc,
    AskTaskPrice,
    AskTaskDeadline,
}

/// The flow a dialogue action belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Single-message account flow (register, auth, restore).
    Account(AccountAction),
    /// One field per message, submitted after the last step.
    Steps(Step),
}

/// Flows that collect their fields over several messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepFlow {
    /// Address then amount.
    WalletSend,
    /// Title, description, price, deadline.
    TaskCreate,
}

impl StepFlow {
    pub fn first(self) -> Step {
        match self {
            StepFlow::WalletSend => Step::WalletAddress,
            StepFlow::TaskCreate => Step::TaskTitle,
        }
    }
}

/// One field-collecting step of a [`StepFlow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    WalletAddress,
    WalletAmount,
    TaskTitle,
    TaskDesc,
    TaskPrice,
    TaskDeadline,
}

impl Step {
    /// The step that follows this one, or `None` on the last step.
    pub fn next(self) -> Option<Self> {
        use Step::*;
        match self {
            WalletAddress => Some(WalletAmount),
            WalletAmount => None,
            TaskTitle => Some(TaskDesc),
            TaskDesc => Some(TaskPrice),
            TaskPrice => Some(TaskDeadline),
            TaskDeadline => None,
        }
    }

    pub fn flow(self) -> StepFlow {
        use Step::*;
        match self {
            WalletAddress | WalletAmount => StepFlow::WalletSend,
            TaskTitle | TaskDesc | TaskPrice | TaskDeadline => StepFlow::TaskCreate,
        }
    }

    /// Name under which the step stores its input.
    pub fn field(self) -> &'static str {
        use Step::*;
        match self {
            WalletAddress => fields::ADDRESS,
            WalletAmount => fields::AMOUNT,
            TaskTitle => fields::TITLE,
            TaskDesc => fields::DESCRIPTION,
            TaskPrice => fields::PRICE,
            TaskDeadline => fields::DEADLINE,
        }
    }
}

impl DialogueAction {
    /// The action that follows this one, or `None` if accepting input here
    /// completes the flow.
    pub fn next(self) -> Option<Self> {
        match self.flow() {
            Flow::Account(_) => None,
            Flow::Steps(step) => step.next().map(Self::from),
        }
    }

    pub fn flow(self) -> Flow {
        use DialogueAction::*;
        match self {
            Register => Flow::Account(AccountAction::Register),
            Auth => Flow::Account(AccountAction::Auth),
            Restore => Flow::Account(AccountAction::Restore),
            AskWalletAddress => Flow::Steps(Step::WalletAddress),
            AskWalletAmount => Flow::Steps(Step::WalletAmount),
            AskTaskTitle => Flow::Steps(Step::TaskTitle),
            AskTaskDesc => Flow::Steps(Step::TaskDesc),
            AskTaskPrice => Flow::Steps(Step::TaskPrice),
            AskTaskDeadline => Flow::Steps(Step::TaskDeadline),
        }
    }

    /// Name under which a multistep action stores its input.
    ///
    /// Account actions collect all their fields from one message and store
    /// nothing.
    pub fn field(self) -> Option<&'static str> {
        match self.flow() {
            Flow::Account(_) => None,
            Flow::Steps(step) => Some(step.field()),
        }
    }
}

impl From<Step> for DialogueAction {
    fn from(step: Step) -> Self {
        match step {
            Step::WalletAddress => DialogueAction::AskWalletAddress,
            Step::WalletAmount => DialogueAction::AskWalletAmount,
            Step::TaskTitle => DialogueAction::AskTaskTitle,
            Step::TaskDesc => DialogueAction::AskTaskDesc,
            Step::TaskPrice => DialogueAction::AskTaskPrice,
            Step::TaskDeadline => DialogueAction::AskTaskDeadline,
        }
    }
}

impl From<AccountAction> for DialogueAction {
    fn from(action: AccountAction) -> Self {
        match action {
            AccountAction::Register => DialogueAction::Register,
            AccountAction::Auth => DialogueAction::Auth,
            AccountAction::Restore => DialogueAction::Restore,
        }
    }
}

/// Result of recording one accepted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The flow continues; the state now waits on this step.
    Awaiting(Step),
    /// The last field was recorded; the flow is ready to submit.
    Complete,
}

/// A user's in-progress interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueState {
    pub user_id: UserId,
    /// Challenge issued when the flow started; `None` when captcha is disabled.
    pub captcha_id: Option<String>,
    pub action: DialogueAction,
    /// Fields accepted so far, keyed by [`fields`] names.
    #[serde(default)]
    pub collected: BTreeMap<String, String>,
}

impl DialogueState {
    /// Starts an account flow.
    pub fn account(user_id: UserId, action: AccountAction, captcha_id: Option<String>) -> Self {
        Self {
            user_id,
            captcha_id: captcha_id.filter(|id| !id.is_empty()),
            action: action.into(),
            collected: BTreeMap::new(),
        }
    }

    /// Starts the wallet-send flow at the address prompt.
    pub fn wallet_send(user_id: UserId) -> Self {
        Self::multistep(user_id, StepFlow::WalletSend)
    }

    /// Starts the task-create flow at the title prompt.
    pub fn task_create(user_id: UserId) -> Self {
        Self::multistep(user_id, StepFlow::TaskCreate)
    }

    /// Starts a multistep flow at its first step.
    pub fn multistep(user_id: UserId, flow: StepFlow) -> Self {
        Self {
            user_id,
            captcha_id: None,
            action: flow.first().into(),
            collected: BTreeMap::new(),
        }
    }

    /// Whether the expected input starts with a captcha answer.
    pub fn captcha_present(&self) -> bool {
        self.captcha_id.is_some()
    }

    /// Records the accepted value for the current action and moves on.
    ///
    /// Account actions store nothing and complete at once.
    pub fn record(&mut self, value: impl Into<String>) -> Transition {
        let Flow::Steps(step) = self.action.flow() else {
            return Transition::Complete;
        };
        self.collected.insert(step.field().to_string(), value.into());
        match step.next() {
            Some(next) => {
                self.action = next.into();
                Transition::Awaiting(next)
            }
            None => Transition::Complete,
        }
    }

    /// A collected field, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.collected.get(name).map(String::as_str)
    }
}
