//! Dialogue controller - per-user conversation state machine.
//!
//! `DialogueController` is split by flow:
//!
//! - `controller` - construction, `/start`, free-text dispatch
//! - `account` - register / auth / restore
//! - `menu` - buttons of a signed-in user
//! - `multistep` - wallet-send and task-create steps

mod account;
mod controller;
mod menu;
mod multistep;

#[cfg(test)]
mod test_support;

pub use controller::{DialogueController, DialogueResult};
pub use menu::TASK_LIST_LIMIT;
pub use multistep::step_prompt;
