//! Per-user dialogue: what step a user is on, what has been collected,
//! how free text is parsed and what the user sees next.

mod action;
mod errors;
pub mod grammar;
pub mod menu;
mod reply;
mod state;

pub use action::AccountAction;
pub use errors::DialogueError;
pub use grammar::{grammar_for, parse_step_input, Field, Grammar, ParseError, ParsedInput};
pub use menu::MenuKey;
pub use reply::{escape_html, Button, Keyboard, Reply, TextFormat};
pub use state::{fields, DialogueAction, DialogueState, Flow, Step, StepFlow, Transition};
