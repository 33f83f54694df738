//! Symbio Bot - chat front-end for the Symbio account, wallet and task API
//!
//! This crate implements a per-user conversation state machine that turns
//! button presses and free text into calls against a remote REST service.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
