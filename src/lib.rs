//! Terminal code workbench: live lint feedback and remote execution against a
//! session-scoped lint/run service.

pub mod cli;
pub mod client;
pub mod config;
pub mod editor;
pub mod handlers;
pub mod logging;
pub mod model;
pub mod printer;
pub mod session;
pub mod snippets;
pub mod tui;
pub mod workbench;
