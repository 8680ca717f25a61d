//! Interactive workbench built on Ratatui.

pub mod handler;
pub mod ui;

pub use handler::run_workbench;
