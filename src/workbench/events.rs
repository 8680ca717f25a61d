//! Events drained by the workbench loop.

use crossterm::event::KeyEvent;

use crate::model::{ExecutionResult, Finding};

#[derive(Debug)]
pub enum WorkbenchEvent {
    /// User keyboard input
    Key(KeyEvent),
    /// Bracketed paste content
    Paste(String),
    /// Terminal resized; redraw only
    Resize,
    /// Editor content changed (typing, paste or snippet load)
    TextChanged(String),
    /// A lint request settled. `findings` is `None` when the call failed.
    AnalysisSettled { seq: u64, findings: Option<Vec<Finding>> },
    /// The in-flight run settled
    RunSettled(ExecutionResult),
}
