//! Data model shared by the clients, the orchestrator and the presentation.

use std::fmt;

/// Placeholder shown when a run completes without printing anything.
pub const NO_OUTPUT: &str = "No output";
/// Transient output shown while a run is in flight.
pub const RUNNING: &str = "Running...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    /// `E`-prefixed codes are errors; everything else, including a missing code, is a warning.
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some(c) if c.starts_with('E') => Severity::Error,
            _ => Severity::Warning,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of lint feedback tied to a source line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Finding {
    /// 1-based line number, absent when the service did not send a usable one.
    pub line: Option<u32>,
    /// Short symbolic description, e.g. `undefined-variable`.
    pub message: String,
    /// Remediation hint.
    pub tip: String,
    /// Rule code, e.g. `E0602`.
    pub code: Option<String>,
    /// Extended explanation of the rule.
    pub detail: String,
}

impl Finding {
    pub fn severity(&self) -> Severity {
        Severity::from_code(self.code.as_deref())
    }
}

/// Result of one run: captured output or a failure message, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    Output(String),
    Error(String),
}

impl ExecutionResult {
    pub fn is_error(&self) -> bool {
        matches!(self, ExecutionResult::Error(_))
    }

    /// Text as presented to the user; errors carry an `Error: ` prefix.
    pub fn display_text(&self) -> String {
        match self {
            ExecutionResult::Output(out) => out.clone(),
            ExecutionResult::Error(msg) => format!("Error: {}", msg),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
}

/// What the output pane currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputPane {
    #[default]
    Empty,
    Running,
    Done(ExecutionResult),
}

impl OutputPane {
    pub fn result(&self) -> Option<&ExecutionResult> {
        match self {
            OutputPane::Done(result) => Some(result),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_from_code() {
        assert_eq!(Severity::from_code(Some("E0001")), Severity::Error);
        assert_eq!(Severity::from_code(Some("W0612")), Severity::Warning);
        assert_eq!(Severity::from_code(Some("")), Severity::Warning);
        assert_eq!(Severity::from_code(None), Severity::Warning);
        // Only an uppercase leading E counts.
        assert_eq!(Severity::from_code(Some("e0001")), Severity::Warning);
    }

    #[test]
    fn test_finding_severity_uses_code() {
        let finding = Finding { code: Some("E0602".into()), ..Default::default() };
        assert_eq!(finding.severity(), Severity::Error);
        assert_eq!(Finding::default().severity(), Severity::Warning);
    }

    #[test]
    fn test_error_display_is_prefixed() {
        let err = ExecutionResult::Error("boom".into());
        assert!(err.is_error());
        assert_eq!(err.display_text(), "Error: boom");
        assert_eq!(ExecutionResult::Output("hi\n".into()).display_text(), "hi\n");
    }
}
