//! Plain-terminal printers for the one-shot modes.

use owo_colors::OwoColorize;

use crate::model::{ExecutionResult, Finding, Severity};

pub const NO_FINDINGS: &str = "No errors or warnings found!";

pub struct FindingsPrinter {
    pub color: bool,
}

impl FindingsPrinter {
    pub fn print(&self, findings: &[Finding]) {
        print!("{}", self.render(findings));
    }

    pub fn render(&self, findings: &[Finding]) -> String {
        if findings.is_empty() {
            return format!("{}\n", NO_FINDINGS);
        }
        let mut out = String::new();
        for f in findings {
            let line = f.line.map(|l| l.to_string()).unwrap_or_else(|| "-".into());
            let severity = f.severity();
            let label = format!("{:<7}", severity.as_str());
            let label = match (self.color, severity) {
                (true, Severity::Error) => label.red().to_string(),
                (true, Severity::Warning) => label.yellow().to_string(),
                (false, _) => label,
            };
            out.push_str(&format!(
                "{:>4}  {}  {:<6}  {}: {}\n",
                line,
                label,
                f.code.as_deref().unwrap_or(""),
                f.message,
                f.tip
            ));
            if !f.detail.is_empty() {
                out.push_str(&format!("      {}\n", f.detail));
            }
        }
        out
    }
}

pub struct OutputPrinter {
    pub color: bool,
}

impl OutputPrinter {
    pub fn print(&self, result: &ExecutionResult) {
        match result {
            ExecutionResult::Output(out) => {
                print!("{}", out);
                if !out.ends_with('\n') {
                    println!();
                }
            }
            ExecutionResult::Error(_) if self.color => eprintln!("{}", result.display_text().red()),
            ExecutionResult::Error(_) => eprintln!("{}", result.display_text()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty() {
        let p = FindingsPrinter { color: false };
        assert_eq!(p.render(&[]), "No errors or warnings found!\n");
    }

    #[test]
    fn test_render_rows() {
        let p = FindingsPrinter { color: false };
        let findings = vec![
            Finding {
                line: Some(3),
                message: "undefined-variable".into(),
                tip: "Undefined variable 'methodds'".into(),
                code: Some("E0602".into()),
                detail: String::new(),
            },
            Finding { line: None, message: "unused".into(), tip: "x".into(), code: None, detail: "more".into() },
        ];
        let text = p.render(&findings);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("error"));
        assert!(lines[0].contains("E0602"));
        assert!(lines[0].trim_start().starts_with('3'));
        assert!(lines[1].trim_start().starts_with('-'));
        assert!(lines[1].contains("warning"));
        assert_eq!(lines[2].trim(), "more");
    }
}
