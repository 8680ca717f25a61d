//! UI layout and rendering logic for the TUI.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::{
    model::{ExecutionResult, OutputPane, Severity, RUNNING},
    printer::NO_FINDINGS,
    snippets,
    workbench::Workbench,
};

/// Presentation-only state owned by the loop.
#[derive(Debug, Default)]
pub struct ViewState {
    pub show_help: bool,
}

/// Render the main UI
pub fn render_ui(frame: &mut Frame, workbench: &Workbench, view: &ViewState) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),      // Examples bar
            Constraint::Min(6),         // Editor + output
            Constraint::Percentage(30), // Findings
            Constraint::Length(1),      // Status bar
        ])
        .split(frame.area());

    let work_area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(main_layout[1]);

    render_examples_bar(frame, main_layout[0]);
    render_editor(frame, workbench, work_area[0]);
    render_output(frame, workbench, work_area[1]);
    render_findings(frame, workbench, main_layout[2]);
    render_status_bar(frame, workbench, main_layout[3]);

    if view.show_help {
        render_help_overlay(frame);
    }
}

fn render_examples_bar(frame: &mut Frame, area: Rect) {
    let mut spans = vec![Span::styled("Examples: ", Style::default().add_modifier(Modifier::BOLD))];
    for s in snippets::all() {
        spans.push(Span::styled(format!("Alt+{}", s.id), Style::default().fg(Color::Cyan)));
        spans.push(Span::raw(format!(" {}  ", s.title)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the editor with a line-number gutter and place the terminal cursor.
fn render_editor(frame: &mut Frame, workbench: &Workbench, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Editor (Python)");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(buffer) = workbench.editor().buffer() else {
        return;
    };
    let (row, col) = buffer.cursor();
    let height = inner.height as usize;
    let top = if height > 0 && row >= height { row + 1 - height } else { 0 };
    let gutter = buffer.lines().len().to_string().len().max(2);

    let lines: Vec<Line> = buffer
        .lines()
        .iter()
        .enumerate()
        .skip(top)
        .take(height)
        .map(|(i, text)| {
            Line::from(vec![
                Span::styled(format!("{:>width$} ", i + 1, width = gutter), Style::default().fg(Color::DarkGray)),
                Span::raw(text.clone()),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(Text::from(lines)), inner);

    if workbench.editor().is_focused() {
        let before: String = buffer.lines()[row].chars().take(col).collect();
        let x = inner.x as usize + gutter + 1 + before.width();
        let y = inner.y as usize + row - top;
        if x < (inner.x + inner.width) as usize && y < (inner.y + inner.height) as usize {
            frame.set_cursor_position((x as u16, y as u16));
        }
    }
}

fn render_output(frame: &mut Frame, workbench: &Workbench, area: Rect) {
    let (text, style) = match workbench.output() {
        OutputPane::Empty => (String::new(), Style::default()),
        OutputPane::Running => (RUNNING.to_string(), Style::default().fg(Color::Yellow)),
        OutputPane::Done(result @ ExecutionResult::Output(_)) => (result.display_text(), Style::default()),
        OutputPane::Done(result @ ExecutionResult::Error(_)) => {
            (result.display_text(), Style::default().fg(Color::Red))
        }
    };

    let paragraph = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title("Output"))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        Severity::Warning => Style::default().fg(Color::Yellow),
    }
}

fn render_findings(frame: &mut Frame, workbench: &Workbench, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Lint Output");
    let findings = workbench.findings();

    if findings.is_empty() {
        let paragraph = Paragraph::new(NO_FINDINGS).style(Style::default().fg(Color::Green)).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(["Line", "Severity", "Error", "Tips", "Code", "Info"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = findings.iter().map(|f| {
        let severity = f.severity();
        Row::new(vec![
            Cell::from(f.line.map(|l| l.to_string()).unwrap_or_else(|| "-".into())),
            Cell::from(severity.as_str()).style(severity_style(severity)),
            Cell::from(f.message.clone()),
            Cell::from(f.tip.clone()),
            Cell::from(f.code.clone().unwrap_or_default()),
            Cell::from(f.detail.clone()),
        ])
    });
    let widths = [
        Constraint::Length(5),
        Constraint::Length(8),
        Constraint::Percentage(18),
        Constraint::Percentage(32),
        Constraint::Length(6),
        Constraint::Min(10),
    ];
    let table = Table::new(rows, widths).header(header).block(block).column_spacing(1);
    frame.render_widget(table, area);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, workbench: &Workbench, area: Rect) {
    let state = if workbench.is_running() { RUNNING } else { "Ctrl+R run" };
    let status_text = format!(
        "Session {} | {} | {} finding(s) | F1 help | Ctrl+Q quit",
        workbench.session_id().short(),
        state,
        workbench.findings().len()
    );
    let status_paragraph =
        Paragraph::new(status_text).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(status_paragraph, area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame) {
    let popup_area = centered_rect(60, 60, frame.area());

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let help_lines = vec![
        Line::from("Workbench Help"),
        Line::from(""),
        Line::from("  Ctrl+R / F5  - Run the code (disabled while running)"),
        Line::from("  Alt+1..7     - Load a canned example"),
        Line::from("  Arrows       - Move the cursor"),
        Line::from("  Tab          - Indent (4 spaces)"),
        Line::from("  F1           - Toggle this help"),
        Line::from("  Ctrl+Q       - Quit"),
        Line::from(""),
        Line::from("Every edit is linted; the table below the editor shows the latest result."),
    ];

    let help = Paragraph::new(help_lines)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: false });
    frame.render_widget(help, popup_area);
}

/// Helper function to create a centered rect using up certain percentage of the available rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, model::Finding};
    use ratatui::{backend::TestBackend, Terminal};
    use tokio::sync::mpsc;

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        let mut out = String::new();
        for row in buffer.content.chunks(width) {
            for cell in row {
                out.push_str(cell.symbol());
            }
            out.push('\n');
        }
        out
    }

    fn workbench(text: &str) -> Workbench {
        let (tx, _rx) = mpsc::unbounded_channel();
        let cfg = Config::from_pairs([("API_BASE", "http://127.0.0.1:9")]);
        Workbench::new(&cfg, text, tx).unwrap()
    }

    #[tokio::test]
    async fn test_renders_editor_and_empty_findings() {
        let wb = workbench("print('hi')\n");
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render_ui(f, &wb, &ViewState::default())).unwrap();
        let text = screen(&terminal);
        assert!(text.contains("print('hi')"));
        assert!(text.contains(NO_FINDINGS));
        assert!(text.contains(wb.session_id().short()));
    }

    #[tokio::test]
    async fn test_renders_findings_and_error_output() {
        let mut wb = workbench("x\n");
        wb.on_edit("x\n".into());
        wb.apply_analysis(
            1,
            Some(vec![Finding {
                line: Some(1),
                message: "undefined-variable".into(),
                tip: "Undefined variable 'x'".into(),
                code: Some("E0602".into()),
                detail: String::new(),
            }]),
        );
        wb.request_run();
        wb.apply_run(ExecutionResult::Error("NameError".into()));

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| render_ui(f, &wb, &ViewState::default())).unwrap();
        let text = screen(&terminal);
        assert!(text.contains("E0602"));
        assert!(text.contains("error"));
        assert!(text.contains("Error: NameError"));
    }

    #[tokio::test]
    async fn test_help_overlay() {
        let wb = workbench("");
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render_ui(f, &wb, &ViewState { show_help: true })).unwrap();
        assert!(screen(&terminal).contains("Workbench Help"));
    }
}
