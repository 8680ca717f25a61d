//! Async event loop for the interactive workbench.

use std::io;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::ui::{render_ui, ViewState};
use crate::{
    config::Config,
    workbench::{Workbench, WorkbenchEvent},
};

/// What a key press asks the loop to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Run,
    LoadExample(String),
    ToggleHelp,
    Edit,
    Ignore,
}

/// Map a key to a workbench action. Anything unbound goes to the editor.
pub fn key_action(key: &KeyEvent) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => KeyAction::Quit,
        KeyCode::Char('r') if ctrl => KeyAction::Run,
        KeyCode::F(5) => KeyAction::Run,
        KeyCode::F(1) => KeyAction::ToggleHelp,
        KeyCode::Char(c @ '1'..='9') if alt => KeyAction::LoadExample(c.to_string()),
        _ if ctrl || alt => KeyAction::Ignore,
        _ => KeyAction::Edit,
    }
}

/// Run the interactive workbench until the user quits.
pub async fn run_workbench(cfg: &Config, initial_text: &str) -> Result<()> {
    // Check if we're in a proper terminal environment
    if !io::IsTerminal::is_terminal(&io::stdout()) {
        return Err(anyhow::anyhow!("the workbench requires a proper terminal environment"));
    }

    let (event_tx, event_rx) = mpsc::unbounded_channel::<WorkbenchEvent>();
    let mut workbench = Workbench::new(cfg, initial_text, event_tx.clone())?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut workbench, event_tx, event_rx).await;
    let restored = shut_down(&mut workbench, cfg.cleanup_grace(), || restore_terminal(&mut terminal)).await;
    result.and(restored)
}

/// Start the session cleanup, run `restore`, then wait at most `grace` for
/// the cleanup to finish. The cleanup is already in flight when `restore`
/// runs, so a failed restore cannot skip it.
pub async fn shut_down(
    workbench: &mut Workbench,
    grace: Duration,
    restore: impl FnOnce() -> Result<()>,
) -> Result<()> {
    let cleanup = workbench.teardown();
    let restored = restore();
    if let Some(cleanup) = cleanup {
        if tokio::time::timeout(grace, cleanup).await.is_err() {
            debug!("cleanup still pending at exit; abandoning it");
        }
    }
    restored
}

/// Attempt every restore step, reporting the first failure.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    let raw = disable_raw_mode();
    let paste = terminal.backend_mut().execute(DisableBracketedPaste).map(|_| ());
    let screen = terminal.backend_mut().execute(LeaveAlternateScreen).map(|_| ());
    let cursor = terminal.show_cursor();
    raw.and(paste).and(screen).and(cursor)?;
    Ok(())
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    workbench: &mut Workbench,
    event_tx: mpsc::UnboundedSender<WorkbenchEvent>,
    mut event_rx: mpsc::UnboundedReceiver<WorkbenchEvent>,
) -> Result<()> {
    // Spawn input handler
    let stop = Arc::new(AtomicBool::new(false));
    let input_stop = stop.clone();
    let input_tx = event_tx;
    let input = tokio::task::spawn_blocking(move || {
        while !input_stop.load(Ordering::Relaxed) {
            if !event::poll(Duration::from_millis(100)).unwrap_or(false) {
                continue;
            }
            let ev = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => WorkbenchEvent::Key(key),
                Ok(Event::Paste(text)) => WorkbenchEvent::Paste(text),
                Ok(Event::Resize(_, _)) => WorkbenchEvent::Resize,
                _ => continue,
            };
            if input_tx.send(ev).is_err() {
                break; // Channel closed
            }
        }
    });

    let mut view = ViewState::default();
    let result: Result<()> = loop {
        if let Err(e) = terminal.draw(|frame| render_ui(frame, workbench, &view)) {
            break Err(e.into());
        }

        let Some(ev) = event_rx.recv().await else {
            break Ok(());
        };
        match ev {
            WorkbenchEvent::Key(key) => match key_action(&key) {
                KeyAction::Quit => break Ok(()),
                KeyAction::Run => {
                    workbench.request_run();
                }
                KeyAction::LoadExample(id) => {
                    workbench.load_example(&id);
                }
                KeyAction::ToggleHelp => view.show_help = !view.show_help,
                KeyAction::Edit => {
                    if view.show_help {
                        // Any key closes the help overlay
                        view.show_help = false;
                    } else {
                        workbench.editor_mut().handle_key(key);
                    }
                }
                KeyAction::Ignore => {}
            },
            other => workbench.handle_event(other),
        }
    };

    stop.store(true, Ordering::Relaxed);
    let _ = input.await;
    info!(session = %workbench.session_id(), "workbench loop finished");
    result
}
