//! Session-scoped orchestrator binding editor changes, lint requests and runs.
//!
//! All state lives here and is mutated only from the loop that drains
//! [`WorkbenchEvent`]s. Remote calls run as spawned tasks that report back
//! through the same channel, so the state itself is single-writer.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Result;
use tokio::{runtime::Handle, sync::mpsc::UnboundedSender, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    client::{AnalysisClient, ExecutionClient, ServiceClient},
    config::Config,
    editor::{EditorAdapter, EditorHandle},
    model::{ExecutionResult, Finding, OutputPane, RunState},
    session::SessionId,
    snippets,
};

pub mod events;

pub use events::WorkbenchEvent;

pub struct Workbench {
    session_id: SessionId,
    editor: EditorAdapter,
    editor_handle: Option<EditorHandle>,
    source_text: String,
    findings: Vec<Finding>,
    output: OutputPane,
    run_state: RunState,
    /// Sequence number of the most recently issued lint request.
    latest_analysis: Arc<AtomicU64>,
    debounce: Duration,
    service: ServiceClient,
    analysis: AnalysisClient,
    execution: ExecutionClient,
    events: UnboundedSender<WorkbenchEvent>,
    torn_down: bool,
}

impl Workbench {
    /// Allocate the session, mount the editor with `initial_text` and wire its
    /// change listener into `events`. The seed text is analyzed like any edit.
    pub fn new(cfg: &Config, initial_text: &str, events: UnboundedSender<WorkbenchEvent>) -> Result<Self> {
        let service = ServiceClient::from_config(cfg)?;
        let analysis = AnalysisClient::new(service.clone());
        let execution = ExecutionClient::new(service.clone(), cfg.run_timeout());

        let change_tx = events.clone();
        let editor = EditorAdapter::new(move |text: &str| {
            // Receiver gone means the loop has ended; nothing left to analyze for.
            let _ = change_tx.send(WorkbenchEvent::TextChanged(text.to_string()));
        });

        let mut workbench = Self {
            session_id: SessionId::generate(),
            editor,
            editor_handle: None,
            source_text: initial_text.to_string(),
            findings: Vec::new(),
            output: OutputPane::Empty,
            run_state: RunState::Idle,
            latest_analysis: Arc::new(AtomicU64::new(0)),
            debounce: cfg.analysis_debounce(),
            service,
            analysis,
            execution,
            events,
            torn_down: false,
        };
        workbench.editor_handle = Some(workbench.editor.initialize(initial_text));
        info!(session = %workbench.session_id, api = workbench.service.base(), "workbench started");
        Ok(workbench)
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn output(&self) -> &OutputPane {
        &self.output
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    pub fn editor(&self) -> &EditorAdapter {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut EditorAdapter {
        &mut self.editor
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Apply a non-key event. Keys are mapped by the TUI before they get here.
    pub fn handle_event(&mut self, event: WorkbenchEvent) {
        match event {
            WorkbenchEvent::TextChanged(text) => self.on_edit(text),
            WorkbenchEvent::AnalysisSettled { seq, findings } => {
                self.apply_analysis(seq, findings);
            }
            WorkbenchEvent::RunSettled(result) => self.apply_run(result),
            WorkbenchEvent::Paste(text) => self.editor.paste(&text),
            WorkbenchEvent::Key(_) | WorkbenchEvent::Resize => {}
        }
    }

    /// Record the new text and issue one lint request for it.
    pub fn on_edit(&mut self, text: String) {
        self.source_text = text.clone();
        let seq = self.latest_analysis.fetch_add(1, Ordering::SeqCst) + 1;

        let latest = self.latest_analysis.clone();
        let debounce = self.debounce;
        let client = self.analysis.clone();
        let session = self.session_id.clone();
        let tx = self.events.clone();
        tokio::spawn(async move {
            if !debounce.is_zero() {
                tokio::time::sleep(debounce).await;
                if latest.load(Ordering::SeqCst) != seq {
                    debug!(seq, "lint request superseded before sending");
                    return;
                }
            }
            let findings = client.check(&text, &session).await;
            let _ = tx.send(WorkbenchEvent::AnalysisSettled { seq, findings });
        });
    }

    /// Apply a settled lint reply. Replies for anything but the latest request
    /// are dropped; a failed latest request leaves the findings untouched.
    /// Returns true when the findings were replaced.
    pub fn apply_analysis(&mut self, seq: u64, findings: Option<Vec<Finding>>) -> bool {
        let latest = self.latest_analysis.load(Ordering::SeqCst);
        if seq != latest {
            debug!(seq, latest, "dropping stale lint reply");
            return false;
        }
        match findings {
            Some(findings) => {
                self.findings = findings;
                true
            }
            None => false,
        }
    }

    /// Start a run of the current text. Returns false (and does nothing) while
    /// another run is in flight.
    pub fn request_run(&mut self) -> bool {
        if self.run_state == RunState::Running {
            debug!(session = %self.session_id, "run ignored; already running");
            return false;
        }
        if let Some(text) = self.editor.text() {
            self.source_text = text;
        }
        self.run_state = RunState::Running;
        self.output = OutputPane::Running;

        let text = self.source_text.clone();
        let client = self.execution.clone();
        let session = self.session_id.clone();
        let tx = self.events.clone();
        tokio::spawn(async move {
            let result = client.run(&text, &session).await;
            let _ = tx.send(WorkbenchEvent::RunSettled(result));
        });
        true
    }

    /// Record the run result and return to `Idle`.
    pub fn apply_run(&mut self, result: ExecutionResult) {
        if self.run_state != RunState::Running {
            warn!(session = %self.session_id, "run result arrived while idle");
        }
        self.output = OutputPane::Done(result);
        self.run_state = RunState::Idle;
    }

    /// Load a canned snippet into the editor. Unknown ids are a no-op.
    pub fn load_example(&mut self, id: &str) -> bool {
        let Some(snippet) = snippets::lookup(id) else {
            debug!(id, "unknown example id");
            return false;
        };
        info!(id = snippet.id, title = snippet.title, "loading example");
        self.editor.replace_all(snippet.code)
    }

    /// Detach the editor and send the best-effort cleanup call. Runs once;
    /// later calls return `None`. The returned task may be awaited or dropped.
    pub fn teardown(&mut self) -> Option<JoinHandle<()>> {
        if self.torn_down {
            return None;
        }
        self.torn_down = true;
        if let Some(handle) = self.editor_handle.take() {
            self.editor.dispose(handle);
        }

        let Ok(runtime) = Handle::try_current() else {
            warn!(session = %self.session_id, "no async runtime; skipping session cleanup");
            return None;
        };
        let service = self.service.clone();
        let session = self.session_id.clone();
        info!(session = %session, "tearing down workbench");
        Some(runtime.spawn(async move {
            match service.cleanup(&session).await {
                Ok(()) => debug!(session = %session, "session cleaned up"),
                Err(err) => warn!(session = %session, error = %err, "session cleanup failed"),
            }
        }))
    }
}

impl Drop for Workbench {
    fn drop(&mut self) {
        // Detached if nobody awaited an explicit teardown.
        let _ = self.teardown();
    }
}
