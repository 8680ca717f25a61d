//! Editor adapter: the narrow seam between the orchestrator and the editing widget.
//!
//! The orchestrator only sees `initialize`, the change listener, `replace_all`
//! and `dispose`. Every content change, whether typed, pasted or loaded from a
//! snippet, goes through the same listener with the full current text.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

pub mod buffer;

pub use buffer::TextBuffer;

/// Callback receiving the full text after every change.
pub type ChangeListener = Box<dyn FnMut(&str) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorHandle(u64);

struct Mounted {
    handle: EditorHandle,
    buffer: TextBuffer,
}

pub struct EditorAdapter {
    mounted: Option<Mounted>,
    on_change: ChangeListener,
    next_handle: u64,
    focused: bool,
}

impl EditorAdapter {
    pub fn new(on_change: impl FnMut(&str) + Send + 'static) -> Self {
        Self { mounted: None, on_change: Box::new(on_change), next_handle: 1, focused: false }
    }

    /// Mount the widget seeded with `initial_text`. While a widget is live this
    /// is a no-op returning the existing handle.
    pub fn initialize(&mut self, initial_text: &str) -> EditorHandle {
        if let Some(m) = &self.mounted {
            debug!(handle = m.handle.0, "editor already mounted");
            return m.handle;
        }
        let handle = EditorHandle(self.next_handle);
        self.next_handle += 1;
        self.mounted = Some(Mounted { handle, buffer: TextBuffer::new(initial_text) });
        self.focused = true;
        debug!(handle = handle.0, "editor mounted");
        self.notify();
        handle
    }

    /// Overwrite the content and focus the widget. Fires the change listener.
    /// Returns false when no widget is mounted.
    pub fn replace_all(&mut self, text: &str) -> bool {
        let Some(m) = self.mounted.as_mut() else {
            debug!("replace_all without a mounted editor");
            return false;
        };
        m.buffer.set_text(text);
        self.focused = true;
        self.notify();
        true
    }

    /// Detach the widget. Tolerates a handle that is stale or already disposed.
    pub fn dispose(&mut self, handle: EditorHandle) {
        match &self.mounted {
            Some(m) if m.handle == handle => {
                self.mounted = None;
                self.focused = false;
                debug!(handle = handle.0, "editor disposed");
            }
            _ => debug!(handle = handle.0, "dispose: editor not mounted"),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Number of live widget instances (zero or one).
    pub fn live_instances(&self) -> usize {
        usize::from(self.mounted.is_some())
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn buffer(&self) -> Option<&TextBuffer> {
        self.mounted.as_ref().map(|m| &m.buffer)
    }

    pub fn text(&self) -> Option<String> {
        self.buffer().map(TextBuffer::text)
    }

    /// Apply an editing key. Returns true when the key was consumed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let Some(m) = self.mounted.as_mut() else {
            return false;
        };
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return false;
        }
        let buf = &mut m.buffer;
        let changed = match key.code {
            KeyCode::Char(c) => {
                buf.insert_char(c);
                true
            }
            KeyCode::Enter => {
                buf.insert_newline();
                true
            }
            KeyCode::Tab => {
                buf.insert_tab();
                true
            }
            KeyCode::Backspace => buf.backspace(),
            KeyCode::Delete => buf.delete(),
            KeyCode::Left => {
                buf.move_left();
                false
            }
            KeyCode::Right => {
                buf.move_right();
                false
            }
            KeyCode::Up => {
                buf.move_up();
                false
            }
            KeyCode::Down => {
                buf.move_down();
                false
            }
            KeyCode::Home => {
                buf.move_home();
                false
            }
            KeyCode::End => {
                buf.move_end();
                false
            }
            _ => return false,
        };
        if changed {
            self.notify();
        }
        true
    }

    /// Insert pasted text as one change.
    pub fn paste(&mut self, text: &str) {
        let Some(m) = self.mounted.as_mut() else {
            return;
        };
        if text.is_empty() {
            return;
        }
        m.buffer.insert_str(text);
        self.notify();
    }

    fn notify(&mut self) {
        if let Some(m) = &self.mounted {
            let text = m.buffer.text();
            (self.on_change)(&text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording() -> (EditorAdapter, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let editor = EditorAdapter::new(move |text: &str| sink.lock().unwrap().push(text.to_string()));
        (editor, seen)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let (mut editor, seen) = recording();
        let first = editor.initialize("print(1)");
        let second = editor.initialize("print(2)");
        assert_eq!(first, second);
        assert_eq!(editor.live_instances(), 1);
        assert_eq!(editor.text().as_deref(), Some("print(1)"));
        assert_eq!(seen.lock().unwrap().as_slice(), ["print(1)"]);
    }

    #[test]
    fn test_every_edit_notifies_with_full_text() {
        let (mut editor, seen) = recording();
        editor.initialize("");
        editor.handle_key(key(KeyCode::Char('a')));
        editor.handle_key(key(KeyCode::Char('b')));
        editor.handle_key(key(KeyCode::Backspace));
        assert_eq!(seen.lock().unwrap().as_slice(), ["", "a", "ab", "a"]);
    }

    #[test]
    fn test_cursor_moves_do_not_notify() {
        let (mut editor, seen) = recording();
        editor.initialize("x");
        assert!(editor.handle_key(key(KeyCode::Right)));
        assert!(editor.handle_key(key(KeyCode::Left)));
        // Backspace at the very start changes nothing.
        assert!(editor.handle_key(key(KeyCode::Backspace)));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_modified_keys_are_not_consumed() {
        let (mut editor, _) = recording();
        editor.initialize("");
        assert!(!editor.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL)));
        assert!(!editor.handle_key(KeyEvent::new(KeyCode::Char('1'), KeyModifiers::ALT)));
        assert_eq!(editor.text().as_deref(), Some(""));
    }

    #[test]
    fn test_replace_all_notifies_and_focuses() {
        let (mut editor, seen) = recording();
        editor.initialize("old");
        assert!(editor.replace_all("print(45**123)"));
        assert!(editor.is_focused());
        assert_eq!(editor.text().as_deref(), Some("print(45**123)"));
        assert_eq!(seen.lock().unwrap().last().map(String::as_str), Some("print(45**123)"));
    }

    #[test]
    fn test_replace_all_without_mount() {
        let (mut editor, seen) = recording();
        assert!(!editor.replace_all("x"));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_dispose_tolerates_repeats() {
        let (mut editor, _) = recording();
        let handle = editor.initialize("x");
        editor.dispose(handle);
        editor.dispose(handle);
        assert!(!editor.is_mounted());
        assert_eq!(editor.live_instances(), 0);
        assert!(!editor.handle_key(key(KeyCode::Char('a'))));
    }

    #[test]
    fn test_remount_after_dispose_gets_new_handle() {
        let (mut editor, _) = recording();
        let first = editor.initialize("a");
        editor.dispose(first);
        let second = editor.initialize("b");
        assert_ne!(first, second);
        // The stale handle no longer detaches the new widget.
        editor.dispose(first);
        assert!(editor.is_mounted());
    }

    #[test]
    fn test_paste_is_one_change() {
        let (mut editor, seen) = recording();
        editor.initialize("");
        editor.paste("for i in range(5):\n    print(i)\n");
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], "for i in range(5):\n    print(i)\n");
    }
}
