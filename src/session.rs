//! Session layer bridging presentation and the note store.
//!
//! The session owns the "current view" state derived from the store: the
//! visible note snapshot, the search query, the selection, and the loading,
//! error, and unsaved-edit flags. Presentation code reads this state and
//! invokes the operations here; it never talks to the store directly.

use std::sync::Arc;

use log::{debug, info};
use tokio::sync::Mutex;

use crate::{Debouncer, Note, NoteDraft, NotePatch, NoteStore, Result};

/// Confirmation capability injected into the session.
///
/// Called with a human-readable message whenever a destructive transition
/// needs user consent; returns whether the user confirmed. Interactive
/// front-ends prompt; tests substitute a deterministic closure.
pub type ConfirmFn = Box<dyn Fn(&str) -> bool + Send + Sync>;

const DISCARD_PROMPT: &str = "You have unsaved changes. Discard them?";

/// Stateful coordinator exposing UI-facing derived state and guarded
/// mutation operations over a [`NoteStore`].
///
/// Every mutating operation follows the same sequence: clear the previous
/// error, invoke the store, reload the list with the current query so the
/// exposed snapshot reflects store truth, re-derive the selection, and
/// clear the dirty flag. On failure the error message is recorded and the
/// rest of the state is left unchanged.
pub struct NotesSession {
    /// The note storage backend
    store: NoteStore,

    /// Snapshot of the notes visible under the current query
    notes: Vec<Note>,

    /// Current search query
    query: String,

    /// ID of the selected note, if any
    selected_id: Option<String>,

    /// Whether a reload is in flight
    loading: bool,

    /// Message of the most recent failure, cleared by the next operation
    error: Option<String>,

    /// Whether the editor holds unsaved changes
    dirty: bool,

    /// Injected confirmation capability for the unsaved-changes guard
    confirm: ConfirmFn,
}

impl NotesSession {
    /// Opens a session over the store and performs the initial reload.
    pub async fn open(store: NoteStore, confirm: ConfirmFn) -> Self {
        let mut session = Self {
            store,
            notes: Vec::new(),
            query: String::new(),
            selected_id: None,
            loading: false,
            error: None,
            dirty: false,
            confirm,
        };
        session.reload().await;
        session
    }

    /// The notes snapshot for the current query, most recently updated first.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// The current search query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The selected note's ID, if any.
    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    /// Whether a reload is in flight.
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// The most recent failure message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the editor holds unsaved changes.
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    /// The selected note from the current snapshot, if any.
    pub fn selected_note(&self) -> Option<&Note> {
        let id = self.selected_id.as_deref()?;
        self.notes.iter().find(|n| n.id == id)
    }

    /// Marks or clears the unsaved-edit flag on behalf of the editor.
    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// Replaces the search query without reloading.
    ///
    /// Callers follow up with [`reload`](Self::reload), directly or through
    /// the debounced [`SessionHandle::set_query`].
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    /// Reloads the notes snapshot for the current query and re-derives the
    /// selection.
    ///
    /// If nothing is selected and the results are non-empty, the first
    /// (most recently updated) note is selected. If the current selection
    /// no longer exists in the results, it falls back to the new first
    /// result or to none. Otherwise the selection is kept.
    pub async fn reload(&mut self) {
        self.loading = true;
        self.error = None;

        let query = if self.query.is_empty() {
            None
        } else {
            Some(self.query.as_str())
        };

        match self.store.list(query).await {
            Ok(list) => {
                match &self.selected_id {
                    None if !list.is_empty() => {
                        self.selected_id = Some(list[0].id.clone());
                    }
                    Some(id) if !list.iter().any(|n| &n.id == id) => {
                        self.selected_id = list.first().map(|n| n.id.clone());
                    }
                    _ => {}
                }
                self.notes = list;
            }
            Err(e) => {
                debug!("Reload failed: {}", e);
                self.error = Some(e.to_string());
            }
        }

        self.loading = false;
    }

    /// Changes the selection, honoring the unsaved-changes guard.
    ///
    /// When the editor is dirty, the injected confirmation capability is
    /// consulted first; a declined confirmation leaves the selection and
    /// the dirty flag untouched and returns false.
    pub fn select(&mut self, id: &str) -> bool {
        if self.dirty && !(self.confirm)(DISCARD_PROMPT) {
            debug!("Selection change declined, unsaved edits kept");
            return false;
        }

        self.dirty = false;
        self.selected_id = Some(id.to_string());
        true
    }

    /// Creates a note with default content and selects it.
    ///
    /// Returns the created note, or None with the error recorded.
    pub async fn create(&mut self) -> Option<Note> {
        self.error = None;

        let draft = NoteDraft {
            title: "New note".to_string(),
            content: String::new(),
        };

        match self.store.create(draft).await {
            Ok(note) => {
                info!("Created note {}", note.id);
                self.reload().await;
                self.selected_id = Some(note.id.clone());
                self.dirty = false;
                Some(note)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    /// Saves a patch over an existing note and selects it.
    ///
    /// Returns the updated note, or None with the error recorded and the
    /// prior selection and snapshot unchanged.
    pub async fn update(&mut self, id: &str, patch: NotePatch) -> Option<Note> {
        self.error = None;

        match self.store.update(id, patch).await {
            Ok(note) => {
                self.reload().await;
                self.selected_id = Some(note.id.clone());
                self.dirty = false;
                Some(note)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    /// Removes a note; if it was selected, the selection falls back to the
    /// first remaining note or to none.
    pub async fn remove(&mut self, id: &str) -> bool {
        self.error = None;

        match self.store.remove(id).await {
            Ok(()) => {
                self.reload().await;
                self.dirty = false;
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }

    /// Flips the pinned flag on a note.
    ///
    /// Exposed transitively from the store for future use; the session does
    /// not yet coordinate a reload for it.
    pub async fn toggle_pin(&mut self, id: &str) -> Result<Note> {
        self.store.toggle_pin(id).await
    }

    /// The underlying store, for read-only diagnostics.
    pub fn store(&self) -> &NoteStore {
        &self.store
    }
}

/// Shared handle over a session, adding debounced search.
///
/// The session runs under a mutex so that the debounced reload task and the
/// front-end never interleave mid-operation; each operation runs to
/// completion before the next begins.
pub struct SessionHandle {
    inner: Arc<Mutex<NotesSession>>,
    debouncer: Debouncer,
}

impl SessionHandle {
    /// Opens a session over the store and wraps it for sharing.
    pub async fn open(store: NoteStore, confirm: ConfirmFn) -> Self {
        let debounce = store.config().debounce();
        let session = NotesSession::open(store, confirm).await;

        Self {
            inner: Arc::new(Mutex::new(session)),
            debouncer: Debouncer::new(debounce),
        }
    }

    /// The shared session.
    pub fn session(&self) -> Arc<Mutex<NotesSession>> {
        Arc::clone(&self.inner)
    }

    /// Updates the search query and schedules a debounced reload.
    ///
    /// The query field changes immediately; the reload fires once the quiet
    /// window elapses without another change. The scheduled task holds only
    /// a weak reference, so a dropped session is never acted upon.
    pub async fn set_query(&mut self, query: &str) {
        self.inner.lock().await.set_query(query);

        let weak = Arc::downgrade(&self.inner);
        self.debouncer.schedule(async move {
            match weak.upgrade() {
                Some(session) => session.lock().await.reload().await,
                None => debug!("Session torn down before debounced reload fired"),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, NotesError};
    use tempfile::TempDir;

    fn accept_all() -> ConfirmFn {
        Box::new(|_| true)
    }

    async fn open_session(dir: &TempDir, confirm: ConfirmFn) -> NotesSession {
        let config = Config::with_store_path(dir.path().join(crate::STORE_FILE));
        let store = NoteStore::open(config).await;
        NotesSession::open(store, confirm).await
    }

    #[tokio::test]
    async fn test_initial_reload_selects_first_note() {
        let dir = TempDir::new().unwrap();
        let session = open_session(&dir, accept_all()).await;

        assert_eq!(session.notes().len(), 2);
        assert!(!session.loading());
        assert!(session.error().is_none());
        assert_eq!(session.selected_id(), Some(session.notes()[0].id.as_str()));
        assert_eq!(
            session.selected_note().unwrap().id,
            session.notes()[0].id
        );
    }

    #[tokio::test]
    async fn test_update_missing_note_records_error() {
        let dir = TempDir::new().unwrap();
        let mut session = open_session(&dir, accept_all()).await;

        let selected_before = session.selected_id().map(str::to_string);
        let notes_before = session.notes().len();

        let result = session.update("no-such-id", NotePatch::default()).await;
        assert!(result.is_none());
        assert!(session.error().unwrap().contains("Note not found"));
        assert_eq!(session.selected_id(), selected_before.as_deref());
        assert_eq!(session.notes().len(), notes_before);
    }

    #[tokio::test]
    async fn test_remove_missing_note_records_error() {
        let dir = TempDir::new().unwrap();
        let mut session = open_session(&dir, accept_all()).await;

        assert!(!session.remove("no-such-id").await);
        assert!(session.error().unwrap().contains("Note not found"));

        // The next successful operation clears the error.
        assert!(session.create().await.is_some());
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn test_toggle_pin_passthrough() {
        let dir = TempDir::new().unwrap();
        let mut session = open_session(&dir, accept_all()).await;

        let id = session.notes()[0].id.clone();
        let pinned = session.toggle_pin(&id).await.unwrap();
        assert!(pinned.pinned);

        let missing = session.toggle_pin("no-such-id").await;
        assert!(matches!(missing, Err(NotesError::NoteNotFound { .. })));
    }
}
