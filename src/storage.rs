use std::{fs, io::Write, path::Path};

use chrono::Utc;
use log::{debug, info, trace, warn};
use tempfile::NamedTempFile;

use crate::{normalize_title, Config, Note, NoteDraft, NotePatch, NotesError, Result};

/// Durable CRUD layer over the note collection.
///
/// The store owns the collection for the lifetime of a session and is the
/// sole reader and writer of the persisted document. Every mutation is
/// written through to disk before it returns, so callers can treat a fresh
/// `list` as the source of truth.
pub struct NoteStore {
    /// Application configuration
    config: Config,

    /// The in-memory note collection, newest insertions at the front
    notes: Vec<Note>,
}

impl NoteStore {
    /// Opens the store, loading the persisted collection.
    ///
    /// A missing, unreadable, or malformed document is treated as an empty
    /// collection; no parse failure ever surfaces to the caller. On
    /// first-ever use (empty collection) the store seeds two sample notes
    /// and persists them immediately.
    pub async fn open(config: Config) -> Self {
        info!(
            "Opening note store at {}",
            config.store_path.display()
        );

        let mut notes = load_collection(&config.store_path);

        let store = if notes.is_empty() {
            debug!("Store is empty, seeding sample notes");
            notes = seed_notes();
            let store = Self { config, notes };
            store.persist().await;
            store
        } else {
            Self { config, notes }
        };

        info!("Loaded {} notes", store.notes.len());
        store
    }

    /// The configuration this store was opened with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Lists notes ordered by most recently updated first.
    ///
    /// # Arguments
    ///
    /// * `query` - Optional filter; when non-empty, only notes whose title
    ///   or content contains it (case-insensitively) are returned
    ///
    /// # Returns
    ///
    /// Independent clones of the matching notes; mutating the result does
    /// not affect the store.
    pub async fn list(&self, query: Option<&str>) -> Result<Vec<Note>> {
        let mut items: Vec<Note> = self.notes.clone();
        // Stable sort: among equal timestamps, front-inserted notes stay first.
        items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        if let Some(query) = query.filter(|q| !q.is_empty()) {
            let needle = query.to_lowercase();
            items.retain(|n| {
                n.title.to_lowercase().contains(&needle)
                    || n.content.to_lowercase().contains(&needle)
            });
        }

        trace!("Listed {} notes", items.len());
        Ok(items)
    }

    /// Retrieves a note by its ID. Returns `None` if not found; never fails.
    pub async fn get(&self, id: &str) -> Option<Note> {
        self.notes.iter().find(|n| n.id == id).cloned()
    }

    /// Creates a new note from the draft and persists the collection.
    ///
    /// The new note is inserted at the front of the collection so it sorts
    /// first among notes with equal timestamps.
    pub async fn create(&mut self, draft: NoteDraft) -> Result<Note> {
        let note = Note::new(&draft.title, &draft.content);
        info!("Creating note: {}", note.id);

        self.notes.insert(0, note.clone());
        self.persist().await;

        Ok(note)
    }

    /// Updates an existing note, merging the patch over its current fields.
    ///
    /// Fields left unset in the patch keep their prior value. The title
    /// default rule is re-applied and `updated_at` is refreshed.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the note to update
    /// * `patch` - The fields to change
    ///
    /// # Returns
    ///
    /// The updated note, or `NoteNotFound` if the ID is absent.
    pub async fn update(&mut self, id: &str, patch: NotePatch) -> Result<Note> {
        debug!("Updating note: {}", id);

        let note = self
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| NotesError::NoteNotFound { id: id.to_string() })?;

        if let Some(title) = patch.title {
            note.title = title;
        }
        if let Some(content) = patch.content {
            note.content = content;
        }
        note.title = normalize_title(&note.title);
        note.touch();

        let updated = note.clone();
        self.persist().await;

        Ok(updated)
    }

    /// Deletes a note from the collection and persists.
    ///
    /// Returns `NoteNotFound` if the ID is absent; the collection is left
    /// unchanged in that case.
    pub async fn remove(&mut self, id: &str) -> Result<()> {
        info!("Deleting note: {}", id);

        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        if self.notes.len() == before {
            return Err(NotesError::NoteNotFound { id: id.to_string() });
        }

        self.persist().await;
        Ok(())
    }

    /// Flips the pinned flag on a note, refreshing its `updated_at`.
    pub async fn toggle_pin(&mut self, id: &str) -> Result<Note> {
        debug!("Toggling pin on note: {}", id);

        let note = self
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| NotesError::NoteNotFound { id: id.to_string() })?;

        note.pinned = !note.pinned;
        note.touch();

        let updated = note.clone();
        self.persist().await;

        Ok(updated)
    }

    /// Writes the collection to disk using an atomic temp-file rename.
    ///
    /// Write failures are logged and swallowed: the in-memory collection
    /// stays authoritative for the current session, but the change is not
    /// guaranteed durable. This mirrors the quota/private-mode behavior of
    /// the storage layer this store models.
    async fn persist(&self) {
        if let Err(e) = self.write_collection() {
            warn!(
                "Failed to persist notes to {}: {} (changes kept in memory only)",
                self.config.store_path.display(),
                e
            );
        }
    }

    fn write_collection(&self) -> Result<()> {
        let path = &self.config.store_path;
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                debug!("Creating store directory: {}", parent.display());
                fs::create_dir_all(parent)?;
            }
        }

        // Write to a temporary file in the same directory, then rename, so a
        // crash mid-write never corrupts the collection.
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut temp_file = NamedTempFile::new_in(dir)?;

        let json = serde_json::to_string_pretty(&self.notes)?;
        temp_file.write_all(json.as_bytes())?;
        temp_file.flush()?;
        temp_file.persist(path).map_err(|e| NotesError::Io(e.error))?;

        trace!("Persisted {} notes", self.notes.len());
        Ok(())
    }
}

/// Loads the persisted collection, degrading to empty on any failure.
fn load_collection(path: &Path) -> Vec<Note> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            debug!("No readable store at {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(notes) => notes,
        Err(e) => {
            warn!(
                "Malformed store at {}: {} (treating as empty)",
                path.display(),
                e
            );
            Vec::new()
        }
    }
}

/// The two fixed sample notes seeded on first use.
///
/// Both carry the same initialization timestamp, so the seeded order is
/// preserved by the stable `updated_at` sort.
fn seed_notes() -> Vec<Note> {
    let now = Utc::now();
    let mut welcome = Note::new(
        "Welcome to Notes",
        "This is your first note. Feel free to edit or delete it.",
    );
    let mut theme = Note::new(
        "Ocean Professional Theme",
        "Blue primary (#2563EB) with amber accents (#F59E0B).",
    );
    for note in [&mut welcome, &mut theme] {
        note.created_at = now;
        note.updated_at = now;
    }
    vec![welcome, theme]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> Config {
        Config::with_store_path(dir.path().join(crate::STORE_FILE))
    }

    async fn open_empty_store(dir: &TempDir) -> NoteStore {
        let mut store = NoteStore::open(test_config(dir)).await;
        let seeded = store.list(None).await.unwrap();
        for note in seeded {
            store.remove(&note.id).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_first_use_seeds_sample_notes() {
        let dir = TempDir::new().unwrap();
        let store = NoteStore::open(test_config(&dir)).await;

        let notes = store.list(None).await.unwrap();
        assert_eq!(notes.len(), 2);

        let titles: Vec<&str> = notes.iter().map(|n| n.title.as_str()).collect();
        assert!(titles.contains(&"Welcome to Notes"));
        assert!(titles.contains(&"Ocean Professional Theme"));
        assert!(notes.iter().all(|n| !n.pinned));

        // Seeding persists immediately: a second store sees the same notes.
        let reopened = NoteStore::open(test_config(&dir)).await;
        assert_eq!(reopened.list(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_store_treated_as_empty() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        fs::write(&config.store_path, "not json {").unwrap();

        let store = NoteStore::open(config).await;
        // Degraded to empty, then re-seeded.
        assert_eq!(store.list(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_and_get_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut store = open_empty_store(&dir).await;

        let note = store
            .create(NoteDraft {
                title: "T".to_string(),
                content: "C".to_string(),
            })
            .await
            .unwrap();

        let fetched = store.get(&note.id).await.unwrap();
        assert_eq!(fetched.title, "T");
        assert_eq!(fetched.content, "C");
        assert_eq!(fetched.created_at, fetched.updated_at);
        assert!(!fetched.pinned);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let dir = TempDir::new().unwrap();
        let store = NoteStore::open(test_config(&dir)).await;

        assert!(store.get("no-such-id").await.is_none());
    }

    #[tokio::test]
    async fn test_blank_title_defaults_to_untitled() {
        let dir = TempDir::new().unwrap();
        let mut store = open_empty_store(&dir).await;

        let note = store
            .create(NoteDraft {
                title: "   ".to_string(),
                content: String::new(),
            })
            .await
            .unwrap();

        assert_eq!(note.title, "Untitled");
    }

    #[tokio::test]
    async fn test_list_ordering_non_increasing() {
        let dir = TempDir::new().unwrap();
        let mut store = open_empty_store(&dir).await;

        for i in 1..=3 {
            store
                .create(NoteDraft {
                    title: format!("Note {}", i),
                    content: String::new(),
                })
                .await
                .unwrap();
        }

        // Touch the oldest so ordering reflects updates, not creation.
        let notes = store.list(None).await.unwrap();
        let oldest = notes.last().unwrap().id.clone();
        store
            .update(
                &oldest,
                NotePatch {
                    content: Some("bumped".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let notes = store.list(None).await.unwrap();
        assert_eq!(notes[0].id, oldest);
        for pair in notes.windows(2) {
            assert!(pair[0].updated_at >= pair[1].updated_at);
        }
    }

    #[tokio::test]
    async fn test_update_preserves_unspecified_fields() {
        let dir = TempDir::new().unwrap();
        let mut store = open_empty_store(&dir).await;

        let note = store
            .create(NoteDraft {
                title: "T".to_string(),
                content: "old".to_string(),
            })
            .await
            .unwrap();

        let updated = store
            .update(
                &note.id,
                NotePatch {
                    title: None,
                    content: Some("X".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "T");
        assert_eq!(updated.content, "X");
        assert!(updated.updated_at > note.updated_at);
        assert_eq!(updated.created_at, note.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_note_fails() {
        let dir = TempDir::new().unwrap();
        let mut store = NoteStore::open(test_config(&dir)).await;

        let result = store.update("no-such-id", NotePatch::default()).await;
        assert!(matches!(result, Err(NotesError::NoteNotFound { .. })));
    }

    #[tokio::test]
    async fn test_remove_is_not_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut store = open_empty_store(&dir).await;

        let note = store
            .create(NoteDraft {
                title: "gone".to_string(),
                content: String::new(),
            })
            .await
            .unwrap();

        store.remove(&note.id).await.unwrap();
        assert!(store.list(None).await.unwrap().is_empty());

        // Second removal fails and leaves the collection unchanged.
        let second = store.remove(&note.id).await;
        assert!(matches!(second, Err(NotesError::NoteNotFound { .. })));
        assert!(store.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_pin_flips_and_touches() {
        let dir = TempDir::new().unwrap();
        let mut store = open_empty_store(&dir).await;

        let note = store
            .create(NoteDraft {
                title: "pinned".to_string(),
                content: String::new(),
            })
            .await
            .unwrap();

        let pinned = store.toggle_pin(&note.id).await.unwrap();
        assert!(pinned.pinned);
        assert!(pinned.updated_at > note.updated_at);

        let unpinned = store.toggle_pin(&note.id).await.unwrap();
        assert!(!unpinned.pinned);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let dir = TempDir::new().unwrap();
        let store = NoteStore::open(test_config(&dir)).await;

        // The seeded theme note matches on title, the welcome note does not
        // (its content has no "ocean").
        let results = store.list(Some("ocean")).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Ocean Professional Theme");

        // Content matches too.
        let results = store.list(Some("amber")).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Ocean Professional Theme");

        let results = store.list(Some("nonexistent")).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_mutations_survive_reopen() {
        let dir = TempDir::new().unwrap();

        let created = {
            let mut store = open_empty_store(&dir).await;
            store
                .create(NoteDraft {
                    title: "durable".to_string(),
                    content: "body".to_string(),
                })
                .await
                .unwrap()
        };

        let store = NoteStore::open(test_config(&dir)).await;
        let notes = store.list(None).await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, created.id);
        assert_eq!(notes[0].content, "body");
    }
}
