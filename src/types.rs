//! Shared types for the ocean-notes application.
//!
//! This module contains the Result alias, the request shapes consumed by the
//! store, and the CLI command structure.

use clap::Subcommand;

use crate::NotesError;

/// A specialized Result type for ocean-notes operations.
pub type Result<T> = std::result::Result<T, NotesError>;

/// Input to the store's create operation.
#[derive(Debug, Clone, Default)]
pub struct NoteDraft {
    /// Title of the new note; blank titles default to "Untitled"
    pub title: String,
    /// Body of the new note; may be empty
    pub content: String,
}

/// Partial update applied over an existing note.
///
/// Fields left as `None` keep their prior value.
#[derive(Debug, Clone, Default)]
pub struct NotePatch {
    /// New title, if any
    pub title: Option<String>,
    /// New content, if any
    pub content: Option<String>,
}

/// Available subcommands for the ocean-notes application
#[derive(Subcommand)]
pub enum Commands {
    /// Create a new note
    Create {
        /// Title of the note
        #[clap(short = 'T', long)]
        title: Option<String>,

        /// Content of the note
        #[clap(short, long)]
        content: Option<String>,
    },

    /// View a note by ID
    View {
        /// ID of the note to view
        id: String,

        /// Format output as raw JSON
        #[clap(short, long)]
        json: bool,
    },

    /// List notes, optionally filtered by a search query
    List {
        /// Filter notes whose title or content contains this text
        #[clap(short, long)]
        query: Option<String>,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Edit an existing note
    Edit {
        /// ID of the note to edit
        id: String,

        /// New title for the note
        #[clap(short = 'T', long)]
        title: Option<String>,

        /// New content for the note
        #[clap(short, long)]
        content: Option<String>,
    },

    /// Delete a note by ID
    Delete {
        /// ID of the note to delete
        id: String,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// Toggle the pinned flag on a note
    Pin {
        /// ID of the note to pin or unpin
        id: String,
    },
}
