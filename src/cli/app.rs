use std::io::{stdin, stdout, Write};

use console::style;
use log::info;

use crate::{Commands, ConfirmFn, Note, NotePatch, NotesSession, Result};

/// CLI application handler - processes CLI commands against the notes session
pub struct App {
    /// The notes session backing this invocation
    session: NotesSession,

    /// Whether to display verbose output
    verbose: bool,
}

impl App {
    /// Create a new CLI application over the given session
    pub fn new(session: NotesSession, verbose: bool) -> Self {
        Self { session, verbose }
    }

    /// Run the CLI application with the given command
    pub async fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Create { title, content } => self.handle_create(title, content).await,

            Commands::View { id, json } => self.handle_view(id, json).await,

            Commands::List { query, json } => self.handle_list(query, json).await,

            Commands::Edit { id, title, content } => self.handle_edit(id, title, content).await,

            Commands::Delete { id, force } => self.handle_delete(id, force).await,

            Commands::Pin { id } => self.handle_pin(id).await,
        }
    }

    async fn handle_create(&mut self, title: Option<String>, content: Option<String>) -> Result<()> {
        let created = match self.session.create().await {
            Some(note) => note,
            None => return Err(self.take_session_error()),
        };

        // The session creates with default content; apply the requested
        // fields as a follow-up save, the same path an editor would take.
        let note = if title.is_some() || content.is_some() {
            match self.session.update(&created.id, NotePatch { title, content }).await {
                Some(note) => note,
                None => return Err(self.take_session_error()),
            }
        } else {
            created
        };

        println!("Note created with ID: {}", style(&note.id).bold());
        Ok(())
    }

    async fn handle_view(&mut self, id: String, json: bool) -> Result<()> {
        match self.session.store().get(&id).await {
            Some(note) => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&note)?);
                } else {
                    self.print_note(&note);
                }
                Ok(())
            }
            None => Err(crate::NotesError::NoteNotFound { id }),
        }
    }

    async fn handle_list(&mut self, query: Option<String>, json: bool) -> Result<()> {
        self.session.set_query(query.as_deref().unwrap_or(""));
        self.session.reload().await;

        if let Some(message) = self.session.error() {
            println!("{}", style(message).red());
            return Ok(());
        }

        let notes = self.session.notes();
        if json {
            println!("{}", serde_json::to_string_pretty(notes)?);
            return Ok(());
        }

        if notes.is_empty() {
            println!("No notes found.");
            return Ok(());
        }

        for note in notes {
            let pin = if note.pinned { "* " } else { "  " };
            println!(
                "{}{}  {}  {}",
                pin,
                style(&note.id).dim(),
                style(&note.title).bold(),
                style(format!("updated {}", note.updated_at.format("%Y-%m-%d %H:%M"))).dim()
            );
            if self.verbose {
                println!("    {}", snippet(&note.content));
            }
        }
        println!("{} items", notes.len());

        Ok(())
    }

    async fn handle_edit(
        &mut self,
        id: String,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<()> {
        let patch = NotePatch { title, content };
        match self.session.update(&id, patch).await {
            Some(note) => {
                println!("Note {} saved", style(&note.id).bold());
                Ok(())
            }
            None => Err(self.take_session_error()),
        }
    }

    async fn handle_delete(&mut self, id: String, force: bool) -> Result<()> {
        if !force && !prompt_yes_no("Delete this note? This action cannot be undone.") {
            println!("Deletion cancelled.");
            return Ok(());
        }

        if self.session.remove(&id).await {
            info!("Deleted note {}", id);
            println!("Note {} deleted", style(&id).bold());
            Ok(())
        } else {
            Err(self.take_session_error())
        }
    }

    async fn handle_pin(&mut self, id: String) -> Result<()> {
        let note = self.session.toggle_pin(&id).await?;
        let state = if note.pinned { "pinned" } else { "unpinned" };
        println!("Note {} {}", style(&note.id).bold(), state);
        Ok(())
    }

    fn print_note(&self, note: &Note) {
        println!("{}", style(&note.title).bold());
        println!(
            "{}",
            style(format!(
                "id: {}  created: {}  updated: {}{}",
                note.id,
                note.created_at.format("%Y-%m-%d %H:%M"),
                note.updated_at.format("%Y-%m-%d %H:%M"),
                if note.pinned { "  [pinned]" } else { "" }
            ))
            .dim()
        );
        println!();
        println!("{}", note.content);
    }

    /// Converts the session's recorded failure message into an error value
    /// for the process exit path.
    fn take_session_error(&self) -> crate::NotesError {
        crate::NotesError::ApplicationError {
            message: self
                .session
                .error()
                .unwrap_or("operation failed")
                .to_string(),
        }
    }
}

/// Confirmation capability backed by an interactive terminal prompt.
pub fn terminal_confirm() -> ConfirmFn {
    Box::new(|message| prompt_yes_no(message))
}

fn prompt_yes_no(message: &str) -> bool {
    print!("{} [y/N] ", message);
    let _ = stdout().flush();

    let mut answer = String::new();
    if stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn snippet(content: &str) -> String {
    let mut text: String = content.chars().take(120).collect();
    if content.chars().count() > 120 {
        text.push('…');
    }
    if text.is_empty() {
        "No content".to_string()
    } else {
        text
    }
}
