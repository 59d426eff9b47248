//! Ocean Notes application library
//!
//! This library provides a searchable collection of short text notes with
//! create, update, delete, and pin operations, persisted locally as a single
//! JSON document, plus the session layer that keeps UI-facing state in sync
//! with the store.

mod cli;
mod config;
mod debounce;
mod errors;
mod note;
mod session;
mod storage;
mod types;

// Re-export key components
pub use cli::*;
pub use config::*;
pub use debounce::*;
pub use errors::*;
pub use note::*;
pub use session::*;
pub use storage::*;
pub use types::*;
