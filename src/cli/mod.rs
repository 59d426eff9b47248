//! CLI module for the ocean-notes application
//!
//! This module provides the command-line front-end over the notes session.
//! It only reads session state and invokes session operations.

mod app;
mod args;

pub use app::*;
pub use args::*;
