//! Presentation layer for persona-duet
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatRepl, send_interruptible};
pub use cli::attachment::load_attachment;
pub use cli::commands::{Cli, ModeArg, OutputFormat};
pub use config::{OutputConfig, ReplConfig};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{DiscussionReporter, SimpleReporter};
