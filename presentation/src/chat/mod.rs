//! Interactive chat module
//!
//! Provides a line-based interactive chat over the discussion orchestrator.

mod command;
mod repl;

pub use command::ReplCommand;
pub use repl::{ChatRepl, send_interruptible};
