//! Application-level configuration.
//!
//! - [`RunSettings`] — mode, turn count, models and reasoning toggle, captured
//!   by value when a run starts

pub mod run_settings;

pub use run_settings::RunSettings;
