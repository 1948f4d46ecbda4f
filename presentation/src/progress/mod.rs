//! Live progress for running discussions

pub mod reporter;
