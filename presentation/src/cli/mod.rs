//! Command-line interface definitions

pub mod attachment;
pub mod commands;
