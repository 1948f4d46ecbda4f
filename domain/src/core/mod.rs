//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`] — model identifiers (Gemini, Grok, OpenAI, custom)
//! - [`query::UserQuery`] — validated user input for one run
//! - [`attachment::Attachment`] — an optional file sent along with a query
//! - [`error::DomainError`] — domain-level errors

pub mod attachment;
pub mod error;
pub mod model;
pub mod query;
