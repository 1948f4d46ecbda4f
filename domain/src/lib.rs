//! Domain layer for persona-duet
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Personas
//!
//! Two fixed conversational roles debate every user query:
//!
//! - **Cognito** ([`Persona::Logical`]): opens the debate and writes the final answer
//! - **Muse** ([`Persona::Creative`]): challenges and extends Cognito's reasoning
//!
//! ## Reply Protocol
//!
//! Model output is free text carrying two optional directives, both defined in
//! [`discussion::protocol`]: a trailing notepad replacement block and a stop
//! signal. [`parse_reply`] extracts them.
//!
//! ## Discussion Modes
//!
//! - **FixedTurns**: a configured number of exchange pairs
//! - **AgreementDriven**: runs until both personas signal consecutively (with a ceiling)

pub mod config;
pub mod core;
pub mod discussion;
pub mod persona;
pub mod prompt;

// Re-export commonly used types
pub use config::OutputFormat;
pub use core::{
    attachment::{Attachment, AttachmentError, InlineAttachment},
    error::DomainError,
    model::{Model, ModelFamily},
    query::UserQuery,
};
pub use discussion::{
    consensus::ConsensusState,
    mode::{DiscussionMode, TurnBudget},
    notepad::SharedDocument,
    parsing::{ParsedReply, parse_reply},
    run::{ConversationRun, RunPhase},
    transcript::{Speaker, Transcript, TurnPurpose, TurnRecord},
};
pub use persona::Persona;
pub use prompt::DuetPromptTemplate;
