//! Application layer for persona-duet
//!
//! This crate contains the discussion use case, port definitions, and the
//! per-run settings it captures. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::RunSettings;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    discussion_observer::{DiscussionObserver, NoObserver},
    model_gateway::{GatewayError, GatewayResponse, GenerationRequest, ModelGateway},
};
pub use use_cases::run_discussion::{
    DiscussionOrchestrator, DiscussionSummary, RunDiscussionError, RunOutcome,
    SendMessageInput,
};
