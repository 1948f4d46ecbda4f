//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording discussion events
//! (model calls, transcript appends, notepad writes, run outcomes) to a
//! structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! debate in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured discussion event for logging.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "model_call", "turn", "notepad_update").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging discussion events to a structured log.
///
/// `log` is synchronous and infallible; a logger that cannot write drops the
/// event.
pub trait ConversationLogger: Send + Sync {
    /// Record a discussion event.
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
