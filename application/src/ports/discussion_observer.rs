//! Discussion observer port
//!
//! Every transcript append and notepad write is published here so the
//! presentation layer can render the debate live. The orchestrator is the
//! only writer; observers only read.

use duet_domain::{Persona, SharedDocument, TurnPurpose, TurnRecord};
use std::time::Duration;

/// Callback for live updates during a discussion run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console spinner, plain lines, etc.)
pub trait DiscussionObserver: Send + Sync {
    /// Called once a run has been accepted, before the user turn is recorded
    fn on_run_started(&self) {}

    /// Called right before a persona's model call is issued
    fn on_turn_started(&self, _persona: Persona, _purpose: TurnPurpose) {}

    /// Called after every transcript append
    fn on_turn_appended(&self, record: &TurnRecord);

    /// Called after every notepad write
    fn on_notepad_updated(&self, document: &SharedDocument);

    /// Called from the run's cleanup, whatever the outcome
    fn on_run_finished(&self, _elapsed: Duration) {}

    /// Called after the conversation has been reset
    fn on_conversation_cleared(&self, _welcome: &str) {}
}

/// No-op observer for when live output is not needed
pub struct NoObserver;

impl DiscussionObserver for NoObserver {
    fn on_turn_appended(&self, _record: &TurnRecord) {}
    fn on_notepad_updated(&self, _document: &SharedDocument) {}
}
