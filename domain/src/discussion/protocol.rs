//! Reply protocol literals.
//!
//! These strings are the wire contract with the models: prompt templates embed
//! them verbatim and [`parse_reply`](super::parsing::parse_reply) scans for
//! exactly the same text. Change them only here.

/// Opens a full notepad replacement block
pub const NOTEPAD_REPLACE_START: &str = "<np-replace-all>";

/// Closes a notepad replacement block; must end the reply
pub const NOTEPAD_REPLACE_END: &str = "</np-replace-all>";

/// Proposes ending an agreement-driven discussion
pub const DISCUSSION_COMPLETE: &str = "<discussion_complete />";

/// Notepad content before anyone has written to it
pub const INITIAL_NOTEPAD: &str = "This is the shared notepad. Cognito and Muse can record key points, drafts and conclusions here while they discuss.";

// Silent-action placeholders used when a reply carries directives but no prose.

pub const NOTE_NOTEPAD_UPDATED: &str = "updated the notepad";
pub const NOTE_NOTEPAD_EMPTY: &str = "attempted to update the notepad, but the new content was empty";
pub const NOTE_STOP_PROPOSED: &str = "proposed ending the discussion";
pub const NOTE_NO_TEXT: &str = "(No additional text.)";

/// Welcome notice posted after a conversation is cleared
pub const WELCOME_NOTICE: &str = "Conversation cleared. Ask a question and Cognito and Muse will discuss it.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_are_distinct() {
        assert_ne!(NOTEPAD_REPLACE_START, NOTEPAD_REPLACE_END);
        assert!(!NOTEPAD_REPLACE_END.contains(DISCUSSION_COMPLETE));
        assert!(!DISCUSSION_COMPLETE.contains(NOTEPAD_REPLACE_START));
    }
}
