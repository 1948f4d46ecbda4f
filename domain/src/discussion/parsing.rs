//! Reply parsing for the notepad/stop protocol.
//!
//! Pure text processing: no I/O and no failure modes. Malformed directives
//! degrade to "no directive" and blank replies get a descriptive placeholder,
//! so callers can always append the result to the transcript.
//!
//! # Steps
//!
//! | Step | Looks for | Effect |
//! |------|-----------|--------|
//! | 1 | trailing `<np-replace-all>…</np-replace-all>` | splits off the notepad replacement |
//! | 2 | `<discussion_complete />` anywhere in the residue | sets the stop flag, strips every occurrence |
//! | 3 | empty residue | synthesises a placeholder sentence |

use super::protocol::{
    DISCUSSION_COMPLETE, NOTE_NO_TEXT, NOTE_NOTEPAD_EMPTY, NOTE_NOTEPAD_UPDATED,
    NOTE_STOP_PROPOSED, NOTEPAD_REPLACE_END, NOTEPAD_REPLACE_START,
};

/// Result of parsing one raw model reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    /// Text to show in the transcript; never empty
    pub spoken_text: String,
    /// Full notepad replacement. `Some("")` is a deliberate wipe, `None` means no change.
    pub notepad_replacement: Option<String>,
    /// The persona proposed ending the discussion
    pub stop_signaled: bool,
}

/// Parse a raw model reply into spoken text and directives.
///
/// # Examples
///
/// ```
/// use duet_domain::parse_reply;
///
/// let parsed = parse_reply("Agreed. <discussion_complete />");
/// assert_eq!(parsed.spoken_text, "Agreed.");
/// assert!(parsed.stop_signaled);
///
/// let parsed = parse_reply("Draft below.\n<np-replace-all>\n- point one\n</np-replace-all>");
/// assert_eq!(parsed.spoken_text, "Draft below.");
/// assert_eq!(parsed.notepad_replacement.as_deref(), Some("- point one"));
/// ```
pub fn parse_reply(raw: &str) -> ParsedReply {
    let trimmed = raw.trim();

    let (residue, notepad_replacement) = match split_notepad_block(trimmed) {
        Some((before, inner)) => (before.trim(), Some(inner.trim().to_string())),
        None => (trimmed, None),
    };

    let mut spoken = residue.to_string();
    let stop_signaled = spoken.contains(DISCUSSION_COMPLETE);
    // Removal can splice a fresh token together, so repeat until none remain.
    while spoken.contains(DISCUSSION_COMPLETE) {
        spoken = spoken.replace(DISCUSSION_COMPLETE, "");
    }
    let mut spoken_text = spoken.trim().to_string();

    if spoken_text.is_empty() {
        spoken_text = silent_action_note(notepad_replacement.as_deref(), stop_signaled);
    }

    ParsedReply {
        spoken_text,
        notepad_replacement,
        stop_signaled,
    }
}

/// Returns `(text_before_block, block_inner)` when the reply ends with a
/// well-formed replacement block.
fn split_notepad_block(trimmed: &str) -> Option<(&str, &str)> {
    let body = trimmed.strip_suffix(NOTEPAD_REPLACE_END)?;
    let start = body.rfind(NOTEPAD_REPLACE_START)?;
    let inner = &body[start + NOTEPAD_REPLACE_START.len()..];
    Some((&body[..start], inner))
}

fn silent_action_note(replacement: Option<&str>, stop_signaled: bool) -> String {
    let mut actions = Vec::new();
    match replacement {
        Some("") => actions.push(NOTE_NOTEPAD_EMPTY),
        Some(_) => actions.push(NOTE_NOTEPAD_UPDATED),
        None => {}
    }
    if stop_signaled {
        actions.push(NOTE_STOP_PROPOSED);
    }

    if actions.is_empty() {
        return NOTE_NO_TEXT.to_string();
    }

    let sentence = actions.join("; ");
    let mut chars = sentence.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => sentence,
    };
    format!("({}.)", capitalized)
}
