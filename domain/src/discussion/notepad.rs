//! Shared notepad (the document both personas read and overwrite)

use super::protocol::INITIAL_NOTEPAD;
use crate::persona::Persona;
use serde::{Deserialize, Serialize};

/// The shared scratchpad (Entity)
///
/// Written at most once per turn, always by whole-content replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedDocument {
    content: String,
    last_writer: Option<Persona>,
}

impl SharedDocument {
    pub fn new() -> Self {
        Self {
            content: INITIAL_NOTEPAD.to_string(),
            last_writer: None,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn last_writer(&self) -> Option<Persona> {
        self.last_writer
    }

    /// Whether the notepad still holds the initial placeholder
    pub fn is_pristine(&self) -> bool {
        self.last_writer.is_none() && self.content == INITIAL_NOTEPAD
    }

    /// Replace the whole content. An empty string is a deliberate wipe.
    pub fn replace(&mut self, content: impl Into<String>, writer: Persona) {
        self.content = content.into();
        self.last_writer = Some(writer);
    }

    /// Back to the initial placeholder with no writer
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for SharedDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_placeholder() {
        let doc = SharedDocument::new();
        assert_eq!(doc.content(), INITIAL_NOTEPAD);
        assert_eq!(doc.last_writer(), None);
        assert!(doc.is_pristine());
    }

    #[test]
    fn test_replace_records_writer() {
        let mut doc = SharedDocument::new();
        doc.replace("- idea", Persona::Creative);
        assert_eq!(doc.content(), "- idea");
        assert_eq!(doc.last_writer(), Some(Persona::Creative));
        assert!(!doc.is_pristine());
    }

    #[test]
    fn test_empty_replacement_wipes() {
        let mut doc = SharedDocument::new();
        doc.replace("", Persona::Logical);
        assert_eq!(doc.content(), "");
        assert_eq!(doc.last_writer(), Some(Persona::Logical));
    }

    #[test]
    fn test_reset() {
        let mut doc = SharedDocument::new();
        doc.replace("x", Persona::Logical);
        doc.reset();
        assert_eq!(doc, SharedDocument::new());
    }
}
