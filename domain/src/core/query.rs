//! User query value object

use super::attachment::Attachment;

/// The user input for one run (Value Object)
///
/// Valid when it carries non-blank text, an attachment, or both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserQuery {
    text: String,
    attachment: Option<Attachment>,
}

impl UserQuery {
    /// Try to create a new query, returning None if both fields are empty
    pub fn try_new(text: impl Into<String>, attachment: Option<Attachment>) -> Option<Self> {
        let text = text.into().trim().to_string();
        if text.is_empty() && attachment.is_none() {
            None
        } else {
            Some(Self { text, attachment })
        }
    }

    /// Get the query text (may be empty when only an attachment was sent)
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    pub fn has_attachment(&self) -> bool {
        self.attachment.is_some()
    }

    /// Text as shown in prompts and the transcript.
    pub fn display_text(&self) -> &str {
        if self.text.is_empty() {
            "(see attached file)"
        } else {
            &self.text
        }
    }
}

impl std::fmt::Display for UserQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_text())
    }
}
