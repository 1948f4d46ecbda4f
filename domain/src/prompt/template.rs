//! Prompt templates for each turn of the debate
//!
//! Every template interpolates the current notepad and the protocol markers
//! from [`protocol`](crate::discussion::protocol); agreement instructions are
//! only added in agreement-driven mode.

use crate::core::query::UserQuery;
use crate::discussion::mode::DiscussionMode;
use crate::discussion::protocol::{DISCUSSION_COMPLETE, NOTEPAD_REPLACE_END, NOTEPAD_REPLACE_START};
use crate::persona::Persona;

/// Templates for generating prompts at each stage
pub struct DuetPromptTemplate;

impl DuetPromptTemplate {
    /// How to read and rewrite the notepad
    pub fn notepad_instructions(notepad: &str) -> String {
        format!(
            r#"Shared notepad (visible to both of you and to the user):
---
{notepad}
---
To rewrite the notepad, finish your reply with its complete new content wrapped like this:
{start}
...the full new notepad content...
{end}
The block must be the very last thing in your reply and replaces everything currently in the notepad. Leave it out if the notepad needs no change."#,
            notepad = notepad,
            start = NOTEPAD_REPLACE_START,
            end = NOTEPAD_REPLACE_END,
        )
    }

    /// How to propose ending the discussion (agreement-driven mode only)
    pub fn consensus_instructions(other: Persona) -> String {
        format!(
            r#"When you believe the discussion has reached a complete and satisfying answer, include {token} in your reply.
The discussion only ends when you and {other} signal this on consecutive turns, so if {other} has just signalled and you agree, signal as well. Otherwise keep discussing."#,
            token = DISCUSSION_COMPLETE,
            other = other.display_name(),
        )
    }

    fn attachment_note(query: &UserQuery) -> &'static str {
        match query.attachment() {
            Some(a) if a.is_image() => "\nThe user attached an image. Take its content into account.",
            Some(_) => "\nThe user attached a file. Take its content into account.",
            None => "",
        }
    }

    fn mode_section(mode: DiscussionMode, speaker: Persona) -> String {
        if mode.honours_stop_signals() {
            format!("\n\n{}", Self::consensus_instructions(speaker.counterpart()))
        } else {
            String::new()
        }
    }

    /// Opening analysis by the logical persona
    pub fn opening_prompt(query: &UserQuery, notepad: &str, mode: DiscussionMode) -> String {
        let speaker = Persona::Logical;
        format!(
            r#"User request: {query}{attachment}

You speak first. Give your initial analysis of the request for {other} to build on, and point out what still needs to be explored.

{notepad}{mode}"#,
            query = query.display_text(),
            attachment = Self::attachment_note(query),
            other = speaker.counterpart().display_name(),
            notepad = Self::notepad_instructions(notepad),
            mode = Self::mode_section(mode, speaker),
        )
    }

    /// A reply inside the debate loop, addressed to the other persona
    pub fn reply_prompt(
        speaker: Persona,
        query: &UserQuery,
        transcript: &str,
        last_spoken: &str,
        notepad: &str,
        mode: DiscussionMode,
    ) -> String {
        let other = speaker.counterpart().display_name();
        format!(
            r#"User request: {query}{attachment}

Discussion so far:
{transcript}

{other} just said:
"{last}"

Respond to {other}. Build on or challenge their points and move the discussion forward.

{notepad}{mode}"#,
            query = query.display_text(),
            attachment = Self::attachment_note(query),
            transcript = transcript,
            other = other,
            last = last_spoken,
            notepad = Self::notepad_instructions(notepad),
            mode = Self::mode_section(mode, speaker),
        )
    }

    /// Final answer, addressed to the user
    pub fn final_prompt(query: &UserQuery, transcript: &str, notepad: &str) -> String {
        format!(
            r#"User request: {query}{attachment}

Full discussion between you and {other}:
{transcript}

The discussion is over. Now address the user directly, not {other}. Write a single, comprehensive final answer to the request that draws on the best points of the discussion and the notepad.

{notepad}"#,
            query = query.display_text(),
            attachment = Self::attachment_note(query),
            other = Persona::Creative.display_name(),
            transcript = transcript,
            notepad = Self::notepad_instructions(notepad),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attachment::Attachment;
    use crate::discussion::parsing::parse_reply;

    fn query(text: &str) -> UserQuery {
        UserQuery::try_new(text, None).unwrap()
    }

    /// Pull the marker pair out of a generated prompt the way a model would see it.
    fn markers_in(prompt: &str) -> (String, String) {
        let start_at = prompt.find("<np-").unwrap();
        let start_end = start_at + prompt[start_at..].find('>').unwrap() + 1;
        let end_at = prompt.find("</np-").unwrap();
        let end_end = end_at + prompt[end_at..].find('>').unwrap() + 1;
        (
            prompt[start_at..start_end].to_string(),
            prompt[end_at..end_end].to_string(),
        )
    }

    #[test]
    fn test_opening_prompt_contents() {
        let prompt = DuetPromptTemplate::opening_prompt(
            &query("What is Rust?"),
            "current notes",
            DiscussionMode::FixedTurns,
        );
        assert!(prompt.contains("What is Rust?"));
        assert!(prompt.contains("current notes"));
        assert!(prompt.contains(NOTEPAD_REPLACE_START));
        assert!(!prompt.contains(DISCUSSION_COMPLETE));
        assert!(!prompt.contains("attached"));
    }

    #[test]
    fn test_agreement_mode_adds_stop_token() {
        let prompt = DuetPromptTemplate::opening_prompt(
            &query("q"),
            "n",
            DiscussionMode::AgreementDriven,
        );
        assert!(prompt.contains(DISCUSSION_COMPLETE));
        assert!(prompt.contains("Muse"));
    }

    #[test]
    fn test_attachment_note() {
        let attachment = Attachment::new(vec![1], "image/png", "chart.png");
        let q = UserQuery::try_new("Explain", Some(attachment)).unwrap();
        let prompt = DuetPromptTemplate::opening_prompt(&q, "n", DiscussionMode::FixedTurns);
        assert!(prompt.contains("attached an image"));
    }

    #[test]
    fn test_reply_prompt_quotes_last_line() {
        let prompt = DuetPromptTemplate::reply_prompt(
            Persona::Creative,
            &query("q"),
            "User: q\n\nCognito: first take",
            "first take",
            "n",
            DiscussionMode::FixedTurns,
        );
        assert!(prompt.contains("Cognito just said:\n\"first take\""));
        assert!(prompt.contains("Respond to Cognito"));
    }

    #[test]
    fn test_final_prompt_addresses_user() {
        let prompt = DuetPromptTemplate::final_prompt(&query("q"), "User: q", "notes");
        assert!(prompt.contains("address the user directly"));
        assert!(prompt.contains("notes"));
        assert!(!prompt.contains(DISCUSSION_COMPLETE));
    }

    #[test]
    fn test_prompt_markers_roundtrip_through_parser() {
        let prompt = DuetPromptTemplate::opening_prompt(
            &query("q"),
            "old",
            DiscussionMode::AgreementDriven,
        );
        let (start, end) = markers_in(&prompt);
        let echoed = format!("My analysis.\n{}\n- fresh notes\n{}", start, end);

        let parsed = parse_reply(&echoed);
        assert_eq!(parsed.spoken_text, "My analysis.");
        assert_eq!(parsed.notepad_replacement.as_deref(), Some("- fresh notes"));
    }

    #[test]
    fn test_prompt_stop_token_roundtrip_through_parser() {
        let prompt =
            DuetPromptTemplate::consensus_instructions(Persona::Logical);
        let token_at = prompt.find("<discussion").unwrap();
        let token_end = token_at + prompt[token_at..].find("/>").unwrap() + 2;
        let echoed = format!("Agreed. {}", &prompt[token_at..token_end]);

        let parsed = parse_reply(&echoed);
        assert!(parsed.stop_signaled);
        assert_eq!(parsed.spoken_text, "Agreed.");
    }
}
