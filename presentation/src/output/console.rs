//! Console output formatter for discussion results

use colored::Colorize;
use duet_application::DiscussionSummary;
use duet_domain::{Persona, SharedDocument, Speaker, TurnPurpose, TurnRecord};
use serde_json::json;

/// Formats turns and finished discussions for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format one transcript entry with a colored speaker heading
    pub fn format_turn(record: &TurnRecord) -> String {
        let heading = match (record.speaker, record.purpose) {
            (Speaker::User, _) => match &record.attachment {
                Some(file) => format!("── You (attached {}) ──", file).bold(),
                None => "── You ──".bold(),
            },
            (Speaker::Persona(persona), purpose) => {
                let label = match purpose {
                    TurnPurpose::Opening => format!("── {} · opening ──", persona),
                    TurnPurpose::Final => format!("── {} · final answer ──", persona),
                    _ => format!("── {} ──", persona),
                };
                Self::persona_color(persona, &label)
            }
            (Speaker::System, _) => "── System ──".red().bold(),
        };

        let timing = record
            .elapsed_ms
            .map(|ms| format!(" {}", format!("({:.1}s)", ms as f64 / 1000.0).dimmed()))
            .unwrap_or_default();

        format!("{}{}\n{}\n", heading, timing, record.text)
    }

    /// Format a whole run: every turn, the notepad and a summary footer
    pub fn format_full(records: &[TurnRecord], summary: &DiscussionSummary) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Persona Duet"));
        output.push('\n');
        for record in records {
            output.push('\n');
            output.push_str(&Self::format_turn(record));
        }

        output.push_str(&Self::section_header("Notepad"));
        output.push_str(&Self::format_notepad(&summary.notepad));
        output.push('\n');

        output.push_str(&Self::section_header("Final Answer"));
        output.push_str(&summary.final_answer);
        output.push('\n');
        output.push_str(&format!("\n{}\n", Self::summary_line(summary)));
        output.push_str(&Self::footer());

        output
    }

    /// Format the final answer only (concise output)
    pub fn format_answer(summary: &DiscussionSummary) -> String {
        format!(
            "{}\n\n{}\n\n{}\n",
            "=== Persona Duet Answer ===".cyan().bold(),
            summary.final_answer,
            Self::summary_line(summary)
        )
    }

    /// Format as JSON
    pub fn format_json(records: &[TurnRecord], summary: &DiscussionSummary) -> String {
        let value = json!({
            "final_answer": summary.final_answer,
            "consensus_reached": summary.consensus_reached,
            "ai_turns": summary.ai_turns,
            "model_calls": summary.model_calls,
            "elapsed_ms": summary.elapsed.as_millis() as u64,
            "notepad": {
                "content": summary.notepad.content(),
                "last_writer": summary.notepad.last_writer().map(|p| p.as_str()),
            },
            "transcript": records,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn format_notepad(notepad: &SharedDocument) -> String {
        let writer = match notepad.last_writer() {
            Some(persona) => format!("last written by {}", persona),
            None => "untouched".to_string(),
        };
        let content = if notepad.content().is_empty() {
            "(empty)".dimmed().to_string()
        } else {
            Self::indent(notepad.content(), "  ")
        };
        format!("{}\n{}", format!("[{}]", writer).dimmed(), content)
    }

    pub fn summary_line(summary: &DiscussionSummary) -> String {
        let consensus = if summary.consensus_reached {
            ", personas agreed".green().to_string()
        } else {
            String::new()
        };
        format!(
            "{} {} model calls in {:.1}s{}",
            "·".dimmed(),
            summary.model_calls,
            summary.elapsed.as_secs_f64(),
            consensus
        )
        .dimmed()
        .to_string()
    }

    fn persona_color(persona: Persona, label: &str) -> colored::ColoredString {
        match persona {
            Persona::Logical => label.blue().bold(),
            Persona::Creative => label.magenta().bold(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn summary() -> DiscussionSummary {
        let mut notepad = SharedDocument::new();
        notepad.replace("- point", Persona::Creative);
        DiscussionSummary {
            final_answer: "The answer is 4.".to_string(),
            ai_turns: 3,
            model_calls: 3,
            consensus_reached: false,
            elapsed: Duration::from_millis(2500),
            notepad,
        }
    }

    fn records() -> Vec<TurnRecord> {
        vec![
            TurnRecord::user("2+2?", None),
            TurnRecord::persona(Persona::Logical, TurnPurpose::Opening, "4", "gemini-2.5-flash", 900),
            TurnRecord::persona(Persona::Creative, TurnPurpose::Reply, "Yes", "gemini-2.5-flash", 800),
            TurnRecord::persona(Persona::Logical, TurnPurpose::Final, "The answer is 4.", "gemini-2.5-flash", 800),
        ]
    }

    #[test]
    fn test_format_turn_names_speaker() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format_turn(&records()[1]);
        assert!(text.starts_with("── Cognito · opening ── (0.9s)"));
        assert!(text.contains("\n4\n"));
    }

    #[test]
    fn test_format_full_includes_notepad_and_answer() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format_full(&records(), &summary());
        assert!(text.contains("── Muse ──"));
        assert!(text.contains("[last written by Muse]"));
        assert!(text.contains("  - point"));
        assert!(text.contains("3 model calls in 2.5s"));
    }

    #[test]
    fn test_format_json_is_parseable() {
        let text = ConsoleFormatter::format_json(&records(), &summary());
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["final_answer"], "The answer is 4.");
        assert_eq!(value["notepad"]["last_writer"], "creative");
        assert_eq!(value["transcript"].as_array().unwrap().len(), 4);
        assert_eq!(value["elapsed_ms"], 2500);
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "> "), "> a\n> b");
    }
}
