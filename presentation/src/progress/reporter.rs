//! Progress reporting for running discussions

use crate::ConsoleFormatter;
use colored::Colorize;
use duet_application::DiscussionObserver;
use duet_domain::{Persona, SharedDocument, Speaker, TurnPurpose, TurnRecord};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Shows a spinner while a persona is thinking and, optionally, each turn
/// as soon as it lands in the transcript.
pub struct DiscussionReporter {
    spinner: Mutex<Option<ProgressBar>>,
    show_turns: bool,
    show_spinner: bool,
}

impl DiscussionReporter {
    pub fn new(show_turns: bool) -> Self {
        Self {
            spinner: Mutex::new(None),
            show_turns,
            show_spinner: true,
        }
    }

    pub fn with_spinner(mut self, show: bool) -> Self {
        self.show_spinner = show;
        self
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn activity(persona: Persona, purpose: TurnPurpose) -> String {
        let doing = match purpose {
            TurnPurpose::Opening => "is analysing the question",
            TurnPurpose::Final => "is writing the final answer",
            _ => "is thinking",
        };
        format!("{} {}", persona.display_name().bold(), doing)
    }

    fn clear_spinner(&self) {
        if let Ok(mut spinner) = self.spinner.lock()
            && let Some(pb) = spinner.take()
        {
            pb.finish_and_clear();
        }
    }
}

impl DiscussionObserver for DiscussionReporter {
    fn on_turn_started(&self, persona: Persona, purpose: TurnPurpose) {
        if !self.show_spinner {
            return;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_message(Self::activity(persona, purpose));
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut spinner) = self.spinner.lock()
            && let Some(previous) = spinner.replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn on_turn_appended(&self, record: &TurnRecord) {
        self.clear_spinner();
        if !self.show_turns {
            return;
        }
        if record.speaker == Speaker::System {
            eprintln!("{}", ConsoleFormatter::format_turn(record));
        } else {
            println!("{}", ConsoleFormatter::format_turn(record));
        }
    }

    fn on_notepad_updated(&self, document: &SharedDocument) {
        if self.show_turns
            && let Some(writer) = document.last_writer()
        {
            println!("{}\n", format!("✎ {} updated the notepad", writer).dimmed());
        }
    }

    fn on_run_finished(&self, _elapsed: Duration) {
        self.clear_spinner();
    }

    fn on_conversation_cleared(&self, welcome: &str) {
        self.clear_spinner();
        println!("{}", welcome.cyan());
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleReporter {
    show_turns: bool,
    show_progress: bool,
}

impl SimpleReporter {
    pub fn new(show_turns: bool) -> Self {
        Self {
            show_turns,
            show_progress: true,
        }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }
}

impl DiscussionObserver for SimpleReporter {
    fn on_turn_started(&self, persona: Persona, purpose: TurnPurpose) {
        if !self.show_progress {
            return;
        }
        println!("{} {}", "->".cyan(), DiscussionReporter::activity(persona, purpose));
    }

    fn on_turn_appended(&self, record: &TurnRecord) {
        if record.speaker == Speaker::System {
            eprintln!("  {} discussion failed", "x".red());
        } else if self.show_turns {
            println!("{}", ConsoleFormatter::format_turn(record));
        } else if self.show_progress && record.is_persona_turn() {
            println!("  {} {}", "v".green(), record.speaker);
        }
    }

    fn on_notepad_updated(&self, document: &SharedDocument) {
        if (self.show_progress || self.show_turns)
            && let Some(writer) = document.last_writer()
        {
            println!("  {} notepad updated by {}", "v".green(), writer);
        }
    }

    fn on_conversation_cleared(&self, welcome: &str) {
        println!("{}", welcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_wording() {
        colored::control::set_override(false);
        assert_eq!(
            DiscussionReporter::activity(Persona::Logical, TurnPurpose::Final),
            "Cognito is writing the final answer"
        );
        assert_eq!(
            DiscussionReporter::activity(Persona::Creative, TurnPurpose::Reply),
            "Muse is thinking"
        );
    }

    #[test]
    fn test_spinner_is_replaced_and_cleared() {
        let reporter = DiscussionReporter::new(false);
        reporter.on_turn_started(Persona::Logical, TurnPurpose::Opening);
        reporter.on_turn_started(Persona::Creative, TurnPurpose::Reply);
        assert!(reporter.spinner.lock().unwrap().is_some());

        reporter.on_turn_appended(&TurnRecord::persona(
            Persona::Creative,
            TurnPurpose::Reply,
            "idea",
            "gemini-2.5-flash",
            10,
        ));
        assert!(reporter.spinner.lock().unwrap().is_none());
    }

    #[test]
    fn test_spinner_can_be_disabled() {
        let reporter = DiscussionReporter::new(false).with_spinner(false);
        reporter.on_turn_started(Persona::Logical, TurnPurpose::Opening);
        assert!(reporter.spinner.lock().unwrap().is_none());
    }
}
