//! REPL (Read-Eval-Print Loop) for interactive chat

use super::command::ReplCommand;
use crate::cli::attachment::load_attachment;
use crate::config::{OutputConfig, ReplConfig};
use crate::ConsoleFormatter;
use colored::Colorize;
use duet_application::{
    DiscussionOrchestrator, ModelGateway, RunDiscussionError, RunOutcome, RunSettings,
    SendMessageInput,
};
use duet_domain::{Attachment, OutputFormat, Persona};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

/// Run one discussion, turning Ctrl-C into a cancellation request.
pub async fn send_interruptible<G: ModelGateway + 'static>(
    orchestrator: &DiscussionOrchestrator<G>,
    input: SendMessageInput,
    settings: RunSettings,
) -> Result<RunOutcome, RunDiscussionError> {
    let run = orchestrator.send_message(input, settings);
    tokio::pin!(run);

    loop {
        tokio::select! {
            result = &mut run => return result,
            signal = tokio::signal::ctrl_c() => {
                if signal.is_ok() {
                    eprintln!("\n{}", "Cancelling...".yellow());
                }
                orchestrator.request_cancel();
            }
        }
    }
}

/// An empty line is only worth sending when a file is attached to it.
fn is_blank_submission(line: &str, has_attachment: bool) -> bool {
    line.is_empty() && !has_attachment
}

/// Interactive chat REPL
pub struct ChatRepl<G: ModelGateway + 'static> {
    orchestrator: Arc<DiscussionOrchestrator<G>>,
    settings: RunSettings,
    output: OutputConfig,
    repl: ReplConfig,
    pending_attachment: Option<Attachment>,
}

impl<G: ModelGateway + 'static> ChatRepl<G> {
    /// Create a new ChatRepl
    pub fn new(orchestrator: Arc<DiscussionOrchestrator<G>>, settings: RunSettings) -> Self {
        Self {
            orchestrator,
            settings,
            output: OutputConfig::default(),
            repl: ReplConfig::default(),
            pending_attachment: None,
        }
    }

    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }

    pub fn with_repl_config(mut self, repl: ReplConfig) -> Self {
        self.repl = repl;
        self
    }

    /// Run the interactive REPL until `/quit`, EOF or Ctrl-C at the prompt
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        self.print_welcome();

        loop {
            print!("{} ", ">>>".green().bold());
            std::io::stdout().flush()?;

            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = tokio::signal::ctrl_c() => {
                    println!("\nBye!");
                    break;
                }
            };

            let Some(line) = line else {
                println!("Bye!");
                break;
            };
            let line = line.trim();

            if is_blank_submission(line, self.pending_attachment.is_some()) {
                continue;
            }

            // Handle commands
            if line.starts_with('/') {
                match ReplCommand::parse(line) {
                    Ok(ReplCommand::Quit) => {
                        println!("Bye!");
                        break;
                    }
                    Ok(command) => self.handle_command(command),
                    Err(message) => {
                        println!("{}", message);
                        println!("Type /help for available commands");
                    }
                }
                continue;
            }

            self.process_message(line).await;
        }

        self.orchestrator.request_cancel();
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│          Persona Duet - Chat Mode           │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        self.print_settings();
        println!();
        println!("Type a question, or /help for commands.");
        println!();
    }

    fn print_settings(&self) {
        println!(
            "Mode: {} ({} pairs)",
            self.settings.mode,
            self.settings.fixed_turns.pairs()
        );
        println!(
            "Models: {} = {}, {} = {}",
            Persona::Logical,
            self.settings.logical_model,
            Persona::Creative,
            self.settings.creative_model
        );
        println!(
            "Extended reasoning: {}",
            if self.settings.suppress_extended_reasoning {
                "off"
            } else {
                "on"
            }
        );
    }

    fn handle_command(&mut self, command: ReplCommand) {
        match command {
            ReplCommand::Quit => {}
            ReplCommand::Help => {
                println!();
                println!("{}", ReplCommand::help());
                println!();
            }
            ReplCommand::Clear => {
                self.pending_attachment = None;
                self.orchestrator.clear_conversation();
            }
            ReplCommand::Mode(None) | ReplCommand::Turns(None) | ReplCommand::Models => {
                self.print_settings();
            }
            ReplCommand::Mode(Some(mode)) => {
                self.settings.mode = mode;
                println!("Mode set to {}", mode);
            }
            ReplCommand::Turns(Some(pairs)) => match self.settings.clone().with_fixed_turns(pairs) {
                Ok(settings) => {
                    self.settings = settings;
                    println!("Fixed mode will run {} exchange pairs", pairs);
                }
                Err(e) => println!("{}", e),
            },
            ReplCommand::Model(None, model) => {
                println!("Both personas now use {}", model);
                self.settings = self.settings.clone().with_model(model);
            }
            ReplCommand::Model(Some(persona), model) => {
                println!("{} now uses {}", persona, model);
                self.settings = self.settings.clone().with_persona_model(persona, model);
            }
            ReplCommand::Thinking(None) => self.print_settings(),
            ReplCommand::Thinking(Some(enabled)) => {
                self.settings.suppress_extended_reasoning = !enabled;
                println!(
                    "Extended reasoning {}",
                    if enabled { "enabled" } else { "suppressed" }
                );
            }
            ReplCommand::Notepad => {
                println!("{}", ConsoleFormatter::format_notepad(&self.orchestrator.notepad()));
            }
            ReplCommand::Transcript => {
                let transcript = self.orchestrator.transcript();
                if transcript.is_empty() {
                    println!("(no messages yet)");
                }
                for record in transcript.records() {
                    println!("{}", ConsoleFormatter::format_turn(record));
                }
            }
            ReplCommand::Attach(path) => match load_attachment(&path) {
                Ok(attachment) => {
                    println!(
                        "Attached {} ({}, {} bytes) to your next message",
                        attachment.filename,
                        attachment.mime_type,
                        attachment.bytes.len()
                    );
                    self.pending_attachment = Some(attachment);
                }
                Err(e) => println!("Could not read {}: {}", path.display(), e),
            },
            ReplCommand::Credentials => {
                self.orchestrator.clear_credentials_flag();
                println!("Credentials flag cleared; new discussions are allowed again");
            }
        }
    }

    async fn process_message(&mut self, text: &str) {
        println!();

        let mut input = SendMessageInput::new(text);
        if let Some(attachment) = self.pending_attachment.take() {
            input = input.with_attachment(attachment);
        }

        debug!("Sending message with settings {:?}", self.settings);
        let result =
            send_interruptible(&self.orchestrator, input, self.settings.clone()).await;

        match result {
            Ok(RunOutcome::Completed(summary)) => {
                if self.output.format == OutputFormat::Json {
                    let transcript = self.orchestrator.transcript();
                    println!(
                        "{}",
                        ConsoleFormatter::format_json(transcript.records(), &summary)
                    );
                } else if self.output.streams_turns() {
                    println!("{}", ConsoleFormatter::summary_line(&summary));
                } else {
                    println!("{}", ConsoleFormatter::format_answer(&summary));
                }
                if self.repl.show_notepad {
                    println!("{}", ConsoleFormatter::format_notepad(&summary.notepad));
                }
            }
            Ok(RunOutcome::Cancelled) => println!("{}", "Discussion cancelled.".yellow()),
            Err(RunDiscussionError::CredentialsMissing) => {
                eprintln!(
                    "{} {}",
                    "Error:".red(),
                    RunDiscussionError::CredentialsMissing
                );
                eprintln!("Fix your API keys, then type /credentials");
            }
            // Streamed runs already showed the failure as a System turn.
            Err(e) if e.is_rejection() || !self.output.streams_turns() => {
                eprintln!("{} {}", "Error:".red(), e)
            }
            Err(_) => {}
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_line_is_skipped_without_attachment() {
        assert!(is_blank_submission("", false));
        assert!(!is_blank_submission("hello", false));
    }

    #[test]
    fn test_empty_line_sends_pending_attachment() {
        assert!(!is_blank_submission("", true));
    }
}
