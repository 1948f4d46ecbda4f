//! CLI command definitions

use clap::{Parser, ValueEnum};
use duet_domain::DiscussionMode;
use std::path::PathBuf;

/// Output format for a finished discussion
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every turn as it happens, then the notepad and the final answer
    Full,
    /// Only the final answer
    Answer,
    /// Transcript, notepad and summary as JSON
    Json,
}

impl From<OutputFormat> for duet_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => duet_domain::OutputFormat::Full,
            OutputFormat::Answer => duet_domain::OutputFormat::Answer,
            OutputFormat::Json => duet_domain::OutputFormat::Json,
        }
    }
}

/// Discussion mode as given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// A fixed number of exchange pairs (--turns)
    Fixed,
    /// Until both personas agree, at most 10 pairs
    Agreement,
}

impl From<ModeArg> for DiscussionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Fixed => DiscussionMode::FixedTurns,
            ModeArg::Agreement => DiscussionMode::AgreementDriven,
        }
    }
}

/// CLI arguments for persona-duet
#[derive(Parser, Debug)]
#[command(name = "persona-duet")]
#[command(author, version, about = "Two AI personas debate your question, then answer it")]
#[command(long_about = r#"
Persona Duet has two AI personas discuss your question before answering.

The discussion runs in three stages:
1. Opening: Cognito (analytical) gives a first analysis
2. Exchange: Muse (creative) and Cognito take turns, sharing a notepad
3. Answer: Cognito writes the final answer for you

Configuration files are loaded from (in priority order):
1. DUET_* environment variables
2. --config <path>     Explicit config file
3. ./duet.toml         Project-level config
4. ~/.config/persona-duet/config.toml   Global config

Example:
  persona-duet "How should I structure a Rust workspace?"
  persona-duet --mode agreement --creative-model grok-4 "Name my startup"
  persona-duet --attach diagram.png "What is wrong with this architecture?"
  persona-duet --chat
"#)]
pub struct Cli {
    /// The question to discuss (not required in chat mode)
    pub question: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Discussion mode
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Exchange pairs in fixed mode (1-5)
    #[arg(short, long, value_name = "N")]
    pub turns: Option<u8>,

    /// Model for both personas
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Model for Cognito (overrides --model)
    #[arg(long, value_name = "MODEL")]
    pub logical_model: Option<String>,

    /// Model for Muse (overrides --model)
    #[arg(long, value_name = "MODEL")]
    pub creative_model: Option<String>,

    /// Ask models that support it to skip extended reasoning
    #[arg(long)]
    pub no_thinking: bool,

    /// Attach an image, PDF or text file to the question
    #[arg(short, long, value_name = "PATH")]
    pub attach: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_invocation() {
        let cli = Cli::try_parse_from([
            "persona-duet",
            "--mode",
            "agreement",
            "--turns",
            "3",
            "--creative-model",
            "grok-4",
            "--no-thinking",
            "-o",
            "json",
            "-vv",
            "Why is the sky blue?",
        ])
        .unwrap();

        assert_eq!(cli.question.as_deref(), Some("Why is the sky blue?"));
        assert_eq!(cli.mode, Some(ModeArg::Agreement));
        assert_eq!(cli.turns, Some(3));
        assert_eq!(cli.creative_model.as_deref(), Some("grok-4"));
        assert!(cli.no_thinking);
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_chat_without_question() {
        let cli = Cli::try_parse_from(["persona-duet", "--chat"]).unwrap();
        assert!(cli.chat);
        assert!(cli.question.is_none());
    }

    #[test]
    fn test_mode_conversion() {
        assert_eq!(
            DiscussionMode::from(ModeArg::Agreement),
            DiscussionMode::AgreementDriven
        );
        assert_eq!(
            duet_domain::OutputFormat::from(OutputFormat::Answer),
            duet_domain::OutputFormat::Answer
        );
    }
}
