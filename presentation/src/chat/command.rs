//! Slash commands understood by the chat REPL

use duet_domain::{DiscussionMode, DomainError, Model, Persona};
use std::path::PathBuf;

/// A parsed `/command` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Quit,
    Clear,
    /// Show or set the mode
    Mode(Option<DiscussionMode>),
    /// Show or set the exchange pairs for fixed mode
    Turns(Option<u8>),
    /// Set the model, for one persona or (with `None`) both
    Model(Option<Persona>, Model),
    /// Show the models
    Models,
    /// Show or set extended reasoning (`Some(false)` suppresses it)
    Thinking(Option<bool>),
    Notepad,
    Transcript,
    /// Attach a file to the next message
    Attach(PathBuf),
    /// Re-enable runs after API keys were fixed
    Credentials,
}

impl ReplCommand {
    /// Parse a line starting with `/`.
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();

        match (name, args.as_slice()) {
            ("/help" | "/h" | "/?", []) => Ok(ReplCommand::Help),
            ("/quit" | "/exit" | "/q", []) => Ok(ReplCommand::Quit),
            ("/clear", []) => Ok(ReplCommand::Clear),
            ("/mode", []) => Ok(ReplCommand::Mode(None)),
            ("/mode", [mode]) => mode
                .parse()
                .map(|mode| ReplCommand::Mode(Some(mode)))
                .map_err(|e: DomainError| e.to_string()),
            ("/turns", []) => Ok(ReplCommand::Turns(None)),
            ("/turns", [n]) => n
                .parse()
                .map(|n| ReplCommand::Turns(Some(n)))
                .map_err(|_| format!("Not a number: {}", n)),
            ("/model" | "/models", []) => Ok(ReplCommand::Models),
            ("/model", [model]) => Ok(ReplCommand::Model(None, Self::model(model))),
            ("/model", [persona, model]) => {
                let persona = match persona.to_ascii_lowercase().as_str() {
                    "logical" | "cognito" => Persona::Logical,
                    "creative" | "muse" => Persona::Creative,
                    other => return Err(format!("Unknown persona: {}", other)),
                };
                Ok(ReplCommand::Model(Some(persona), Self::model(model)))
            }
            ("/thinking", []) => Ok(ReplCommand::Thinking(None)),
            ("/thinking", ["on"]) => Ok(ReplCommand::Thinking(Some(true))),
            ("/thinking", ["off"]) => Ok(ReplCommand::Thinking(Some(false))),
            ("/notepad", []) => Ok(ReplCommand::Notepad),
            ("/transcript", []) => Ok(ReplCommand::Transcript),
            ("/attach", [path]) => Ok(ReplCommand::Attach(PathBuf::from(path))),
            ("/credentials", []) => Ok(ReplCommand::Credentials),
            _ => Err(format!("Unknown command: {}", line.trim())),
        }
    }

    fn model(name: &str) -> Model {
        match name.parse() {
            Ok(model) => model,
            Err(never) => match never {},
        }
    }

    pub fn help() -> &'static str {
        r#"Commands:
  /mode [fixed|agreement]        - Show or set the discussion mode
  /turns [1-5]                   - Show or set exchange pairs for fixed mode
  /model [logical|creative] NAME - Set the model for one or both personas
  /models                        - Show current models
  /thinking [on|off]             - Show or toggle extended reasoning
  /attach PATH                   - Attach a file to your next message
  /notepad                       - Show the shared notepad
  /transcript                    - Show the whole conversation
  /clear                         - Start a new conversation
  /credentials                   - Retry after fixing API keys
  /help, /h, /?                  - Show this help
  /quit, /exit, /q               - Exit chat

Press Ctrl-C during a discussion to cancel it."#
    }
}
