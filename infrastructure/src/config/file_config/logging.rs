//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};

/// Raw logging configuration from TOML
///
/// ```toml
/// [logging]
/// file_dir = "~/.local/state/persona-duet/logs"        # daily rolling diagnostic log
/// conversation_log = "~/.local/state/persona-duet/conversation.jsonl"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    pub file_dir: Option<String>,
    pub conversation_log: Option<String>,
}
