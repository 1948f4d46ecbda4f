//! `[discussion]` and `[behavior]` sections

use duet_domain::discussion::mode::DEFAULT_FIXED_TURNS;
use serde::{Deserialize, Serialize};

/// Debate settings from TOML
///
/// # Example
///
/// ```toml
/// [discussion]
/// mode = "agreement"   # "fixed" (default) or "agreement"
/// turns = 3            # exchange pairs in fixed mode, 1-5
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDiscussionConfig {
    pub mode: String,
    pub turns: u8,
}

impl Default for FileDiscussionConfig {
    fn default() -> Self {
        Self {
            mode: "fixed".to_string(),
            turns: DEFAULT_FIXED_TURNS,
        }
    }
}

/// Request behaviour from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBehaviorConfig {
    /// Ask models that support it to skip extended reasoning
    pub suppress_extended_reasoning: bool,
    /// Per-request HTTP timeout
    pub timeout_seconds: u64,
}

impl Default for FileBehaviorConfig {
    fn default() -> Self {
        Self {
            suppress_extended_reasoning: false,
            timeout_seconds: 120,
        }
    }
}
