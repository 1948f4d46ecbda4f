//! Configuration file loading for persona-duet
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `DUET_`-prefixed environment variables (`DUET_DISCUSSION__MODE=agreement`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./duet.toml` or `./.duet.toml`
//! 4. Global: `~/.config/persona-duet/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileBehaviorConfig, FileConfig, FileDiscussionConfig,
    FileLoggingConfig, FileModelsConfig, FileOutputConfig, FileOutputFormat, FileProviderConfig,
    FileProvidersConfig, FileReplConfig, ProviderSettings,
};
pub use loader::ConfigLoader;
