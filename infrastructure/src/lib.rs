//! Infrastructure layer for persona-duet
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: HTTP model providers, configuration file
//! loading and the JSONL conversation log.

pub mod config;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileLoggingConfig, FileOutputConfig,
    FileOutputFormat, FileReplConfig, ProviderSettings,
};
pub use logging::JsonlConversationLogger;
pub use providers::{GeminiGateway, OpenAiCompatibleGateway, RoutingGateway, build_gateway};
