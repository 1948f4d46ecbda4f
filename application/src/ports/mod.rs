//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters must implement.

pub mod conversation_logger;
pub mod discussion_observer;
pub mod model_gateway;
