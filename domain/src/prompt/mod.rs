//! Prompt templates for the persona debate

pub mod template;

pub use template::DuetPromptTemplate;
