//! Prompt system for grounded.
//!
//! This crate provides:
//! - Built-in system instructions and a few-shot example
//! - `MessageBuilder` for assembling the chat messages sent to a model
//! - YAML prompt definitions rendered with Handlebars

pub mod builder;
pub mod loader;
pub mod message;
pub mod templates;
pub mod types;

// Re-export main types
pub use builder::render_prompt;
pub use loader::{list_prompts, load_prompt};
pub use message::MessageBuilder;
pub use templates::{DEFAULT_SYSTEM_TEMPLATE, FEW_SHOT_ANSWER, FEW_SHOT_QUESTION};
pub use types::PromptDefinition;
