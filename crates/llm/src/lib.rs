//! Chat completion crate for grounded.
//!
//! This crate provides a provider-agnostic abstraction over non-streaming
//! chat completion APIs.
//!
//! # Providers
//! - **OpenAI** and **Azure OpenAI**
//! - **Ollama**: Local LLM runtime
//!
//! # Example
//! ```no_run
//! use grounded_llm::{ChatClient, ChatMessage, ChatRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new()?;
//! let request = ChatRequest::new("llama3", vec![ChatMessage::user("Hello, world!")]);
//! let completion = client.complete(&request).await?;
//! println!("{}", completion.choices[0].message.text());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use client::{
    ChatChoice, ChatClient, ChatCompletion, ChatMessage, ChatRequest, ChatRole, ChatUsage,
    ResponseMessage,
};
pub use factory::create_client;
pub use providers::{OllamaClient, OpenAiClient, OpenAiTarget};
