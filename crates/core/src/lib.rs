//! # Vitae Core
//!
//! Domain types, traits, and error definitions for the Vitae career chat
//! agent. This crate has **no framework dependencies**: it defines the model
//! the provider, notifier, tool, and agent crates implement against.
//!
//! ## Seams
//!
//! - [`Provider`] — the LLM backend (one request in, one response out)
//! - [`Notifier`] — the operator's push-notification channel
//! - [`Persona`] — the fixed instruction block sent ahead of every conversation

pub mod error;
pub mod message;
pub mod notifier;
pub mod persona;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use message::{Message, MessageToolCall, Role};
pub use notifier::Notifier;
pub use persona::Persona;
pub use provider::{FinishReason, Provider, ProviderRequest, ProviderResponse, ToolDefinition};
pub use tool::ToolOutput;
