//! LLM provider implementation for Vitae.
//!
//! The agent talks to exactly one backend through the
//! `vitae_core::Provider` trait; this crate supplies the
//! OpenAI-compatible implementation.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;
