//! The conversation loop, the heart of Vitae.
//!
//! Each user message runs one loop:
//!
//! 1. **Build context**: persona prompt, prior history, an optional
//!    contact reminder, then the new user message
//! 2. **Call the LLM** with both tool descriptors attached
//! 3. **If the model asks for tools**: run them, append the results, go to 2
//! 4. **Otherwise**: return the assistant text
//!
//! Tool rounds are capped; exceeding the cap is an error, not a silent stop.

pub mod loop_runner;
pub mod turn;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use loop_runner::{ChatReply, ConversationLoop};
pub use turn::TurnState;
