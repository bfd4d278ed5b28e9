//! Tool result value object.
//!
//! Tool kinds, argument types, and dispatch live in `vitae-tools`; this is
//! only the flat JSON object each tool hands back to the model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Wire name of the contact-recording tool.
pub const RECORD_CONTACT: &str = "record_contact";

/// Wire name of the unanswered-question tool.
pub const RECORD_UNKNOWN_QUESTION: &str = "record_unknown_question";

/// The result of one tool invocation, serialized as the content of a
/// tool-role message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolOutput(pub Map<String, Value>);

impl ToolOutput {
    /// `{}` — the answer for a tool name nobody registered.
    pub fn empty() -> Self {
        Self::default()
    }

    /// `{"recorded": "ok"}`
    pub fn recorded() -> Self {
        let mut map = Map::new();
        map.insert("recorded".into(), Value::String("ok".into()));
        Self(map)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as the JSON text placed in the tool-role message.
    pub fn to_content(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }
}
