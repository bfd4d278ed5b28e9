//! The closed set of tools the model may call.
//!
//! Tool names resolve through a static table rather than a runtime map:
//! adding a tool means adding a `ToolKind` variant and a table row.

use serde_json::Value;
use vitae_core::provider::ToolDefinition;
use vitae_core::tool::{RECORD_CONTACT, RECORD_UNKNOWN_QUESTION};

use crate::{record_contact, record_unknown_question};

/// Every tool the agent knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    /// Forward a visitor's volunteered contact details to the operator
    RecordContact,
    /// Forward an in-scope question the background text can't answer
    RecordUnknownQuestion,
}

/// One row of the lookup table.
struct ToolSpec {
    kind: ToolKind,
    name: &'static str,
    description: &'static str,
    parameters: fn() -> Value,
}

/// Older prompts ask for the contact tool under this name.
const LEGACY_RECORD_CONTACT: &str = "record_user_details";

/// Order here is the order descriptors are offered to the model.
const TOOL_TABLE: [ToolSpec; 2] = [
    ToolSpec {
        kind: ToolKind::RecordContact,
        name: RECORD_CONTACT,
        description: record_contact::DESCRIPTION,
        parameters: record_contact::parameters_schema,
    },
    ToolSpec {
        kind: ToolKind::RecordUnknownQuestion,
        name: RECORD_UNKNOWN_QUESTION,
        description: record_unknown_question::DESCRIPTION,
        parameters: record_unknown_question::parameters_schema,
    },
];

impl ToolKind {
    pub const ALL: [ToolKind; 2] = [ToolKind::RecordContact, ToolKind::RecordUnknownQuestion];

    fn spec(self) -> &'static ToolSpec {
        match self {
            ToolKind::RecordContact => &TOOL_TABLE[0],
            ToolKind::RecordUnknownQuestion => &TOOL_TABLE[1],
        }
    }

    /// Resolve a model-supplied tool name. Exact match only; the legacy
    /// contact-tool name resolves but is never advertised.
    pub fn from_name(name: &str) -> Option<Self> {
        if name == LEGACY_RECORD_CONTACT {
            return Some(ToolKind::RecordContact);
        }
        TOOL_TABLE
            .iter()
            .find(|spec| spec.name == name)
            .map(|spec| spec.kind)
    }

    /// The wire name the model uses.
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// The descriptor handed to the model.
    pub fn definition(self) -> ToolDefinition {
        let spec = self.spec();
        ToolDefinition {
            name: spec.name.to_string(),
            description: spec.description.to_string(),
            parameters: (spec.parameters)(),
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Both descriptors, in table order. Sent verbatim on every LLM call.
pub fn definitions() -> Vec<ToolDefinition> {
    TOOL_TABLE.iter().map(|spec| spec.kind.definition()).collect()
}
