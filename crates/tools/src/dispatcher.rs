//! Turns the model's tool-call requests into tool-result messages.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use vitae_core::error::ToolError;
use vitae_core::message::{Message, MessageToolCall};
use vitae_core::notifier::Notifier;
use vitae_core::tool::ToolOutput;

use crate::record_contact::RecordContactArgs;
use crate::record_unknown_question::RecordUnknownQuestionArgs;
use crate::registry::ToolKind;

/// A resolved tool call with typed arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolInvocation {
    RecordContact(RecordContactArgs),
    RecordUnknownQuestion(RecordUnknownQuestionArgs),
}

impl ToolInvocation {
    /// Decode a JSON object into the argument type for `kind`.
    /// Unknown fields are ignored; missing or mistyped required fields fail.
    pub fn decode(kind: ToolKind, arguments: Map<String, Value>) -> Result<Self, ToolError> {
        let value = Value::Object(arguments);
        let invalid = |e: serde_json::Error| ToolError::InvalidArguments {
            tool_name: kind.name().to_string(),
            reason: e.to_string(),
        };
        match kind {
            ToolKind::RecordContact => serde_json::from_value(value)
                .map(Self::RecordContact)
                .map_err(invalid),
            ToolKind::RecordUnknownQuestion => serde_json::from_value(value)
                .map(Self::RecordUnknownQuestion)
                .map_err(invalid),
        }
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            Self::RecordContact(_) => ToolKind::RecordContact,
            Self::RecordUnknownQuestion(_) => ToolKind::RecordUnknownQuestion,
        }
    }

    /// Text pushed to the operator for this call.
    pub fn notification(&self) -> String {
        match self {
            Self::RecordContact(args) => args.notification(),
            Self::RecordUnknownQuestion(args) => args.notification(),
        }
    }
}

/// Executes tool calls against a notifier.
#[derive(Clone)]
pub struct ToolDispatcher {
    notifier: Arc<dyn Notifier>,
}

impl ToolDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Run each call in order and return one tool-result message per call,
    /// in the same order, each carrying the originating call id.
    ///
    /// Calls are not deduplicated: two identical requests push twice.
    pub async fn dispatch(&self, calls: &[MessageToolCall]) -> Result<Vec<Message>, ToolError> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            let output = self.execute(call).await?;
            results.push(Message::tool_result(&call.id, output.to_content()));
        }
        Ok(results)
    }

    /// Run a single call.
    pub async fn execute(&self, call: &MessageToolCall) -> Result<ToolOutput, ToolError> {
        let arguments = parse_arguments(call)?;
        info!(tool = %call.name, call_id = %call.id, "Tool called");

        let Some(kind) = ToolKind::from_name(&call.name) else {
            warn!(tool = %call.name, "Model requested an unknown tool");
            return Ok(ToolOutput::empty());
        };

        let invocation = ToolInvocation::decode(kind, arguments)?;
        self.notifier
            .push(&invocation.notification())
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: kind.name().to_string(),
                reason: e.to_string(),
            })?;
        debug!(tool = %kind, notifier = self.notifier.name(), "Operator notified");

        Ok(ToolOutput::recorded())
    }
}

/// The argument string must be a JSON object. Empty means no arguments.
fn parse_arguments(call: &MessageToolCall) -> Result<Map<String, Value>, ToolError> {
    if call.arguments.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(&call.arguments) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ToolError::InvalidArguments {
            tool_name: call.name.clone(),
            reason: format!("expected a JSON object, got {other}"),
        }),
        Err(e) => Err(ToolError::InvalidArguments {
            tool_name: call.name.clone(),
            reason: e.to_string(),
        }),
    }
}
