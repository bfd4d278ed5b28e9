//! `record_unknown_question` — flag a gap in the background text.

use serde::Deserialize;

pub const DESCRIPTION: &str = "Use ONLY for career-relevant questions that cannot be answered \
    from the provided background information. Do not log trivial, off-topic, or non-career \
    questions.";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecordUnknownQuestionArgs {
    pub question: String,
}

impl RecordUnknownQuestionArgs {
    pub fn notification(&self) -> String {
        format!("Recording {} asked that I couldn't answer", self.question)
    }
}

pub fn parameters_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "question": {
                "type": "string",
                "description": "The career-relevant question that couldn't be answered from the background information"
            }
        },
        "required": ["question"],
        "additionalProperties": false
    })
}
