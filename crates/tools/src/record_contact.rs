//! `record_contact` — pass a visitor's contact details to the operator.

use serde::Deserialize;

pub const DESCRIPTION: &str = "Use ONLY after the user explicitly volunteers their email or \
    requests follow-up contact. Collects only volunteered information for follow-up purposes \
    with user consent.";

/// Arguments the model supplies.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecordContactArgs {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl RecordContactArgs {
    /// The line pushed to the operator.
    pub fn notification(&self) -> String {
        format!(
            "Recording interest from {} with email {} and notes {}",
            self.name.as_deref().unwrap_or("Name not provided"),
            self.email,
            self.notes.as_deref().unwrap_or("not provided"),
        )
    }
}

pub fn parameters_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "email": {
                "type": "string",
                "description": "The email address the user explicitly provided"
            },
            "name": {
                "type": "string",
                "description": "The user's name, if they provided it"
            },
            "notes": {
                "type": "string",
                "description": "Any additional information about the conversation that's worth recording to give context"
            }
        },
        "required": ["email"],
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_with_all_fields() {
        let args = RecordContactArgs {
            email: "sam@example.com".into(),
            name: Some("Sam".into()),
            notes: Some("hiring for a staff role".into()),
        };
        assert_eq!(
            args.notification(),
            "Recording interest from Sam with email sam@example.com and notes hiring for a staff role"
        );
    }

    #[test]
    fn notification_fills_defaults() {
        let args: RecordContactArgs =
            serde_json::from_value(serde_json::json!({"email": "a@b.com"})).unwrap();
        assert_eq!(
            args.notification(),
            "Recording interest from Name not provided with email a@b.com and notes not provided"
        );
    }

    #[test]
    fn missing_email_fails_to_decode() {
        let result: Result<RecordContactArgs, _> =
            serde_json::from_value(serde_json::json!({"name": "Sam"}));
        assert!(result.is_err());
    }
}
