//! Persona — the fixed instruction block that opens every conversation.
//!
//! The prompt is assembled once at startup from the persona's name and the
//! background text, and is never mutated afterwards:
//!
//! 1. **Role & scope** — speak as the persona, career topics only
//! 2. **Grounding** — the Summary is the only source of truth
//! 3. **Unknown handling** — admit gaps, log them with the unknown-question tool
//! 4. **Contact collection** — record contact details only when volunteered
//! 5. **Style**
//! 6. **Summary** — the background text itself
//!
//! A missing background file is not an error: the Summary is replaced by a
//! placeholder telling the model it has nothing to go on.

use std::path::Path;
use tracing::{debug, warn};

use crate::tool::{RECORD_CONTACT, RECORD_UNKNOWN_QUESTION};

/// Stands in for the Summary when the background text could not be loaded.
pub const MISSING_BACKGROUND: &str =
    "Error: Background information file not found. Cannot answer questions.";

/// The persona the agent speaks as.
#[derive(Debug, Clone)]
pub struct Persona {
    name: String,
    background_loaded: bool,
    system_prompt: String,
}

impl Persona {
    /// Build a persona from already-loaded background text.
    ///
    /// `None` or blank text yields the placeholder Summary.
    pub fn new(name: impl Into<String>, background: Option<String>) -> Self {
        let name = name.into();
        let background = background.filter(|b| !b.trim().is_empty());
        let background_loaded = background.is_some();
        let summary = background.as_deref().unwrap_or(MISSING_BACKGROUND);
        let system_prompt = Self::assemble_prompt(&name, summary);

        debug!(
            persona = %name,
            background_loaded,
            prompt_len = system_prompt.len(),
            "Persona prompt assembled"
        );

        Self {
            name,
            background_loaded,
            system_prompt,
        }
    }

    /// Read the background file and build the persona.
    pub fn load(name: impl Into<String>, background_path: &Path) -> Self {
        let background = Self::read_file_safe(background_path);
        if background.is_none() {
            warn!(
                path = %background_path.display(),
                "Background file unavailable, persona will report missing information"
            );
        }
        Self::new(name, background)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether real background text made it into the prompt.
    pub fn has_background(&self) -> bool {
        self.background_loaded
    }

    /// The leading system message for every conversation.
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Reminder injected ahead of selected user turns, nudging the model to
    /// offer follow-up contact when the visitor shows interest.
    pub fn contact_preamble(&self, turn: u32) -> String {
        format!(
            "This is message {turn} from the user in this conversation. If they show real interest \
             in {name}'s work, invite them to share an email address so {name} can follow up. \
             Do not call {RECORD_CONTACT} unless they actually provide one.",
            name = self.name,
        )
    }

    /// Estimate the token count of the system prompt (rough: 4 chars ≈ 1 token).
    pub fn estimated_tokens(&self) -> usize {
        self.system_prompt.len() / 4
    }

    fn read_file_safe(path: &Path) -> Option<String> {
        match std::fs::read_to_string(path) {
            Ok(content) if !content.trim().is_empty() => Some(content),
            Ok(_) => None,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Failed to read background file");
                None
            }
        }
    }

    fn assemble_prompt(name: &str, summary: &str) -> String {
        let mut prompt = String::with_capacity(2048 + summary.len());

        prompt.push_str(&format!(
            "ROLE: You are acting as {name} on {name}'s website. Answer only about {name}'s \
             career, background, skills, and experience.\n\n"
        ));

        prompt.push_str("GROUNDING & ACCURACY:\n");
        prompt.push_str("- Use ONLY the background information in the Summary below as your source of truth.\n");
        prompt.push_str("- Do not speculate, infer, or fabricate. If a fact is not in the Summary, say plainly that you don't have that information.\n");
        prompt.push_str("- If mapping an example to a specific company or role is uncertain, offer 2-3 narrowed options from the Summary and ask the user to pick one.\n");
        prompt.push_str("- Never guess dates, metrics, or details the Summary does not state.\n\n");

        prompt.push_str("UNKNOWN HANDLING:\n");
        prompt.push_str(&format!(
            "- When you cannot answer a career-relevant question from the Summary, say so and call the {RECORD_UNKNOWN_QUESTION} tool with the exact question.\n"
        ));
        prompt.push_str("- Do NOT log off-topic, trivial, or non-career questions.\n\n");

        prompt.push_str("USER EXPERIENCE:\n");
        prompt.push_str("- Be professional, concise, and helpful. No rambling or filler.\n");
        prompt.push_str(&format!(
            "- If the user shows clear interest in {name}'s work (availability, collaboration, hiring, or a request for contact), ask whether they'd like to share an email for follow-up.\n"
        ));
        prompt.push_str(&format!(
            "- Call the {RECORD_CONTACT} tool ONLY after the user explicitly volunteers an email or confirms they want follow-up contact.\n"
        ));
        prompt.push_str(&format!(
            "- Say that contact information is used solely so {name} can follow up directly.\n"
        ));
        prompt.push_str("- For general questions, answer from the Summary without pushing for contact details.\n\n");

        prompt.push_str("SCOPE:\n");
        prompt.push_str(&format!(
            "- Answer career-related questions only. Politely decline anything else beyond basic pleasantries (e.g., \"I'm here to discuss {name}'s professional background\").\n\n"
        ));

        prompt.push_str("STYLE:\n");
        prompt.push_str("- If asked \"how\", summarize the steps the Summary records; if they are not there, say it isn't documented.\n");
        prompt.push_str(&format!("- Stay in character as {name}, professional and authentic.\n\n"));

        prompt.push_str("## Summary\n");
        prompt.push_str(summary.trim());
        prompt.push_str(&format!(
            "\n\nWith this context, please chat with the user as {name}, following the rules above strictly."
        ));

        prompt
    }
}
