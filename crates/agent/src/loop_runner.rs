//! The conversation loop implementation.

use std::sync::Arc;

use tracing::{debug, info, warn};
use vitae_config::AppConfig;
use vitae_core::message::{Message, Role};
use vitae_core::notifier::Notifier;
use vitae_core::persona::Persona;
use vitae_core::provider::{Provider, ProviderRequest, ToolDefinition};
use vitae_core::{Error, Result};
use vitae_tools::ToolDispatcher;

use crate::turn::TurnState;

/// The outcome of one user turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    /// Final assistant text
    pub text: String,

    /// Turn state to hand back with the next message
    pub turn: TurnState,

    /// How many LLM calls asked for tools before the answer
    pub tool_rounds: u32,
}

/// Orchestrates LLM calls and tool execution for a single persona.
///
/// Immutable once built, so one instance can serve many conversations
/// concurrently behind an `Arc`.
pub struct ConversationLoop {
    /// The LLM provider to use
    provider: Arc<dyn Provider>,

    /// Runs the model's tool calls
    dispatcher: ToolDispatcher,

    /// Who the agent speaks as
    persona: Persona,

    /// Descriptors sent with every call
    tools: Vec<ToolDefinition>,

    model: String,
    temperature: f32,
    top_p: Option<f32>,
    max_tokens: Option<u32>,

    /// LLM calls that may request tools before the loop gives up
    max_tool_rounds: u32,

    /// User turns that get the contact reminder
    contact_prompt_turns: Vec<u32>,
}

impl ConversationLoop {
    /// Create a loop with default sampling settings.
    pub fn new(
        provider: Arc<dyn Provider>,
        notifier: Arc<dyn Notifier>,
        persona: Persona,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            dispatcher: ToolDispatcher::new(notifier),
            persona,
            tools: vitae_tools::definitions(),
            model: model.into(),
            temperature: 0.2,
            top_p: Some(0.9),
            max_tokens: Some(500),
            max_tool_rounds: 8,
            contact_prompt_turns: vec![1, 5],
        }
    }

    /// Create a loop with sampling and agent settings taken from config.
    pub fn from_config(
        config: &AppConfig,
        provider: Arc<dyn Provider>,
        notifier: Arc<dyn Notifier>,
        persona: Persona,
    ) -> Self {
        Self::new(provider, notifier, persona, &config.model)
            .with_temperature(config.temperature)
            .with_top_p(config.top_p)
            .with_max_tokens(config.max_tokens)
            .with_max_tool_rounds(config.agent.max_tool_rounds)
            .with_contact_prompt_turns(config.agent.contact_prompt_turns.clone())
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Set the max tokens per LLM response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Set how many tool-requesting LLM calls one turn may make.
    pub fn with_max_tool_rounds(mut self, max: u32) -> Self {
        self.max_tool_rounds = max;
        self
    }

    /// Set which user turns (1-based) carry the contact reminder.
    pub fn with_contact_prompt_turns(mut self, turns: Vec<u32>) -> Self {
        self.contact_prompt_turns = turns;
        self
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the message list for a turn.
    ///
    /// The persona prompt is always first and appears once; any system
    /// messages in the caller's history are dropped.
    fn initial_messages(&self, history: &[Message], user_message: &str, turn: u32) -> Vec<Message> {
        let mut messages = Vec::with_capacity(history.len() + 3);
        messages.push(Message::system(self.persona.system_prompt()));

        let dropped = history.iter().filter(|m| m.role == Role::System).count();
        if dropped > 0 {
            debug!(dropped, "Ignoring system messages in supplied history");
        }
        messages.extend(history.iter().filter(|m| m.role != Role::System).cloned());

        if self.contact_prompt_turns.contains(&turn) {
            debug!(turn, "Adding contact reminder");
            messages.push(Message::system(self.persona.contact_preamble(turn)));
        }

        messages.push(Message::user(user_message));
        messages
    }

    /// Answer one user message.
    ///
    /// `history` holds the prior user/assistant exchanges; `state` is the
    /// caller's turn counter, returned advanced in the reply.
    pub async fn respond(
        &self,
        history: &[Message],
        user_message: &str,
        state: TurnState,
    ) -> Result<ChatReply> {
        let turn = state.advance();
        info!(
            provider = self.provider.name(),
            turn = turn.user_turns,
            history = history.len(),
            "Processing message"
        );

        let mut messages = self.initial_messages(history, user_message, turn.user_turns);
        let mut tool_rounds = 0;

        loop {
            let request = ProviderRequest {
                model: self.model.clone(),
                messages: messages.clone(),
                temperature: self.temperature,
                top_p: self.top_p,
                max_tokens: self.max_tokens,
                tools: self.tools.clone(),
            };

            let response = self.provider.complete(request).await?;

            if let Some(usage) = &response.usage {
                debug!(
                    model = %response.model,
                    tokens = usage.total_tokens,
                    finish = ?response.finish_reason,
                    "LLM call complete"
                );
            }

            if !response.finish_reason.wants_tools() {
                info!(turn = turn.user_turns, tool_rounds, "Answer ready");
                return Ok(ChatReply {
                    text: response.message.content,
                    turn,
                    tool_rounds,
                });
            }

            if tool_rounds >= self.max_tool_rounds {
                warn!(
                    rounds = tool_rounds,
                    "Model kept requesting tools, giving up"
                );
                return Err(Error::ToolRoundLimit {
                    rounds: self.max_tool_rounds,
                });
            }
            tool_rounds += 1;

            let tool_calls = response.message.tool_calls.clone();
            debug!(round = tool_rounds, tool_count = tool_calls.len(), "Executing tool calls");
            messages.push(response.message);

            let results = self.dispatcher.dispatch(&tool_calls).await?;
            messages.extend(results);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use serde_json::json;
    use vitae_core::error::ToolError;

    fn persona() -> Persona {
        Persona::new("Ada Lovelace", Some("Worked on the Analytical Engine.".into()))
    }

    fn build(provider: Arc<dyn Provider>) -> (Arc<RecordingNotifier>, ConversationLoop) {
        let notifier = Arc::new(RecordingNotifier::default());
        let agent = ConversationLoop::new(provider, notifier.clone(), persona(), "mock-model");
        (notifier, agent)
    }

    fn system_count(request: &ProviderRequest, needle: &str) -> usize {
        request
            .messages
            .iter()
            .filter(|m| m.role == Role::System && m.content.contains(needle))
            .count()
    }

    #[tokio::test]
    async fn simple_text_response() {
        let provider = Arc::new(SequentialMockProvider::single_text("Hello! How can I help?"));
        let (notifier, agent) = build(provider.clone());

        let reply = agent
            .respond(&[], "Hello!", TurnState::default())
            .await
            .unwrap();

        assert_eq!(reply.text, "Hello! How can I help?");
        assert_eq!(reply.turn.user_turns, 1);
        assert_eq!(reply.tool_rounds, 0);
        assert_eq!(provider.call_count(), 1);
        assert!(notifier.pushed().is_empty());
    }

    #[tokio::test]
    async fn request_carries_sampling_and_tools() {
        let provider = Arc::new(SequentialMockProvider::single_text("ok"));
        let (_, agent) = build(provider.clone());

        agent.respond(&[], "hi", TurnState::new(2)).await.unwrap();

        let request = &provider.requests()[0];
        assert_eq!(request.model, "mock-model");
        assert!((request.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(request.top_p, Some(0.9));
        assert_eq!(request.max_tokens, Some(500));
        assert_eq!(request.tools.len(), 2);
    }

    #[tokio::test]
    async fn persona_is_first_and_only_once() {
        let provider = Arc::new(SequentialMockProvider::tool_then_answer(
            vec![make_tool_call("c1", "record_unknown_question", json!({"question": "q"}))],
            "done",
        ));
        let (_, agent) = build(provider.clone());

        // History carrying a stale system prompt must not duplicate the persona
        let history = vec![
            Message::system("old prompt"),
            Message::user("earlier"),
            Message::assistant("earlier reply"),
        ];
        agent.respond(&history, "next", TurnState::new(3)).await.unwrap();

        for request in provider.requests() {
            assert_eq!(request.messages[0].role, Role::System);
            assert_eq!(request.messages[0].content, agent.persona().system_prompt());
            assert_eq!(
                request
                    .messages
                    .iter()
                    .filter(|m| m.content == agent.persona().system_prompt())
                    .count(),
                1
            );
            assert!(!request.messages.iter().any(|m| m.content == "old prompt"));
        }
    }

    #[tokio::test]
    async fn history_precedes_user_message() {
        let provider = Arc::new(SequentialMockProvider::single_text("ok"));
        let (_, agent) = build(provider.clone());

        let history = vec![Message::user("first"), Message::assistant("reply")];
        agent.respond(&history, "second", TurnState::new(1)).await.unwrap();

        let messages = &provider.requests()[0].messages;
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1].content, "first");
        assert_eq!(messages[2].content, "reply");
        assert_eq!(messages[3], Message::user("second"));
    }

    #[tokio::test]
    async fn contact_reminder_only_on_configured_turns() {
        for (prior, expected) in [(0, 1), (1, 0), (3, 0), (4, 1), (5, 0)] {
            let provider = Arc::new(SequentialMockProvider::single_text("ok"));
            let (_, agent) = build(provider.clone());

            agent.respond(&[], "hi", TurnState::new(prior)).await.unwrap();

            let request = &provider.requests()[0];
            assert_eq!(
                system_count(request, "This is message"),
                expected,
                "turn {}",
                prior + 1
            );
        }
    }

    #[tokio::test]
    async fn contact_reminder_sits_before_user_message() {
        let provider = Arc::new(SequentialMockProvider::single_text("ok"));
        let (_, agent) = build(provider.clone());

        agent.respond(&[], "hi", TurnState::default()).await.unwrap();

        let messages = &provider.requests()[0].messages;
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, Role::System);
        assert!(messages[1].content.contains("message 1"));
        assert_eq!(messages[2].role, Role::User);
    }

    #[tokio::test]
    async fn tool_round_then_answer() {
        let provider = Arc::new(SequentialMockProvider::tool_then_answer(
            vec![make_tool_call(
                "call_1",
                "record_contact",
                json!({"email": "a@b.com", "name": "Sam"}),
            )],
            "Thanks Sam, I'll be in touch.",
        ));
        let (notifier, agent) = build(provider.clone());

        let reply = agent
            .respond(&[], "I'm Sam, a@b.com", TurnState::default())
            .await
            .unwrap();

        assert_eq!(reply.text, "Thanks Sam, I'll be in touch.");
        assert_eq!(reply.tool_rounds, 1);
        assert_eq!(notifier.pushed().len(), 1);

        // Second call sees the assistant tool request followed by its result
        let second = &provider.requests()[1];
        let n = second.messages.len();
        assert_eq!(second.messages[n - 2].role, Role::Assistant);
        assert_eq!(second.messages[n - 2].tool_calls[0].id, "call_1");
        assert_eq!(second.messages[n - 1].role, Role::Tool);
        assert_eq!(second.messages[n - 1].tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(second.messages[n - 1].content, r#"{"recorded":"ok"}"#);
    }

    #[tokio::test]
    async fn every_request_gets_a_matching_result() {
        let provider = Arc::new(SequentialMockProvider::tool_then_answer(
            vec![
                make_tool_call("a", "record_unknown_question", json!({"question": "q1"})),
                make_tool_call("b", "mystery_tool", json!({})),
                make_tool_call("c", "record_unknown_question", json!({"question": "q1"})),
            ],
            "done",
        ));
        let (notifier, agent) = build(provider.clone());

        agent.respond(&[], "hi", TurnState::new(1)).await.unwrap();

        let second = &provider.requests()[1];
        let results: Vec<_> = second
            .messages
            .iter()
            .filter(|m| m.role == Role::Tool)
            .collect();
        let ids: Vec<_> = results
            .iter()
            .map(|m| m.tool_call_id.as_deref().unwrap())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(results[1].content, "{}");
        // Identical requests are not merged
        assert_eq!(notifier.pushed().len(), 2);
    }

    #[tokio::test]
    async fn round_limit_fails_closed() {
        let call = || vec![make_tool_call("c", "record_unknown_question", json!({"question": "q"}))];
        let provider = Arc::new(SequentialMockProvider::new(vec![
            make_tool_call_response(call()),
            make_tool_call_response(call()),
            make_tool_call_response(call()),
        ]));
        let (notifier, agent) = build(provider.clone());
        let agent = agent.with_max_tool_rounds(2);

        let err = agent
            .respond(&[], "hi", TurnState::new(1))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ToolRoundLimit { rounds: 2 }));
        assert_eq!(provider.call_count(), 3);
        // The third request was never executed
        assert_eq!(notifier.pushed().len(), 2);
    }

    #[tokio::test]
    async fn malformed_arguments_propagate() {
        let provider = Arc::new(SequentialMockProvider::new(vec![make_tool_call_response(
            vec![vitae_core::message::MessageToolCall {
                id: "c1".into(),
                name: "record_contact".into(),
                arguments: "{not json".into(),
            }],
        )]));
        let (notifier, agent) = build(provider);

        let err = agent
            .respond(&[], "hi", TurnState::new(1))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Tool(ToolError::InvalidArguments { .. })));
        assert!(notifier.pushed().is_empty());
    }

    #[tokio::test]
    async fn provider_error_propagates() {
        let (_, agent) = build(Arc::new(FailingProvider));
        let err = agent
            .respond(&[], "hi", TurnState::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
    }

    #[tokio::test]
    async fn from_config_applies_settings() {
        let mut config = AppConfig::default();
        config.model = "gpt-test".into();
        config.temperature = 0.7;
        config.agent.contact_prompt_turns = vec![2];

        let provider = Arc::new(SequentialMockProvider::single_text("ok"));
        let agent = ConversationLoop::from_config(
            &config,
            provider.clone(),
            Arc::new(RecordingNotifier::default()),
            persona(),
        );

        agent.respond(&[], "hi", TurnState::new(1)).await.unwrap();

        let request = &provider.requests()[0];
        assert_eq!(request.model, "gpt-test");
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(system_count(request, "This is message"), 1);
    }
}
