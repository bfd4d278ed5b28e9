//! `vitae chat` — Interactive or single-message chat mode.

use std::io::Write;
use std::path::Path;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::error;
use vitae_agent::{ChatReply, TurnState};
use vitae_core::message::Message;
use vitae_gateway::APOLOGY;

pub async fn run(
    config_path: Option<&Path>,
    message: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let agent = super::build_agent(&config)?;

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let result = agent.respond(&[], &msg, TurnState::default()).await;
        eprint!("\r              \r");
        let (answer, _) = settle_turn(&mut Vec::new(), &msg, TurnState::default(), result);
        println!("{answer}");
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  Vitae — Interactive Mode");
    println!();
    println!("  Persona:   {}", agent.persona().name());
    println!("  Model:     {}", agent.model());
    println!(
        "  Background: {}",
        if agent.persona().has_background() {
            "loaded"
        } else {
            "missing"
        }
    );
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut history: Vec<Message> = Vec::new();
    let mut state = TurnState::default();

    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "exit" | "quit") {
            break;
        }

        eprint!("  ...");
        let result = agent.respond(&history, input, state).await;
        eprint!("\r     \r");
        println!();

        let (answer, next) = settle_turn(&mut history, input, state, result);
        state = next;

        for line in answer.lines() {
            println!("  Assistant > {line}");
        }
        println!();
    }

    println!();
    println!("  Goodbye! 👋");
    println!();

    Ok(())
}

/// Fold one turn's outcome into the session. Returns the text to show and
/// the next turn state.
///
/// A failed turn still counts, shows the apology, and leaves history alone;
/// the real error only goes to the log.
fn settle_turn(
    history: &mut Vec<Message>,
    input: &str,
    state: TurnState,
    result: vitae_core::Result<ChatReply>,
) -> (String, TurnState) {
    match result {
        Ok(reply) => {
            history.push(Message::user(input));
            history.push(Message::assistant(reply.text.clone()));
            (reply.text, reply.turn)
        }
        Err(e) => {
            error!(error = %e, "Chat turn failed");
            (APOLOGY.to_string(), state.advance())
        }
    }
}
