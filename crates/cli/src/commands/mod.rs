pub mod chat;
pub mod doctor;
pub mod init;
pub mod serve;
pub mod tools;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use vitae_agent::ConversationLoop;
use vitae_config::AppConfig;
use vitae_core::persona::Persona;
use vitae_notify::PushoverNotifier;
use vitae_providers::OpenAiCompatProvider;

/// The config file a command reads or writes.
pub fn config_file(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"))
}

pub fn load_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    AppConfig::load_with(path).map_err(|e| format!("Failed to load config: {e}").into())
}

/// Wire provider, notifier and persona into a conversation loop.
pub fn build_agent(config: &AppConfig) -> Result<ConversationLoop, Box<dyn std::error::Error>> {
    config.report_credentials();

    let provider = Arc::new(OpenAiCompatProvider::from_config(config)?);
    let notifier = Arc::new(PushoverNotifier::from_config(config)?);
    let persona = Persona::load(
        &config.persona.name,
        Path::new(&config.persona.background_path),
    );

    Ok(ConversationLoop::from_config(config, provider, notifier, persona))
}
