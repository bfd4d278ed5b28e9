//! `vitae serve` — Start the HTTP chat gateway.

use std::path::Path;
use std::sync::Arc;

pub async fn run(
    config_path: Option<&Path>,
    port_override: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config(config_path)?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    let agent = Arc::new(super::build_agent(&config)?);

    println!("📇 Vitae Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Persona:   {}", agent.persona().name());
    println!("   Model:     {}", agent.model());

    vitae_gateway::start(&config.gateway, agent).await?;

    Ok(())
}
