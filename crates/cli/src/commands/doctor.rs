//! `vitae doctor` — Diagnose configuration.

use std::path::Path;

use vitae_config::{AppConfig, credential_hint};
use vitae_core::persona::Persona;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Vitae Doctor — Configuration Check");
    println!("=====================================\n");

    let mut issues = 0;

    let config_file = super::config_file(config_path);
    if config_file.exists() {
        println!("  ✅ Config file found: {}", config_file.display());
    } else {
        println!("  ⚠️  No config file — defaults in use (run `vitae init`)");
        issues += 1;
    }

    let config = match AppConfig::load_with(config_path) {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  Fix the config before running other checks.");
            return Ok(());
        }
    };

    for (label, value) in [
        ("LLM API key", &config.api_key),
        ("Pushover user", &config.notifier.user),
        ("Pushover token", &config.notifier.token),
    ] {
        match credential_hint(value) {
            Some(first) => println!("  ✅ {label} found (starts with {first})"),
            None => {
                println!("  ❌ {label} not set");
                issues += 1;
            }
        }
    }

    let background = Path::new(&config.persona.background_path);
    let persona = Persona::load(&config.persona.name, background);
    if persona.has_background() {
        println!(
            "  ✅ Background loaded from {} (~{} prompt tokens)",
            background.display(),
            persona.estimated_tokens()
        );
    } else {
        println!(
            "  ❌ Background missing or empty: {} — the agent will refuse to answer",
            background.display()
        );
        issues += 1;
    }

    if config.persona.name == AppConfig::default().persona.name {
        println!("  ⚠️  persona.name is still the placeholder");
        issues += 1;
    } else {
        println!("  ✅ Persona: {}", config.persona.name);
    }

    println!("  ✅ Model: {} at {}", config.model, config.api_url);

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
