//! `vitae init` — write a starter config and background file.

use std::path::Path;

use vitae_config::AppConfig;

const BACKGROUND_TEMPLATE: &str = "\
Replace this file with your own background: a short bio, then your roles
(company, title, dates, what you did and what changed because of it),
skills, education, and anything else visitors are likely to ask about.

The agent answers only from this text, so anything missing here is
something it will say it doesn't know.
";

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config_file = super::config_file(config_path);

    println!("📇 Vitae — First-Time Setup");
    println!("===========================\n");

    if let Some(dir) = config_file.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
            println!("✅ Created config directory: {}", dir.display());
        }
    }

    if config_file.exists() {
        println!("⚠️  Config already exists at: {}", config_file.display());
        println!("   Edit it manually or delete and re-run init.\n");
    } else {
        std::fs::write(&config_file, AppConfig::default_toml())?;
        println!("✅ Created config at: {}", config_file.display());
    }

    let config = AppConfig::load_from(&config_file)?;
    let background = Path::new(&config.persona.background_path);
    if background.exists() {
        println!("   Background file exists: {}", background.display());
    } else {
        std::fs::write(background, BACKGROUND_TEMPLATE)?;
        println!("✅ Created background file: {}", background.display());
    }

    println!("\n📝 Next steps:");
    println!("   1. Set persona.name in {}", config_file.display());
    println!("   2. Write your background into {}", background.display());
    println!("   3. Export OPENAI_API_KEY, PUSHOVER_USER and PUSHOVER_TOKEN");
    println!("   4. Run: vitae chat\n");

    Ok(())
}
