use anyhow::Result;
use lmtools_example::{build_plugin, config::Config, init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    init_logging(&config.logging);

    tracing::info!(fixture = %config.host.fixture.display(), "Translating fixture conversation");

    let plugin = build_plugin(&config)?;
    plugin.start();

    let outcome = plugin.handle_translate().await;
    plugin.stop();
    let translation = outcome?;

    println!("From {} ({})", translation.username, translation.target_language);
    println!("  {}", translation.original_text);
    println!("  -> {}", translation.translated_text);

    if let Some(details) = translation.detailed_translation.filter(|d| d.has_annotations()) {
        for item in &details.slang_and_idioms {
            println!("  * {}: {} ({})", item.original, item.meaning, item.equivalent);
        }
        for item in &details.abbreviations {
            println!("  * {} = {}: {}", item.abbr, item.full_form, item.meaning);
        }
        for note in &details.grammar_notes {
            println!("  * {}: {}", note.pattern, note.explanation);
        }
    }

    Ok(())
}
