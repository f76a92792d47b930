use anyhow::Result;
use lmtools_example::{build_plugin, config::Config, init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    init_logging(&config.logging);

    tracing::info!(fixture = %config.host.fixture.display(), "Summarizing fixture conversation");

    let plugin = build_plugin(&config)?;
    plugin.start();

    let outcome = plugin.handle_summarize().await;
    plugin.stop();
    let summary = outcome?;

    println!("Channel:  {}", summary.channel_id);
    println!("Messages: {} ({})", summary.message_count, summary.time_range);
    println!();
    println!("{}", summary.summary.to_plain_text());

    Ok(())
}
