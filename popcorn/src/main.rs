use anyhow::Result;
use clap::Parser;

use popcorn::App;

/// Terminal client for the popcorn movie service
#[derive(Debug, Parser)]
#[command(name = "popcorn", version, about)]
struct Cli {
    /// Location to open, e.g. the URL the identity provider redirected to
    /// (http://localhost:3000/?code=...)
    #[arg(long, env = "POPCORN_LOCATION")]
    location: Option<String>,

    /// Path to the TOML config file
    #[arg(long, env = "POPCORN_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let settings = popcorn_auth::load_settings(cli.config.as_deref())?;

    // Logging is initialized in App::run() with buffer support
    App::new(settings, cli.location).run().await?;

    Ok(())
}
