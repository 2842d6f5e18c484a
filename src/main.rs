use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cart_total::{
    cli::{apply_overrides, Args, CliApp},
    utils::Config,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // --verbose beats RUST_LOG, which beats LOG_LEVEL
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()))
        })
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("🛒 cart-total starting...");

    let mut config = Config::from_env().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    apply_overrides(&mut config, &args)?;
    tracing::info!(
        "Configuration loaded for {} environment, server: {}",
        config.environment,
        config.base_url
    );

    let app = CliApp::new(&config).map_err(|e| {
        tracing::error!("Failed to initialize: {}", e);
        e
    })?;
    app.run(args).await?;

    tracing::info!("🛒 cart-total stopped");
    Ok(())
}
