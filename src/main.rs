use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;

use marquee::app::{App, AppEvent};
use marquee::catalog::{CatalogClient, ListingMode};
use marquee::config::{Config, TOKEN_ENV_VAR};
use marquee::theme::ThemeVariant;
use marquee::ui;

/// Get the config directory path (~/.config/marquee/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("marquee"))
}

#[derive(Parser, Debug)]
#[command(name = "marquee", about = "Browse new and popular movies from TMDB in the terminal")]
struct Args {
    /// Config file (default: ~/.config/marquee/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Listing shown at startup: new or popular
    #[arg(long, value_name = "MODE")]
    mode: Option<String>,

    /// Color theme: dark or light
    #[arg(long, value_name = "THEME")]
    theme: Option<String>,

    /// Override the catalog API base URL
    #[arg(long, value_name = "URL")]
    api_base: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Log to stderr; stdout belongs to the terminal UI
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => get_config_dir()?.join("config.toml"),
    };
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    // Command-line flags win over the config file
    if let Some(mode) = args.mode {
        config.listing_mode = mode;
    }
    if let Some(theme) = args.theme {
        config.theme = theme;
    }
    if let Some(api_base) = args.api_base {
        config.api_base_url = api_base;
    }

    let mode = ListingMode::from_str_name(&config.listing_mode).unwrap_or_else(|| {
        tracing::warn!(mode = %config.listing_mode, "Unknown listing mode, using new");
        ListingMode::New
    });
    let theme = ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
        tracing::warn!(theme = %config.theme, "Unknown theme, using dark");
        ThemeVariant::Dark
    });

    let token = config.resolve_token(std::env::var(TOKEN_ENV_VAR).ok());
    if token.is_none() {
        tracing::warn!(
            env = TOKEN_ENV_VAR,
            "No API token configured; catalog requests will be rejected"
        );
    }

    let catalog = CatalogClient::new(config.catalog_options(token.clone()))
        .context("Failed to create catalog client")?;

    let mut app = App::new(catalog, mode);
    app.set_theme(theme);
    app.search_debounce_delay = config.search_debounce();
    for warning in app.keybindings.apply_overrides(&config.keybindings) {
        tracing::warn!("{}", warning);
    }
    if token.is_none() {
        app.set_status(format!("No API token: set {} or api_token", TOKEN_ENV_VAR));
    }

    // Create event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}
