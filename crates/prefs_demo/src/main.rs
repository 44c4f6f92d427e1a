//! Demo host: registers the application, then bumps a launch counter in the shared store.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use futures::executor::block_on;
use platform_host::{application_registry, load_pref_with, save_pref_with};
use platform_host_native::HostConfig;
use prefs_manager::PreferencesManager;
use tracing_subscriber::EnvFilter;

const LAUNCH_COUNT_KEY: &str = "launch_count";

#[derive(Debug, Parser)]
#[command(name = "prefs_demo", about = "Read and update the shared preference store")]
struct Cli {
    /// TOML host config (`app_id`, `data_dir`).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the configured data directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => HostConfig::load(path)?,
        None => HostConfig::default(),
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = Some(data_dir);
    }

    let registry = application_registry();
    registry.listen(|ctx| {
        tracing::info!(
            app_id = ctx.app_id(),
            data_dir = %ctx.data_dir().display(),
            "application ready"
        );
    });
    registry.register(config.application_context()?);

    let manager = PreferencesManager::new(registry, platform_host_native::FilePrefsOpener);
    let prefs = manager.shared_preferences()?;

    let previous: u64 = block_on(load_pref_with(&**prefs, LAUNCH_COUNT_KEY))
        .map_err(anyhow::Error::msg)
        .context("failed to read launch counter")?
        .unwrap_or(0);
    let launches = previous + 1;
    block_on(save_pref_with(&**prefs, LAUNCH_COUNT_KEY, &launches))
        .map_err(anyhow::Error::msg)
        .context("failed to store launch counter")?;

    println!("launch #{launches}");
    Ok(())
}
