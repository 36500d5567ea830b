//! Waymark CLI Application
//!
//! Command-line interface for tagging places and navigating back to them.

mod args;
mod cli;
mod display;
mod renderer;

use anyhow::{Context, Result};
use args::Args;
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;
use waymark_core::{RegistryBuilder, RemoteConfig};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        remote_url,
        remote_collection,
        remote_token,
        no_color,
        command,
    } = Args::parse();

    let remote = remote_url.map(|url| {
        RemoteConfig::new(url)
            .with_collection(remote_collection)
            .with_auth_token(remote_token)
    });
    let remote_configured = remote.is_some();

    let registry = RegistryBuilder::new()
        .with_database_path(database_file)
        .with_remote(remote)
        .build()
        .await
        .context("Failed to initialize location registry")?;

    info!("Waymark started");

    Cli::new(registry, TerminalRenderer::new(!no_color), remote_configured)
        .run(command)
        .await
}
