//! Mangaport Server - Headless Daemon
//!
//! A Rust HTTP server that:
//! - Proxies MangaDex and Kitsu on /api/proxy/:provider/*path
//! - Rate-limits the MangaDex page-server endpoint
//! - Serves a small reader API (search, chapters, pages, reconciliation) on /api/*
//!
//! Access via: http://localhost:8046

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

mod api;
mod cli;
mod commands;
mod router;
mod server_utils;
mod state;
#[cfg(test)]
mod test_helpers;

use cli::{Cli, Commands};
use mangaport_core::modules::{config as core_config, logger};
use mangaport_types::GatewayConfig;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_tracing(&cli.log_level);

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => run_server(port).await,
        Commands::Search { query, limit, json } => {
            commands::handle_search(&query, limit, json).await
        },
        Commands::Chapters { manga_id, lang, json } => {
            commands::handle_chapters(&manga_id, &lang, json).await
        },
        Commands::Pages { chapter_id, data_saver, download } => {
            commands::handle_pages(&chapter_id, data_saver, download.as_deref()).await
        },
        Commands::Reconcile { mangadex, kitsu } => commands::handle_reconcile(mangadex, kitsu).await,
        Commands::Status => commands::handle_status(),
        Commands::Config(cmd) => commands::handle_config_command(cmd),
    }
}

async fn run_server(port: Option<u16>) -> Result<()> {
    let mut config = core_config::load_config().context("Failed to load configuration")?;
    apply_port_override(&mut config, port)?;

    let bind_addr = config.get_socket_addr();
    info!("Mangaport Server starting on {}...", bind_addr);
    for provider in &config.providers {
        info!("Provider {} -> {}", provider.name, provider.base_url);
    }
    if config.providers.is_empty() {
        tracing::warn!("No providers configured; every proxy call will fail");
    }

    let state = AppState::new(config)?;
    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    info!("Server listening on http://{}", bind_addr);
    info!("Proxy endpoints at http://{}/api/proxy/", bind_addr);

    axum::serve(listener, app).with_graceful_shutdown(server_utils::shutdown_signal()).await?;

    Ok(())
}

/// `serve --port` goes through the same validation as the config file.
fn apply_port_override(config: &mut GatewayConfig, port: Option<u16>) -> Result<()> {
    if let Some(port) = port {
        config.port = port;
        config.check().context("Invalid --port override")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_override_is_validated() {
        let mut config = GatewayConfig::default();
        assert!(apply_port_override(&mut config, Some(80)).is_err());

        let mut config = GatewayConfig::default();
        assert!(apply_port_override(&mut config, Some(9100)).is_ok());
        assert_eq!(config.port, 9100);

        assert!(apply_port_override(&mut config, None).is_ok());
        assert_eq!(config.port, 9100);
    }
}
