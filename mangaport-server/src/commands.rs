use anyhow::{Context, Result};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use std::path::Path;

use mangaport_core::gateway::client_builder::build_http_client;
use mangaport_core::modules::chapters::sort_chapters;
use mangaport_core::modules::config as core_config;
use mangaport_core::modules::pages::{PageImage, PageLoader, RetryPolicy};
use mangaport_types::models::mangadex::PageQuality;
use mangaport_types::{GatewayConfig, Provider};

use crate::cli::ConfigCommands;
use crate::state::AppState;

fn load_config() -> Result<GatewayConfig> {
    core_config::load_config().context("Failed to load configuration")
}

fn cli_state() -> Result<AppState> {
    AppState::new(load_config()?)
}

pub async fn handle_search(query: &str, limit: u32, json: bool) -> Result<()> {
    let state = cli_state()?;
    let list = state.mangadex().search_manga(query, limit, 0).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&list.data)?);
        return Ok(());
    }

    if list.data.is_empty() {
        println!("{}", "No manga found.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Title", "Status", "Year"]);
    for manga in &list.data {
        table.add_row(vec![
            Cell::new(&manga.id),
            Cell::new(manga.preferred_title().unwrap_or("-")),
            Cell::new(&manga.attributes.status),
            Cell::new(manga.attributes.year.map_or_else(|| "-".to_string(), |y| y.to_string())),
        ]);
    }

    println!("{table}");
    println!("\n{} of {} results", list.data.len(), list.total);
    Ok(())
}

pub async fn handle_chapters(manga_id: &str, lang: &str, json: bool) -> Result<()> {
    let state = cli_state()?;
    let mut chapters = state.mangadex().get_chapters(manga_id, 100, 0, lang).await?.data;
    sort_chapters(&mut chapters);

    if json {
        println!("{}", serde_json::to_string_pretty(&chapters)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Vol", "Chapter", "Pages", "ID"]);
    for chapter in &chapters {
        let attrs = &chapter.attributes;
        table.add_row(vec![
            Cell::new(attrs.volume.as_deref().unwrap_or("-")),
            Cell::new(attrs.display_title()),
            Cell::new(attrs.pages),
            Cell::new(&chapter.id),
        ]);
    }

    println!("{table}");
    println!("\n{} chapters", chapters.len());
    Ok(())
}

pub async fn handle_pages(chapter_id: &str, data_saver: bool, download: Option<&Path>) -> Result<()> {
    let state = cli_state()?;
    let quality = if data_saver { PageQuality::DataSaver } else { PageQuality::Data };

    let chapter = state.mangadex().get_chapter(chapter_id).await?;
    let manifest = state.mangadex().get_chapter_pages(chapter_id).await?;
    let pages = manifest.page_urls(quality);

    println!("{}", chapter.data.attributes.display_title().cyan().bold());
    let Some(dir) = download else {
        for url in &pages {
            println!("{url}");
        }
        return Ok(());
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let loader = PageLoader::new(
        build_http_client(state.config().request_timeout_secs)?,
        RetryPolicy::default(),
    );

    let mut fallbacks = 0_usize;
    for (index, url) in pages.iter().enumerate() {
        match loader.load(url).await {
            PageImage::Loaded(bytes) => {
                let target = dir.join(page_file_name(index, url));
                std::fs::write(&target, &bytes)
                    .with_context(|| format!("Failed to write {}", target.display()))?;
                println!("{} {}", "✓".green(), target.display());
            },
            PageImage::Fallback => {
                fallbacks += 1;
                println!("{} page {} unavailable", "✗".red(), index + 1);
            },
        }
    }

    println!("\n{} pages, {} unavailable", pages.len(), fallbacks);
    Ok(())
}

/// `001.png` style names that sort in reading order.
fn page_file_name(index: usize, url: &str) -> String {
    let ext = url
        .rsplit('/')
        .next()
        .and_then(|file| file.rsplit_once('.'))
        .map_or("img", |(_, ext)| ext);
    format!("{:03}.{}", index + 1, ext)
}

pub async fn handle_reconcile(mangadex: Option<String>, kitsu: Option<String>) -> Result<()> {
    let state = cli_state()?;
    let reconciled = match (mangadex, kitsu) {
        (Some(id), None) => state.reconciler().from_mangadex_id(&id).await?,
        (None, Some(slug)) => state.reconciler().from_kitsu_slug(&slug).await?,
        _ => anyhow::bail!("Specify exactly one of --mangadex or --kitsu"),
    };

    let kitsu_label = reconciled
        .kitsu
        .as_ref()
        .map(|k| format!("{} ({})", k.display_title().unwrap_or("-"), k.attributes.slug));
    println!("  MangaDex: {}", reconciled.mangadex_id.as_deref().unwrap_or("-"));
    println!("  Kitsu:    {}", kitsu_label.as_deref().unwrap_or("-"));
    Ok(())
}

pub fn handle_status() -> Result<()> {
    let config = load_config()?;

    println!("{}", "Mangaport Status".cyan().bold());
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Provider", "Role", "Base URL"]);
    for provider in Provider::ALL {
        let base_url = match config.provider(provider) {
            Some(binding) => Cell::new(&binding.base_url).fg(Color::Green),
            None => Cell::new(format!("unset ({})", provider.env_var())).fg(Color::Red),
        };
        table.add_row(vec![Cell::new(provider), Cell::new(provider.role()), base_url]);
    }
    println!("{table}");
    println!(
        "  Page limit: {} per {}ms (+{}ms buffer)",
        config.page_limit.limit, config.page_limit.window_ms, config.page_limit.buffer_ms
    );
    println!("  Version: {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}

pub fn handle_config_command(cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Show { json } => show_config(json),
        ConfigCommands::Init => init_config(),
    }
}

fn show_config(json: bool) -> Result<()> {
    let config = load_config()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        println!("{}", "Gateway Configuration:".cyan().bold());
        println!("  Listen: {}", config.get_socket_addr());
        println!("  Request timeout: {}s", config.request_timeout_secs);
        for binding in &config.providers {
            println!("  {}: {}", binding.name, binding.base_url);
            for name in binding.static_headers.keys() {
                println!("    header {}: {}", name, "****".dimmed());
            }
        }
    }
    Ok(())
}

fn init_config() -> Result<()> {
    let config = load_config()?;
    let data_dir = core_config::get_data_dir()?;
    let path = core_config::save_config(&data_dir, &config)?;
    println!("{} Config written to {}", "✓".green(), path.display());
    Ok(())
}
