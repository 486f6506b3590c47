use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "mangaport",
    about = "Mangaport - rate-limited gateway for MangaDex and Kitsu",
    version = env!("CARGO_PKG_VERSION"),
    author,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start the HTTP server (default if no command specified)")]
    Serve {
        #[arg(short, long, help = "Override the configured port")]
        port: Option<u16>,
    },

    #[command(about = "Search MangaDex by title")]
    Search {
        #[arg(help = "Title to search for")]
        query: String,

        #[arg(short, long, default_value = "10")]
        limit: u32,

        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "List a manga's chapters in reading order")]
    Chapters {
        #[arg(help = "MangaDex manga id")]
        manga_id: String,

        #[arg(long, default_value = "en", help = "Translated language")]
        lang: String,

        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Resolve a chapter's page image URLs")]
    Pages {
        #[arg(help = "MangaDex chapter id")]
        chapter_id: String,

        #[arg(long, help = "Use compressed data-saver images")]
        data_saver: bool,

        #[arg(long, help = "Download every page into this directory")]
        download: Option<PathBuf>,
    },

    #[command(about = "Match a title across MangaDex and Kitsu")]
    Reconcile {
        #[arg(long, conflicts_with = "kitsu", help = "MangaDex manga id")]
        mangadex: Option<String>,

        #[arg(long, conflicts_with = "mangadex", help = "Kitsu slug")]
        kitsu: Option<String>,
    },

    #[command(about = "Show provider bindings and limiter settings")]
    Status,

    #[command(subcommand, about = "View and write configuration")]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Show the effective configuration")]
    Show {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Write the effective configuration to the data directory")]
    Init,
}
