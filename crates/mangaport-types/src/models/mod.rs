//! Domain models.

pub mod config;
pub mod kitsu;
pub mod mangadex;
pub mod provider;

pub use config::{GatewayConfig, PageLimitConfig, ProviderConfig};
pub use kitsu::{KitsuImage, KitsuList, KitsuManga};
pub use mangadex::{
    AtHomeResponse, Chapter, ChapterList, ChapterResponse, Manga, MangaList, MangaResponse,
    PageQuality,
};
pub use provider::Provider;
