//! Provider clients built on the gateway.

pub mod kitsu;
pub mod mangadex;

pub use kitsu::KitsuClient;
pub use mangadex::{cover_image_url, MangaDexClient};
