//! Typed MangaDex calls over the gateway.

use mangaport_types::models::mangadex::{
    AtHomeResponse, ChapterList, ChapterResponse, MangaList, MangaResponse,
};
use mangaport_types::{GatewayError, Provider};
use std::sync::Arc;

use crate::gateway::{Gateway, QueryParams};

const COVERS_BASE_URL: &str = "https://uploads.mangadex.org/covers";
const CONTENT_RATINGS: [&str; 3] = ["safe", "suggestive", "erotica"];

pub fn cover_image_url(manga_id: &str, filename: &str) -> String {
    format!("{}/{}/{}", COVERS_BASE_URL, manga_id, filename)
}

#[derive(Clone)]
pub struct MangaDexClient {
    gateway: Arc<Gateway>,
}

impl MangaDexClient {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub async fn search_manga(
        &self,
        title: &str,
        limit: u32,
        offset: u32,
    ) -> Result<MangaList, GatewayError> {
        let params = QueryParams::new()
            .scalar("title", title)
            .scalar("limit", limit)
            .scalar("offset", offset)
            .list("includes", ["cover_art", "author", "artist"])
            .list("contentRating", CONTENT_RATINGS)
            .nested("order", [("relevance", "desc")]);
        self.gateway.get_json(Provider::MangaDex, "manga", params).await
    }

    pub async fn get_manga(&self, id: &str) -> Result<MangaResponse, GatewayError> {
        let params = QueryParams::new().list("includes", ["cover_art", "author", "artist", "tag"]);
        self.gateway.get_json(Provider::MangaDex, &format!("manga/{}", id), params).await
    }

    pub async fn get_chapters(
        &self,
        manga_id: &str,
        limit: u32,
        offset: u32,
        translated_language: &str,
    ) -> Result<ChapterList, GatewayError> {
        let params = QueryParams::new()
            .scalar("limit", limit)
            .scalar("offset", offset)
            .list("manga", [manga_id])
            .list("translatedLanguage", [translated_language])
            .nested("order", [("volume", "asc"), ("chapter", "asc")]);
        self.gateway.get_json(Provider::MangaDex, "chapter", params).await
    }

    pub async fn get_chapter(&self, id: &str) -> Result<ChapterResponse, GatewayError> {
        let params = QueryParams::new().list("includes", ["scanlation_group"]);
        self.gateway.get_json(Provider::MangaDex, &format!("chapter/{}", id), params).await
    }

    /// Page-server manifest. Goes through the page limiter.
    pub async fn get_chapter_pages(&self, chapter_id: &str) -> Result<AtHomeResponse, GatewayError> {
        self.gateway
            .get_json(
                Provider::MangaDex,
                &format!("at-home/server/{}", chapter_id),
                QueryParams::new(),
            )
            .await
    }

    pub async fn popular_manga(&self, limit: u32, offset: u32) -> Result<MangaList, GatewayError> {
        let params = QueryParams::new()
            .scalar("limit", limit)
            .scalar("offset", offset)
            .list("includes", ["cover_art"])
            .list("contentRating", CONTENT_RATINGS)
            .nested("order", [("followedCount", "desc")]);
        self.gateway.get_json(Provider::MangaDex, "manga", params).await
    }

    pub async fn latest_updates(&self, limit: u32, offset: u32) -> Result<ChapterList, GatewayError> {
        let params = QueryParams::new()
            .scalar("limit", limit)
            .scalar("offset", offset)
            .list("includes", ["cover_art", "manga"])
            .list("contentRating", CONTENT_RATINGS)
            .nested("order", [("updatedAt", "desc")]);
        self.gateway.get_json(Provider::MangaDex, "chapter", params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_image_url() {
        assert_eq!(
            cover_image_url("abc", "cover.jpg"),
            "https://uploads.mangadex.org/covers/abc/cover.jpg"
        );
    }
}
