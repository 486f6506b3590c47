//! Typed Kitsu calls over the gateway.

use mangaport_types::models::kitsu::{KitsuList, KitsuManga};
use mangaport_types::{GatewayError, Provider};
use std::sync::Arc;

use crate::gateway::{Gateway, QueryParams};

#[derive(Clone)]
pub struct KitsuClient {
    gateway: Arc<Gateway>,
}

impl KitsuClient {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub async fn search_manga(&self, text: &str, limit: u32) -> Result<KitsuList, GatewayError> {
        let params = QueryParams::new()
            .nested("filter", [("text", text)])
            .nested("page", [("limit", limit.to_string())]);
        self.gateway.get_json(Provider::Kitsu, "manga", params).await
    }

    /// First manga with this slug, if any.
    pub async fn manga_by_slug(&self, slug: &str) -> Result<Option<KitsuManga>, GatewayError> {
        let params = QueryParams::new().nested("filter", [("slug", slug)]);
        let list: KitsuList = self.gateway.get_json(Provider::Kitsu, "manga", params).await?;
        Ok(list.data.into_iter().next())
    }

    pub async fn trending_manga(&self, limit: u32) -> Result<KitsuList, GatewayError> {
        let params = QueryParams::new().scalar("limit", limit);
        self.gateway.get_json(Provider::Kitsu, "trending/manga", params).await
    }

    pub async fn recent_manga(&self, limit: u32) -> Result<KitsuList, GatewayError> {
        let params = QueryParams::new()
            .scalar("sort", "-updatedAt")
            .nested("page", [("limit", limit.to_string())]);
        self.gateway.get_json(Provider::Kitsu, "manga", params).await
    }
}
