//! Kitsu-backed discovery and cross-provider reconciliation.

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};

use mangaport_core::ReconciledManga;
use mangaport_types::models::kitsu::KitsuManga;

use super::error::{ApiError, ApiResult};
use crate::state::AppState;

const DEFAULT_SHELF_SIZE: u32 = 10;
const MAX_SHELF_SIZE: u32 = 20;

#[derive(Debug, Default, Deserialize)]
pub struct ShelfQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ShelfEntry {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub poster_url: Option<String>,
    pub average_rating: Option<String>,
}

impl From<&KitsuManga> for ShelfEntry {
    fn from(manga: &KitsuManga) -> Self {
        let attrs = &manga.attributes;
        Self {
            id: manga.id.clone(),
            slug: attrs.slug.clone(),
            title: manga.display_title().unwrap_or("Unknown Title").to_string(),
            poster_url: attrs.poster_image.as_ref().and_then(|i| i.poster_url()).map(str::to_string),
            average_rating: attrs.average_rating.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Shelves {
    pub trending: Vec<ShelfEntry>,
    pub recent: Vec<ShelfEntry>,
}

/// Trending and recently updated shelves, fetched concurrently.
pub async fn trending(
    State(state): State<AppState>,
    Query(query): Query<ShelfQuery>,
) -> ApiResult<Json<Shelves>> {
    let limit = query.limit.unwrap_or(DEFAULT_SHELF_SIZE).clamp(1, MAX_SHELF_SIZE);
    let kitsu = state.kitsu();
    let (trending, recent) =
        futures::try_join!(kitsu.trending_manga(limit), kitsu.recent_manga(limit))?;

    Ok(Json(Shelves {
        trending: trending.data.iter().map(ShelfEntry::from).collect(),
        recent: recent.data.iter().map(ShelfEntry::from).collect(),
    }))
}

pub async fn reconcile_mangadex(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ReconciledManga>> {
    Ok(Json(state.reconciler().from_mangadex_id(&id).await?))
}

/// 404 when the slug itself is unknown to Kitsu.
pub async fn reconcile_kitsu(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<ReconciledManga>> {
    let reconciled = state.reconciler().from_kitsu_slug(&slug).await?;
    if reconciled.kitsu.is_none() {
        return Err(ApiError::NotFound(format!("No Kitsu manga with slug {}", slug)));
    }
    Ok(Json(reconciled))
}
