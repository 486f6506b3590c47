//! MangaDex-backed reader endpoints.

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};

use mangaport_core::modules::chapters::sort_chapters;
use mangaport_core::providers::cover_image_url;
use mangaport_types::models::mangadex::{Chapter, Manga, PageQuality};

use super::error::{ApiError, ApiResult};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;
const CHAPTER_FEED_SIZE: u32 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PagingQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChaptersQuery {
    pub lang: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PagesQuery {
    pub quality: Option<PageQuality>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct MangaSummary {
    pub id: String,
    pub title: String,
    pub cover_url: Option<String>,
    pub status: String,
    pub year: Option<i32>,
}

impl From<&Manga> for MangaSummary {
    fn from(manga: &Manga) -> Self {
        Self {
            id: manga.id.clone(),
            title: manga.preferred_title().unwrap_or("Unknown Title").to_string(),
            cover_url: manga.cover_filename().map(|file| cover_image_url(&manga.id, file)),
            status: manga.attributes.status.clone(),
            year: manga.attributes.year,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct MangaPage {
    pub data: Vec<MangaSummary>,
    pub limit: u32,
    pub offset: u32,
    pub total: u32,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ChapterSummary {
    pub id: String,
    pub volume: Option<String>,
    pub chapter: Option<String>,
    pub title: String,
    pub pages: u32,
    pub language: String,
}

impl From<&Chapter> for ChapterSummary {
    fn from(chapter: &Chapter) -> Self {
        let attrs = &chapter.attributes;
        Self {
            id: chapter.id.clone(),
            volume: attrs.volume.clone(),
            chapter: attrs.chapter.clone(),
            title: attrs.display_title(),
            pages: attrs.pages,
            language: attrs.translated_language.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ChapterPages {
    pub chapter_id: String,
    pub quality: PageQuality,
    pub pages: Vec<String>,
}

fn page_size(limit: Option<u32>) -> u32 {
    limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

pub async fn search_manga(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<MangaPage>> {
    let title = query.q.as_deref().map(str::trim).unwrap_or_default();
    if title.is_empty() {
        return Err(ApiError::BadRequest("Missing search query".to_string()));
    }

    let list = state
        .mangadex()
        .search_manga(title, page_size(query.limit), query.offset.unwrap_or(0))
        .await?;

    Ok(Json(MangaPage {
        data: list.data.iter().map(MangaSummary::from).collect(),
        limit: list.limit,
        offset: list.offset,
        total: list.total,
    }))
}

pub async fn popular_manga(
    State(state): State<AppState>,
    Query(query): Query<PagingQuery>,
) -> ApiResult<Json<MangaPage>> {
    let list = state
        .mangadex()
        .popular_manga(page_size(query.limit), query.offset.unwrap_or(0))
        .await?;

    Ok(Json(MangaPage {
        data: list.data.iter().map(MangaSummary::from).collect(),
        limit: list.limit,
        offset: list.offset,
        total: list.total,
    }))
}

/// Chapters of one manga in reading order.
pub async fn manga_chapters(
    State(state): State<AppState>,
    Path(manga_id): Path<String>,
    Query(query): Query<ChaptersQuery>,
) -> ApiResult<Json<Vec<ChapterSummary>>> {
    let lang = query.lang.as_deref().filter(|l| !l.is_empty()).unwrap_or("en");
    let mut chapters =
        state.mangadex().get_chapters(&manga_id, CHAPTER_FEED_SIZE, 0, lang).await?.data;
    sort_chapters(&mut chapters);
    Ok(Json(chapters.iter().map(ChapterSummary::from).collect()))
}

pub async fn latest_chapters(
    State(state): State<AppState>,
    Query(query): Query<PagingQuery>,
) -> ApiResult<Json<Vec<ChapterSummary>>> {
    let list = state
        .mangadex()
        .latest_updates(page_size(query.limit), query.offset.unwrap_or(0))
        .await?;
    Ok(Json(list.data.iter().map(ChapterSummary::from).collect()))
}

/// Page image URLs. The manifest fetch is rate limited by the gateway.
pub async fn chapter_pages(
    State(state): State<AppState>,
    Path(chapter_id): Path<String>,
    Query(query): Query<PagesQuery>,
) -> ApiResult<Json<ChapterPages>> {
    let quality = query.quality.unwrap_or_default();
    let manifest = state.mangadex().get_chapter_pages(&chapter_id).await?;
    let pages = manifest.page_urls(quality);
    if pages.is_empty() {
        tracing::warn!("Chapter {} has no pages in its manifest", chapter_id);
    }
    Ok(Json(ChapterPages { chapter_id, quality, pages }))
}
