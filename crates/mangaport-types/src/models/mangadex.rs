//! MangaDex wire models (primary-content provider).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Localized string map, e.g. `{"en": "Naruto", "ja-ro": "Naruto"}`.
pub type LocalizedString = BTreeMap<String, String>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MangaResponse {
    pub result: String,
    #[serde(default)]
    pub response: String,
    pub data: Manga,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MangaList {
    pub result: String,
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub data: Vec<Manga>,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Manga {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub attributes: MangaAttributes,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MangaAttributes {
    pub title: LocalizedString,
    pub alt_titles: Vec<LocalizedString>,
    pub description: LocalizedString,
    pub original_language: String,
    pub last_volume: Option<String>,
    pub last_chapter: Option<String>,
    pub publication_demographic: Option<String>,
    pub status: String,
    pub year: Option<i32>,
    pub content_rating: String,
    pub tags: Vec<Tag>,
    pub available_translated_languages: Vec<Option<String>>,
    pub latest_uploaded_chapter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    pub id: String,
    #[serde(default)]
    pub attributes: TagAttributes,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TagAttributes {
    pub name: LocalizedString,
    pub group: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Relationship {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub related: Option<String>,
    #[serde(default)]
    pub attributes: Option<serde_json::Value>,
}

impl Manga {
    /// English title, then romanized Japanese, then whatever comes first.
    pub fn preferred_title(&self) -> Option<&str> {
        let title = &self.attributes.title;
        title
            .get("en")
            .or_else(|| title.get("ja-ro"))
            .or_else(|| title.values().next())
            .map(String::as_str)
    }

    /// Main title followed by every alt title, deduplicated.
    pub fn all_titles(&self) -> Vec<&str> {
        let mut titles: Vec<&str> = Vec::new();
        if let Some(main) = self.preferred_title() {
            titles.push(main);
        }
        for value in self
            .attributes
            .title
            .values()
            .chain(self.attributes.alt_titles.iter().flat_map(|m| m.values()))
        {
            if !titles.contains(&value.as_str()) {
                titles.push(value);
            }
        }
        titles
    }

    /// Cover file name from an expanded `cover_art` relationship.
    pub fn cover_filename(&self) -> Option<&str> {
        self.relationships
            .iter()
            .find(|r| r.kind == "cover_art")
            .and_then(|r| r.attributes.as_ref())
            .and_then(|a| a.get("fileName"))
            .and_then(|f| f.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChapterResponse {
    pub result: String,
    pub data: Chapter,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChapterList {
    pub result: String,
    #[serde(default)]
    pub data: Vec<Chapter>,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chapter {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub attributes: ChapterAttributes,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ChapterAttributes {
    pub title: Option<String>,
    pub volume: Option<String>,
    pub chapter: Option<String>,
    pub pages: u32,
    pub translated_language: String,
    pub external_url: Option<String>,
    pub publish_at: String,
    pub readable_at: String,
}

impl ChapterAttributes {
    /// `Chapter 12: Title`, with `?` for a missing number.
    pub fn display_title(&self) -> String {
        let number = self.chapter.as_deref().unwrap_or("?");
        match self.title.as_deref().filter(|t| !t.is_empty()) {
            Some(title) => format!("Chapter {}: {}", number, title),
            None => format!("Chapter {}", number),
        }
    }
}

/// Image quality served by the page server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageQuality {
    #[default]
    Data,
    DataSaver,
}

impl PageQuality {
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::DataSaver => "data-saver",
        }
    }
}

/// `GET /at-home/server/{chapterId}` payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AtHomeResponse {
    #[serde(default)]
    pub result: String,
    pub base_url: String,
    #[serde(default)]
    pub chapter: Option<AtHomeChapter>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AtHomeChapter {
    pub hash: String,
    pub data: Vec<String>,
    pub data_saver: Vec<String>,
}

impl AtHomeResponse {
    /// Absolute page image URLs; empty when the manifest is incomplete.
    pub fn page_urls(&self, quality: PageQuality) -> Vec<String> {
        let Some(chapter) = self.chapter.as_ref() else {
            return Vec::new();
        };
        if chapter.hash.is_empty() {
            return Vec::new();
        }
        let files = match quality {
            PageQuality::Data => &chapter.data,
            PageQuality::DataSaver => &chapter.data_saver,
        };
        let base = self.base_url.trim_end_matches('/');
        files
            .iter()
            .map(|file| format!("{}/{}/{}/{}", base, quality.path_segment(), chapter.hash, file))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn manga_json() -> serde_json::Value {
        serde_json::json!({
            "id": "a1c7c817-4e59-43b7-9365-09675a149a6f",
            "type": "manga",
            "attributes": {
                "title": {"en": "One Piece"},
                "altTitles": [{"ja": "ワンピース"}, {"en": "One Piece"}],
                "description": {"en": "Pirates."},
                "status": "ongoing",
                "year": 1997,
                "contentRating": "safe",
                "tags": [],
                "availableTranslatedLanguages": ["en", null]
            },
            "relationships": [
                {"id": "x", "type": "author"},
                {"id": "y", "type": "cover_art", "attributes": {"fileName": "cover.jpg"}}
            ]
        })
    }

    #[test]
    fn test_manga_titles_and_cover() {
        let manga: Manga = serde_json::from_value(manga_json()).unwrap();
        assert_eq!(manga.preferred_title(), Some("One Piece"));
        assert_eq!(manga.all_titles(), vec!["One Piece", "ワンピース"]);
        assert_eq!(manga.cover_filename(), Some("cover.jpg"));
    }

    #[test]
    fn test_preferred_title_falls_back() {
        let mut manga: Manga = serde_json::from_value(manga_json()).unwrap();
        manga.attributes.title = LocalizedString::from([("ko".to_string(), "원피스".to_string())]);
        assert_eq!(manga.preferred_title(), Some("원피스"));
    }

    #[test]
    fn test_page_urls() {
        let payload: AtHomeResponse = serde_json::from_value(serde_json::json!({
            "result": "ok",
            "baseUrl": "https://uploads.mangadex.org",
            "chapter": {
                "hash": "abc123",
                "data": ["1.png", "2.png"],
                "dataSaver": ["1.jpg"]
            }
        }))
        .unwrap();

        assert_eq!(
            payload.page_urls(PageQuality::Data),
            vec![
                "https://uploads.mangadex.org/data/abc123/1.png",
                "https://uploads.mangadex.org/data/abc123/2.png"
            ]
        );
        assert_eq!(
            payload.page_urls(PageQuality::DataSaver),
            vec!["https://uploads.mangadex.org/data-saver/abc123/1.jpg"]
        );
    }

    #[test]
    fn test_page_urls_missing_chapter() {
        let payload: AtHomeResponse =
            serde_json::from_value(serde_json::json!({"baseUrl": "https://x"})).unwrap();
        assert!(payload.page_urls(PageQuality::Data).is_empty());
    }

    #[test]
    fn test_chapter_display_title() {
        let attrs = ChapterAttributes {
            chapter: Some("12".to_string()),
            title: Some("Storm".to_string()),
            ..ChapterAttributes::default()
        };
        assert_eq!(attrs.display_title(), "Chapter 12: Storm");
        assert_eq!(ChapterAttributes::default().display_title(), "Chapter ?");
    }
}
