//! Kitsu wire models (metadata-art provider, JSON:API).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KitsuList {
    #[serde(default)]
    pub data: Vec<KitsuManga>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KitsuManga {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub attributes: KitsuMangaAttributes,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct KitsuMangaAttributes {
    pub slug: String,
    pub canonical_title: String,
    pub titles: KitsuTitles,
    pub description: Option<String>,
    pub average_rating: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub chapter_count: Option<u32>,
    pub volume_count: Option<u32>,
    pub manga_type: Option<String>,
    pub serialization: Option<String>,
    pub poster_image: Option<KitsuImage>,
    pub cover_image: Option<KitsuImage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KitsuTitles {
    pub en: Option<String>,
    pub en_jp: Option<String>,
    pub ja_jp: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KitsuImage {
    pub tiny: Option<String>,
    pub small: Option<String>,
    pub medium: Option<String>,
    pub large: Option<String>,
    pub original: Option<String>,
}

impl KitsuManga {
    /// Canonical title, falling back to the romanized one.
    pub fn display_title(&self) -> Option<&str> {
        let attrs = &self.attributes;
        Some(attrs.canonical_title.as_str())
            .filter(|t| !t.is_empty())
            .or(attrs.titles.en_jp.as_deref())
            .or(attrs.titles.en.as_deref())
    }

    /// Every known title, deduplicated, canonical first.
    pub fn all_titles(&self) -> Vec<&str> {
        let titles = &self.attributes.titles;
        let mut out: Vec<&str> = Vec::new();
        for candidate in [
            self.display_title(),
            titles.en.as_deref(),
            titles.en_jp.as_deref(),
            titles.ja_jp.as_deref(),
        ]
        .into_iter()
        .flatten()
        {
            if !candidate.is_empty() && !out.contains(&candidate) {
                out.push(candidate);
            }
        }
        out
    }
}

impl KitsuImage {
    /// Poster preference: medium, then small, then original.
    pub fn poster_url(&self) -> Option<&str> {
        self.medium.as_deref().or(self.small.as_deref()).or(self.original.as_deref())
    }

    /// Banner preference: large, then original.
    pub fn cover_url(&self) -> Option<&str> {
        self.large.as_deref().or(self.original.as_deref())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_kitsu_list() {
        let list: KitsuList = serde_json::from_value(serde_json::json!({
            "data": [{
                "id": "11",
                "type": "manga",
                "attributes": {
                    "slug": "naruto",
                    "canonicalTitle": "Naruto",
                    "titles": {"en": "Naruto", "en_jp": "NARUTO", "ja_jp": "ナルト"},
                    "averageRating": "80.1",
                    "chapterCount": 700,
                    "posterImage": {"small": "s.jpg", "original": "o.jpg"},
                    "coverImage": null
                }
            }],
            "meta": {"count": 1}
        }))
        .unwrap();

        let manga = &list.data[0];
        assert_eq!(manga.display_title(), Some("Naruto"));
        assert_eq!(manga.all_titles(), vec!["Naruto", "NARUTO", "ナルト"]);
        assert_eq!(manga.attributes.chapter_count, Some(700));
        assert_eq!(
            manga.attributes.poster_image.as_ref().and_then(KitsuImage::poster_url),
            Some("s.jpg")
        );
        assert!(manga.attributes.cover_image.is_none());
    }

    #[test]
    fn test_display_title_fallback() {
        let manga = KitsuManga {
            id: "1".to_string(),
            kind: "manga".to_string(),
            attributes: KitsuMangaAttributes {
                titles: KitsuTitles { en_jp: Some("Shingeki no Kyojin".to_string()), ..KitsuTitles::default() },
                ..KitsuMangaAttributes::default()
            },
        };
        assert_eq!(manga.display_title(), Some("Shingeki no Kyojin"));
    }
}
