//! Cross-provider identity matching.
//!
//! Kitsu supplies metadata and artwork, MangaDex supplies chapters. The two
//! catalogues share no identifiers, so a title on one side is looked up on
//! the other by fuzzy title comparison.

use mangaport_types::models::kitsu::KitsuManga;
use mangaport_types::models::mangadex::Manga;
use mangaport_types::GatewayError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::gateway::Gateway;
use crate::providers::{KitsuClient, MangaDexClient};

pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.6;
const CANDIDATE_LIMIT: u32 = 10;

/// Lower-case, punctuation to spaces, whitespace collapsed.
pub fn normalize_title(title: &str) -> String {
    let mut spaced = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_alphanumeric() {
            spaced.extend(c.to_lowercase());
        } else {
            spaced.push(' ');
        }
    }
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Kitsu-style slug: `"One Piece!"` -> `"one-piece"`.
pub fn slugify(title: &str) -> String {
    normalize_title(title).replace(' ', "-")
}

/// Token-set Dice coefficient in `[0, 1]`.
pub fn title_similarity(a: &str, b: &str) -> f64 {
    let a = normalize_title(a);
    let b = normalize_title(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let left: BTreeSet<&str> = a.split(' ').collect();
    let right: BTreeSet<&str> = b.split(' ').collect();
    let shared = left.intersection(&right).count();
    (2 * shared) as f64 / (left.len() + right.len()) as f64
}

/// Highest-scoring candidate at or above `threshold`.
///
/// A candidate scores as its best title. Ties keep the earlier candidate, so
/// provider relevance order breaks them.
pub fn best_match<'a, T, F>(
    query: &str,
    candidates: &'a [T],
    titles: F,
    threshold: f64,
) -> Option<(&'a T, f64)>
where
    F: Fn(&T) -> Vec<&str>,
{
    let mut best: Option<(&'a T, f64)> = None;
    for candidate in candidates {
        let score = titles(candidate)
            .into_iter()
            .map(|t| title_similarity(query, t))
            .fold(0.0_f64, f64::max);
        if score < threshold {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {},
            _ => best = Some((candidate, score)),
        }
    }
    best
}

/// Both sides of one title, either possibly unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledManga {
    pub kitsu: Option<KitsuManga>,
    pub mangadex_id: Option<String>,
}

pub struct Reconciler {
    mangadex: MangaDexClient,
    kitsu: KitsuClient,
    threshold: f64,
}

impl Reconciler {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self {
            mangadex: MangaDexClient::new(gateway.clone()),
            kitsu: KitsuClient::new(gateway),
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// MangaDex id -> Kitsu entry via the MangaDex title.
    pub async fn from_mangadex_id(&self, id: &str) -> Result<ReconciledManga, GatewayError> {
        let manga = self.mangadex.get_manga(id).await?.data;
        let mut result = ReconciledManga { kitsu: None, mangadex_id: Some(manga.id.clone()) };

        let Some(title) = manga.preferred_title() else {
            tracing::debug!("MangaDex {} has no title to reconcile", id);
            return Ok(result);
        };

        let candidates = self.kitsu.search_manga(title, CANDIDATE_LIMIT).await?.data;
        if let Some((found, score)) =
            best_match(title, &candidates, KitsuManga::all_titles, self.threshold)
        {
            tracing::debug!("Reconciled MangaDex {} -> Kitsu {} ({:.2})", id, found.id, score);
            result.kitsu = Some(found.clone());
        } else {
            tracing::info!("No Kitsu match for MangaDex {} ({})", id, title);
        }
        Ok(result)
    }

    /// Kitsu slug -> MangaDex id via the canonical title.
    pub async fn from_kitsu_slug(&self, slug: &str) -> Result<ReconciledManga, GatewayError> {
        let Some(kitsu) = self.kitsu.manga_by_slug(slug).await? else {
            tracing::info!("Kitsu slug {} not found", slug);
            return Ok(ReconciledManga { kitsu: None, mangadex_id: None });
        };

        let mangadex_id = match kitsu.display_title() {
            Some(title) => {
                let candidates =
                    self.mangadex.search_manga(title, CANDIDATE_LIMIT, 0).await?.data;
                let found = best_match(title, &candidates, Manga::all_titles, self.threshold);
                if found.is_none() {
                    tracing::info!("No MangaDex match for Kitsu {} ({})", slug, title);
                }
                found.map(|(m, _)| m.id.clone())
            },
            None => None,
        };

        Ok(ReconciledManga { kitsu: Some(kitsu), mangadex_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("  One-Punch   Man! "), "one punch man");
        assert_eq!(normalize_title("Shingeki no Kyojin"), "shingeki no kyojin");
        assert_eq!(normalize_title("!!!"), "");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("One Piece!"), "one-piece");
        assert_eq!(slugify("Kaguya-sama: Love is War"), "kaguya-sama-love-is-war");
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(title_similarity("Berserk", "berserk"), 1.0);
        assert_eq!(title_similarity("Berserk", "Monster"), 0.0);
        assert_eq!(title_similarity("", "Monster"), 0.0);

        let partial = title_similarity("Attack on Titan", "Attack on Titan: Before the Fall");
        assert!(partial > 0.6 && partial < 1.0);
    }

    #[test]
    fn test_best_match_threshold_and_ties() {
        let candidates = vec!["Naruto Gaiden", "Naruto", "naruto", "Boruto"];
        let found = best_match("Naruto", &candidates, |c| vec![*c], DEFAULT_MATCH_THRESHOLD);
        let (winner, score) = found.unwrap();
        assert_eq!(score, 1.0);
        assert!(std::ptr::eq(winner, &candidates[1]));

        assert!(best_match("Vagabond", &candidates, |c| vec![*c], 0.6).is_none());
    }

    #[test]
    fn test_best_match_uses_best_title() {
        let candidates = vec![vec!["Shingeki no Kyojin", "Attack on Titan"]];
        let found = best_match("Attack on Titan", &candidates, |c| c.clone(), 0.6);
        assert_eq!(found.map(|(_, s)| s), Some(1.0));
    }
}
