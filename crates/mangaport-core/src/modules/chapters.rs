//! Chapter ordering for the reader.

use mangaport_types::models::mangadex::Chapter;
use std::cmp::Ordering;

/// Numeric value of a volume/chapter label; missing or non-numeric is 0.
fn numeric(label: Option<&str>) -> f64 {
    label.and_then(|s| s.trim().parse::<f64>().ok()).filter(|n| n.is_finite()).unwrap_or(0.0)
}

/// Sort by volume, then chapter. Stable, so equal keys keep upstream order.
pub fn sort_chapters(chapters: &mut [Chapter]) {
    chapters.sort_by(|a, b| {
        let volume = numeric(a.attributes.volume.as_deref())
            .total_cmp(&numeric(b.attributes.volume.as_deref()));
        if volume != Ordering::Equal {
            return volume;
        }
        numeric(a.attributes.chapter.as_deref())
            .total_cmp(&numeric(b.attributes.chapter.as_deref()))
    });
}
