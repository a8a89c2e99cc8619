//! Tag-overlap scoring over the help tile index.

use serde::{Deserialize, Serialize};

/// One entry of the tag index: a help article tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpTile {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub redirect_url: Option<String>,
    /// Comma-separated keywords.
    #[serde(default)]
    pub tags: String,
}

/// A tile together with its overlap score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredTile {
    pub tile: HelpTile,
    pub score: usize,
}

/// Counts the tile tags that occur as substrings of `normalized`.
///
/// Tags are trimmed and lower-cased; blank tags never count.
pub fn score_tags(tags: &str, normalized: &str) -> usize {
    tags.split(',')
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty() && normalized.contains(tag.as_str()))
        .count()
}

/// Returns the tiles sharing the highest non-zero score, in index order.
///
/// `normalized` must already be trimmed and lower-cased.
pub fn rank_by_tags(normalized: &str, tiles: Vec<HelpTile>) -> Vec<ScoredTile> {
    let scored: Vec<ScoredTile> = tiles
        .into_iter()
        .map(|tile| {
            let score = score_tags(&tile.tags, normalized);
            ScoredTile { tile, score }
        })
        .collect();

    let best = scored.iter().map(|s| s.score).max().unwrap_or(0);
    if best == 0 {
        return Vec::new();
    }

    scored.into_iter().filter(|s| s.score == best).collect()
}
