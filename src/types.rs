//! Shared types used across all pipeline stages.
//!
//! These types are serialized to JSON between stages (fetch → enrich →
//! generate) and must be identical across all three modules.

use crate::config::SiteConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One image in a listing snapshot.
///
/// The `id` is a stable 0-based ordinal assigned by listing order (the media
/// library returns assets sorted by identifier descending, and that order is
/// preserved through every derived view). Ids are unique within one snapshot
/// and become the photo page filenames (`p/<id>.html`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Stable ordinal index within this listing snapshot.
    pub id: usize,
    pub width: u32,
    pub height: u32,
    /// Opaque asset identifier understood by the media library's delivery URLs.
    pub public_id: String,
    /// File extension (`jpg`, `png`, ...), appended to delivery URLs.
    pub format: String,
    /// Free-form tags. Facet tags follow the `<facet>:<value>` convention
    /// (e.g. `camera:Mamiya 645`); anything else is tolerated and simply
    /// never matches a facet filter.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Key/value context metadata (captions, alt text) from the library.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,
    /// Base64 `data:` URI for the blur-up placeholder. Absent until the
    /// enrich stage has run; never mutated afterwards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur_placeholder: Option<String>,
}

impl ImageRecord {
    /// Caption from context metadata, if the library has one.
    pub fn caption(&self) -> Option<&str> {
        self.context
            .get("caption")
            .or_else(|| self.context.get("alt"))
            .map(String::as_str)
    }
}

/// Manifest serialized between pipeline stages.
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    pub images: Vec<ImageRecord>,
    pub config: SiteConfig,
}

impl Manifest {
    /// An empty portfolio carrying only config — the degraded form used when
    /// the media library is unreachable or unconfigured.
    pub fn empty(config: SiteConfig) -> Self {
        Self {
            images: Vec::new(),
            config,
        }
    }
}
