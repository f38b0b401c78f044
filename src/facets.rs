//! Facet derivation and filtering over free-form tag strings.
//!
//! Tags follow the `<facet>:<value>` convention (`camera:Mamiya 645`,
//! `film:Portra 400`, `theme:Golden Hour`). Three fixed facets exist; their
//! option lists are recomputed from the current image sequence on demand —
//! extraction and filtering are pure, so there is nothing to invalidate.
//!
//! Matching is case-insensitive throughout, but option lists keep original
//! casing (dedup is by exact string, not case-folded). Untagged or malformed
//! tags are tolerated: they simply never match any facet.

use crate::types::ImageRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Tag prefix for the camera facet.
pub const CAMERA_PREFIX: &str = "camera:";
/// Tag prefix for the film facet.
pub const FILM_PREFIX: &str = "film:";
/// Tag prefix for the theme facet.
pub const THEME_PREFIX: &str = "theme:";

/// Extract the sorted, deduplicated option list for one facet prefix.
///
/// Scans every image's tags, keeps those whose lowercased form starts with
/// the lowercased prefix, dedups by exact string (original casing kept), and
/// returns them sorted ascending. Runs in O(images × tags); an empty input
/// or no matching tags yields an empty list, never an error.
pub fn extract_facet(images: &[ImageRecord], prefix: &str) -> Vec<String> {
    let prefix = prefix.to_lowercase();
    let mut options = BTreeSet::new();
    for image in images {
        for tag in &image.tags {
            if tag.to_lowercase().starts_with(&prefix) {
                options.insert(tag.clone());
            }
        }
    }
    options.into_iter().collect()
}

/// The three facet option lists, derived from one image sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetOptions {
    pub camera: Vec<String>,
    pub film: Vec<String>,
    pub theme: Vec<String>,
}

impl FacetOptions {
    pub fn derive(images: &[ImageRecord]) -> Self {
        Self {
            camera: extract_facet(images, CAMERA_PREFIX),
            film: extract_facet(images, FILM_PREFIX),
            theme: extract_facet(images, THEME_PREFIX),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.camera.is_empty() && self.film.is_empty() && self.theme.is_empty()
    }
}

/// Active facet selections. An unset slot imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetSelection {
    pub camera: Option<String>,
    pub film: Option<String>,
    pub theme: Option<String>,
}

impl FacetSelection {
    fn active_slots(&self) -> impl Iterator<Item = &str> {
        [&self.camera, &self.film, &self.theme]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Return the images satisfying every active facet slot.
///
/// AND semantics across facets: an image's lowercased tag set must contain
/// the lowercased selection of each active slot. The result keeps the
/// original relative order (stable filter, not a re-sort); an empty
/// selection returns everything. Falling back to the full set when the
/// result is empty is the rendering layer's policy, not this engine's.
pub fn filter<'a>(images: &'a [ImageRecord], selection: &FacetSelection) -> Vec<&'a ImageRecord> {
    images
        .iter()
        .filter(|image| {
            selection.active_slots().all(|wanted| {
                let wanted = wanted.to_lowercase();
                image.tags.iter().any(|tag| tag.to_lowercase() == wanted)
            })
        })
        .collect()
}
