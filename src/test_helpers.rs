//! Shared fixture builders for unit tests.

use crate::config::SiteConfig;
use crate::types::{ImageRecord, Manifest};
use std::collections::BTreeMap;

/// Build an image record with the given ordinal, identifier, and tags.
pub fn image(id: usize, public_id: &str, tags: &[&str]) -> ImageRecord {
    ImageRecord {
        id,
        width: 3000,
        height: 2000,
        public_id: public_id.to_string(),
        format: "jpg".to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        context: BTreeMap::new(),
        blur_placeholder: None,
    }
}

/// Three images with a small tag spread:
///
/// - `A`: camera X only
/// - `B`: camera Y and the Golden Hour theme
/// - `C`: Golden Hour theme only
pub fn sample_images() -> Vec<ImageRecord> {
    vec![
        image(0, "A", &["camera:X"]),
        image(1, "B", &["camera:Y", "theme:Golden Hour"]),
        image(2, "C", &["theme:Golden Hour"]),
    ]
}

/// Wrap images in a manifest carrying the stock config.
pub fn manifest_with(images: Vec<ImageRecord>) -> Manifest {
    Manifest {
        images,
        config: SiteConfig::default(),
    }
}
