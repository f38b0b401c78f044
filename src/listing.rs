//! Process-lifetime listing cache and image record construction.
//!
//! The listing query is the one external call every route needs, so it runs
//! at most once per process: the first `get_or_fetch` performs the search and
//! memoizes the raw result with no expiry and no invalidation hook. Repeated
//! calls return the same in-memory snapshot even if the library changes —
//! the acceptable staleness window is "until process restart".
//!
//! Concurrent first calls are single-flighted through
//! [`tokio::sync::OnceCell`], so two racing requests still issue exactly one
//! search. The cache is an explicit object handed to the stage drivers, not
//! ambient global state.
//!
//! Record construction assigns each asset a stable 0-based ordinal `id` in
//! listing order. The library sorts by identifier descending and that order
//! is preserved through every derived view (facets, filters, photo pages).

use crate::config::MediaConfig;
use crate::media::{AssetRecord, MediaError, MediaLibrary, SearchQuery};
use crate::types::ImageRecord;
use tokio::sync::OnceCell;

/// Memoizes the raw listing for the lifetime of the process.
#[derive(Default)]
pub struct ListingCache {
    listing: OnceCell<Vec<AssetRecord>>,
}

impl ListingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached listing, fetching it on first use.
    ///
    /// A missing folder setting yields an empty listing without touching the
    /// network — an unconfigured deploy degrades, it never fails. Search
    /// errors propagate to the caller untouched (no retry); the next call
    /// will try again since nothing was cached.
    pub async fn get_or_fetch<L: MediaLibrary>(
        &self,
        library: &L,
        media: &MediaConfig,
    ) -> Result<&[AssetRecord], MediaError> {
        let listing = self
            .listing
            .get_or_try_init(|| async {
                let Some(expression) = media.folder_expression() else {
                    return Ok(Vec::new());
                };
                let query = SearchQuery::expression(expression)
                    .sort_by("public_id", "desc")
                    .with_field("tags")
                    .with_field("context")
                    .max_results(media.max_results);
                library.search(&query).await.map(|r| r.resources)
            })
            .await?;
        Ok(listing)
    }
}

/// Build image records from a raw listing, assigning stable ordinal ids.
pub fn build_records(assets: &[AssetRecord]) -> Vec<ImageRecord> {
    assets
        .iter()
        .enumerate()
        .map(|(id, asset)| ImageRecord {
            id,
            width: asset.width,
            height: asset.height,
            public_id: asset.public_id.clone(),
            format: asset.format.clone(),
            tags: asset.tags.clone(),
            context: asset.context.clone(),
            blur_placeholder: None,
        })
        .collect()
}

/// Fetch the listing through the cache and build image records from it.
pub async fn fetch_records<L: MediaLibrary>(
    cache: &ListingCache,
    library: &L,
    media: &MediaConfig,
) -> Result<Vec<ImageRecord>, MediaError> {
    let assets = cache.get_or_fetch(library, media).await?;
    Ok(build_records(assets))
}

/// Look up a photo by its ordinal id.
///
/// `None` is the standard not-found outcome for that photo page; the caller
/// renders it as such rather than erroring.
pub fn find_photo(images: &[ImageRecord], id: usize) -> Option<&ImageRecord> {
    images.iter().find(|img| img.id == id)
}
