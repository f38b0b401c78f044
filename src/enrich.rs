//! Blur placeholder enrichment.
//!
//! Stage 2 of the build pipeline. For every image in the manifest, fetches a
//! tiny blurred variant from the delivery CDN and inlines it as a base64
//! `data:` URI so the published pages can paint a placeholder before the
//! real image arrives.
//!
//! The fetches are independent, so they are issued together and awaited as a
//! group. Completion order is irrelevant — `try_join_all` yields results in
//! input order, so placeholders are matched back to images by index. The
//! batch is all-or-nothing: one failed fetch fails the whole stage and no
//! partially-enriched manifest is produced. The per-request timeout on the
//! shared client is the only deadline.

use crate::config::DisplayConfig;
use crate::media::{Delivery, MediaError, MediaLibrary};
use crate::types::ImageRecord;
use base64::Engine as _;
use base64::engine::general_purpose;
use futures::future;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("Placeholder fetch failed: {0}")]
    Media(#[from] MediaError),
}

/// Encode fetched placeholder bytes as an inline data URI.
///
/// The blur variant is always requested as webp (see
/// [`Delivery::blur_url`]), so the MIME type is fixed.
fn data_uri(bytes: &[u8]) -> String {
    format!(
        "data:image/webp;base64,{}",
        general_purpose::STANDARD.encode(bytes)
    )
}

/// Enrich every image with a blur placeholder.
///
/// Consumes and returns the image list so a partially-written state can't
/// escape: on error the whole batch is dropped.
pub async fn enrich<L: MediaLibrary>(
    library: &L,
    delivery: &Delivery<'_>,
    display: &DisplayConfig,
    mut images: Vec<ImageRecord>,
) -> Result<Vec<ImageRecord>, EnrichError> {
    let fetches = images.iter().map(|image| {
        let url = delivery.blur_url(image, display.placeholder_width);
        async move { library.fetch_bytes(&url).await }
    });
    let payloads = future::try_join_all(fetches).await?;

    for (image, bytes) in images.iter_mut().zip(payloads) {
        image.blur_placeholder = Some(data_uri(&bytes));
    }
    Ok(images)
}
