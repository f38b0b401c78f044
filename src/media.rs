//! Media library boundary: search API client and delivery URL construction.
//!
//! The [`MediaLibrary`] trait defines the two operations the pipeline needs
//! from the hosted library: a folder-scoped asset search and a raw byte
//! fetch (used for blur placeholders). The production implementation is
//! [`Client`], backed by reqwest; tests use the recording stub in
//! [`tests`].
//!
//! All image transformation is owned by the delivery CDN and expressed as
//! URL parameters — this crate never decodes or encodes pixels. [`Delivery`]
//! builds those URLs from config.

use crate::config::{Credentials, MediaConfig};
use crate::types::ImageRecord;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Per-request timeout on the shared HTTP client. There is no extra batch
/// deadline: one slow placeholder fetch fails through this and fails the
/// whole enrichment batch.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Media API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Media API credentials missing (set MEDIA_API_KEY and MEDIA_API_SECRET)")]
    MissingCredentials,
}

/// One asset record as returned by the search API.
///
/// Only the fields the pipeline consumes are deserialized; the library
/// returns more and they are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetRecord {
    pub public_id: String,
    pub format: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub context: BTreeMap<String, String>,
}

/// Search API response envelope.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub resources: Vec<AssetRecord>,
    #[serde(default)]
    pub total_count: u64,
}

/// A folder-scoped listing query.
///
/// Built with the same chain the library's own SDKs use:
///
/// ```
/// # use halation::media::SearchQuery;
/// let query = SearchQuery::expression("folder:portfolio/*")
///     .sort_by("public_id", "desc")
///     .with_field("tags")
///     .with_field("context")
///     .max_results(400);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    expression: String,
    sort_by: Vec<(String, String)>,
    with_field: Vec<String>,
    max_results: u32,
}

impl SearchQuery {
    pub fn expression(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            sort_by: Vec::new(),
            with_field: Vec::new(),
            max_results: 50,
        }
    }

    pub fn sort_by(mut self, field: impl Into<String>, direction: impl Into<String>) -> Self {
        self.sort_by.push((field.into(), direction.into()));
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.with_field.push(field.into());
        self
    }

    pub fn max_results(mut self, max: u32) -> Self {
        self.max_results = max;
        self
    }

    /// JSON request body in the wire format the search endpoint expects.
    pub fn body(&self) -> serde_json::Value {
        let sort_by: Vec<serde_json::Value> = self
            .sort_by
            .iter()
            .map(|(field, dir)| json!({ field: dir }))
            .collect();
        json!({
            "expression": self.expression,
            "sort_by": sort_by,
            "with_field": self.with_field,
            "max_results": self.max_results,
        })
    }
}

/// The two operations the pipeline needs from the hosted media library.
///
/// Kept minimal so tests can stub the whole external service with a few
/// lines; everything downstream of this trait is deterministic.
pub trait MediaLibrary {
    /// Execute a listing search.
    fn search(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<SearchResponse, MediaError>> + Send;

    /// Fetch raw bytes from a delivery URL (blur placeholder variants).
    fn fetch_bytes(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, MediaError>> + Send;
}

/// Production media library client.
pub struct Client {
    http: reqwest::Client,
    search_url: String,
    credentials: Credentials,
}

impl Client {
    pub fn new(config: &MediaConfig, credentials: Credentials) -> Result<Self, MediaError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let search_url = format!(
            "{}/v1_1/{}/resources/search",
            config.api_base, config.cloud_name
        );
        Ok(Self {
            http,
            search_url,
            credentials,
        })
    }
}

impl MediaLibrary for Client {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, MediaError> {
        let response = self
            .http
            .post(&self.search_url)
            .basic_auth(&self.credentials.api_key, Some(&self.credentials.api_secret))
            .json(&query.body())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MediaError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, MediaError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::Api {
                status: status.as_u16(),
                message: format!("fetching {url}"),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

// =============================================================================
// Delivery URLs
// =============================================================================

/// Builds delivery CDN URLs for the configured account.
///
/// URL shape: `{delivery_base}/{cloud_name}/image/upload/{transform}/{public_id}.{format}`.
pub struct Delivery<'a> {
    media: &'a MediaConfig,
}

impl<'a> Delivery<'a> {
    pub fn new(media: &'a MediaConfig) -> Self {
        Self { media }
    }

    fn url(&self, transform: &str, image: &ImageRecord) -> String {
        format!(
            "{}/{}/image/upload/{}/{}.{}",
            self.media.delivery_base, self.media.cloud_name, transform, image.public_id,
            image.format
        )
    }

    /// Grid variant for the homepage, scaled to the configured grid width.
    pub fn grid_url(&self, image: &ImageRecord, width: u32) -> String {
        self.url(&format!("c_scale,w_{width}"), image)
    }

    /// Full-size variant for photo detail pages.
    pub fn detail_url(&self, image: &ImageRecord, width: u32) -> String {
        self.url(&format!("c_scale,w_{width}"), image)
    }

    /// Tiny blurred variant fetched by the enrich stage. Always webp: the
    /// placeholder is inlined as a data URI, so the smallest encoding wins.
    pub fn blur_url(&self, image: &ImageRecord, width: u32) -> String {
        self.url(&format!("w_{width},e_blur:1000,q_auto,f_webp"), image)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Recording stub for the media library. Counts search calls (the listing
    /// cache contract is "exactly one external call per process") and can be
    /// told to fail placeholder fetches for specific URLs.
    #[derive(Default)]
    pub struct StubLibrary {
        pub assets: Vec<AssetRecord>,
        pub search_calls: AtomicUsize,
        pub fail_bytes_containing: Option<String>,
        pub fetched_urls: Mutex<Vec<String>>,
    }

    impl StubLibrary {
        pub fn with_assets(assets: Vec<AssetRecord>) -> Self {
            Self {
                assets,
                ..Self::default()
            }
        }

        pub fn search_call_count(&self) -> usize {
            self.search_calls.load(Ordering::SeqCst)
        }
    }

    impl MediaLibrary for StubLibrary {
        async fn search(&self, _query: &SearchQuery) -> Result<SearchResponse, MediaError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            Ok(SearchResponse {
                resources: self.assets.clone(),
                total_count: self.assets.len() as u64,
            })
        }

        async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, MediaError> {
            self.fetched_urls.lock().unwrap().push(url.to_string());
            if let Some(needle) = &self.fail_bytes_containing
                && url.contains(needle.as_str())
            {
                return Err(MediaError::Api {
                    status: 404,
                    message: format!("fetching {url}"),
                });
            }
            // A recognizable fake payload; content doesn't matter to the
            // pipeline, only that it round-trips through base64.
            Ok(format!("webp:{url}").into_bytes())
        }
    }

    /// Always-failing stub for exercising the degrade-to-empty path.
    pub struct FailingLibrary;

    impl MediaLibrary for FailingLibrary {
        async fn search(&self, _query: &SearchQuery) -> Result<SearchResponse, MediaError> {
            Err(MediaError::Api {
                status: 500,
                message: "listing unavailable".to_string(),
            })
        }

        async fn fetch_bytes(&self, _url: &str) -> Result<Vec<u8>, MediaError> {
            Err(MediaError::Api {
                status: 500,
                message: "delivery unavailable".to_string(),
            })
        }
    }

    fn asset(public_id: &str) -> AssetRecord {
        AssetRecord {
            public_id: public_id.to_string(),
            format: "jpg".to_string(),
            width: 3000,
            height: 2000,
            tags: vec![],
            context: BTreeMap::new(),
        }
    }

    #[test]
    fn search_query_body_wire_format() {
        let query = SearchQuery::expression("folder:portfolio/*")
            .sort_by("public_id", "desc")
            .with_field("tags")
            .with_field("context")
            .max_results(400);

        let body = query.body();
        assert_eq!(body["expression"], "folder:portfolio/*");
        assert_eq!(body["sort_by"][0]["public_id"], "desc");
        assert_eq!(body["with_field"][0], "tags");
        assert_eq!(body["with_field"][1], "context");
        assert_eq!(body["max_results"], 400);
    }

    #[test]
    fn asset_record_tolerates_missing_tags_and_context() {
        let json = r#"{"public_id": "portfolio/roll-12/04", "format": "jpg", "width": 720, "height": 480}"#;
        let record: AssetRecord = serde_json::from_str(json).unwrap();
        assert!(record.tags.is_empty());
        assert!(record.context.is_empty());
    }

    #[test]
    fn delivery_urls() {
        let media = MediaConfig::default();
        let delivery = Delivery::new(&media);
        let image = ImageRecord {
            id: 0,
            width: 3000,
            height: 2000,
            public_id: "portfolio/roll-12/04".to_string(),
            format: "jpg".to_string(),
            tags: vec![],
            context: BTreeMap::new(),
            blur_placeholder: None,
        };

        assert_eq!(
            delivery.grid_url(&image, 720),
            "https://res.cloudinary.com/demo/image/upload/c_scale,w_720/portfolio/roll-12/04.jpg"
        );
        assert_eq!(
            delivery.detail_url(&image, 2560),
            "https://res.cloudinary.com/demo/image/upload/c_scale,w_2560/portfolio/roll-12/04.jpg"
        );
        assert!(delivery.blur_url(&image, 100).contains("w_100,e_blur:1000"));
    }

    #[tokio::test]
    async fn stub_counts_search_calls() {
        let stub = StubLibrary::with_assets(vec![asset("a"), asset("b")]);
        let query = SearchQuery::expression("folder:x/*");

        let response = stub.search(&query).await.unwrap();
        assert_eq!(response.resources.len(), 2);
        assert_eq!(stub.search_call_count(), 1);
    }
}
