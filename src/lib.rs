//! # Halation
//!
//! A static site generator for analog photography portfolios. Listings come
//! from a hosted media library; the output is a fully static site with a
//! filterable photo grid and lightbox-style photo pages.
//!
//! ## Architecture
//!
//! Three-stage pipeline with JSON manifests between stages:
//!
//! ```text
//! media library ──> [FETCH] ──> manifest.json
//!                                   │
//!                                   v
//!                               [ENRICH] ──> enriched.json
//!                                   │            (blur placeholders inlined)
//!                                   v
//!                              [GENERATE] ──> dist/
//!                                               index.html
//!                                               p/<id>.html
//!                                               404.html
//! ```
//!
//! Each stage runs independently (useful for debugging a single stage) or
//! chained via `build`. The listing is fetched at most once per process and
//! memoized with no expiry; stages re-read the manifest rather than re-query
//! the library.
//!
//! ## Module Map
//!
//! | Module       | Responsibility                                          |
//! |--------------|---------------------------------------------------------|
//! | [`config`]   | `halation.toml` loading, merging, validation            |
//! | [`types`]    | Manifest types shared between stages                    |
//! | [`media`]    | Search API client, delivery URLs, the library trait     |
//! | [`listing`]  | Process-lifetime listing cache, record construction     |
//! | [`facets`]   | Facet extraction and AND-filtering over tags            |
//! | [`enrich`]   | Concurrent blur placeholder fetching and inlining       |
//! | [`lightbox`] | Photo navigation state machine and key bindings         |
//! | [`generate`] | HTML generation (maud templates, embedded CSS/JS)       |
//! | [`output`]   | Terminal reporting for each stage                       |
//!
//! ## Design Decisions
//!
//! - **The site is static; navigation state is baked.** The lightbox state
//!   machine in [`lightbox`] decides what prev/next/close do; the generator
//!   drives it per photo and bakes the results into data attributes that a
//!   small embedded script reads. Keyboard behavior in the browser therefore
//!   matches the tested state machine exactly.
//! - **Degrade, don't fail.** A missing folder or unreachable library
//!   produces an empty portfolio at build time, never a broken deploy.
//!   Individual stage commands still fail loudly for debugging.
//! - **No pixels touched.** All image transformation is delegated to the
//!   delivery CDN through URL parameters.

pub mod config;
pub mod enrich;
pub mod facets;
pub mod generate;
pub mod lightbox;
pub mod listing;
pub mod media;
pub mod output;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
