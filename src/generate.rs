//! HTML site generation.
//!
//! Stage 3 of the build pipeline. Takes the enriched manifest and generates
//! the final static site.
//!
//! ## Generated Pages
//!
//! - **Homepage** (`/index.html`): hero, facet filter selects, the image
//!   grid with blur-up placeholders, equipment and film shelves, contact
//!   section, and the booking form
//! - **Photo pages** (`/p/<id>.html`): full-size viewer with prev/next
//!   navigation, photo counter, and Open Graph metadata
//! - **Not found** (`/404.html`): the standard outcome for photo ids with
//!   no matching record
//!
//! ## Navigation
//!
//! Prev/next links on photo pages are computed by driving the
//! [`lightbox`](crate::lightbox) state machine, so the baked-in links obey
//! the same bounds rules as the keyboard layer: a boundary photo simply has
//! no link in that direction. The embedded `nav.js` mirrors the key table
//! (`ArrowRight`/`ArrowLeft`/`Escape`) in the browser and keeps the URL in
//! sync without reloads.
//!
//! ## Filtering
//!
//! Facet option lists are derived at build time; the actual filtering is
//! per-visitor, so grid items carry their lowercased tag set in a
//! `data-tags` attribute and `nav.js` applies the same AND semantics as
//! [`facets::filter`](crate::facets::filter), with the show-everything
//! fallback when a combination matches nothing.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping. CSS and
//! the navigation script are embedded at compile time.

use crate::config::{self, SiteConfig};
use crate::facets::{CAMERA_PREFIX, FILM_PREFIX, FacetOptions, THEME_PREFIX};
use crate::lightbox;
use crate::listing;
use crate::media::Delivery;
use crate::types::{ImageRecord, Manifest};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/nav.js");

pub fn generate(manifest_path: &Path, output_dir: &Path) -> Result<(), GenerateError> {
    let manifest_content = fs::read_to_string(manifest_path)?;
    let manifest: Manifest = serde_json::from_str(&manifest_content)?;

    // Generate CSS with colors from config
    let color_css = config::generate_color_css(&manifest.config.colors);
    let css = format!("{}\n\n{}", color_css, CSS_STATIC);

    fs::create_dir_all(output_dir)?;

    let options = FacetOptions::derive(&manifest.images);

    let index_html = render_home(&manifest, &options, &css);
    fs::write(output_dir.join("index.html"), index_html.into_string())?;
    println!("Generated index.html");

    let photo_dir = output_dir.join("p");
    fs::create_dir_all(&photo_dir)?;
    for image in &manifest.images {
        let photo_html = render_photo_page(&manifest, image, &css);
        fs::write(
            photo_dir.join(format!("{}.html", image.id)),
            photo_html.into_string(),
        )?;
    }
    println!("Generated {} photo pages", manifest.images.len());

    let not_found_html = render_not_found(&manifest.config, &css);
    fs::write(output_dir.join("404.html"), not_found_html.into_string())?;
    println!("Generated 404.html");

    println!("Site generated at {}", output_dir.display());
    Ok(())
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure with social metadata.
fn base_document(
    title: &str,
    description: &str,
    og_image: Option<&str>,
    page_url: Option<&str>,
    css: &str,
    content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                meta name="description" content=(description);
                @if let Some(url) = og_image {
                    meta property="og:image" content=(url);
                    meta name="twitter:image" content=(url);
                }
                @if let Some(url) = page_url {
                    meta property="og:url" content=(url);
                }
                style { (css) }
            }
            body {
                (content)
                script { (PreEscaped(JS)) }
            }
        }
    }
}

/// Renders the fixed site header with section links and the booking button.
fn site_header(site: &config::SiteInfo) -> Markup {
    html! {
        header.site-header {
            a.site-name href="/" { (site.photographer) }
            nav.site-nav {
                a href="/#portfolio" { "Portfolio" }
                a href="/#overview" { "Overview" }
                a href="/#equipment" { "Equipment" }
                a href="/#film" { "Film" }
                a href="/#contact" { "Contact" }
                a.booking-link href="/#booking" { "Book a session" }
            }
        }
    }
}

/// Renders one facet select. The "All" option clears the slot; option
/// labels drop the facet prefix, values keep the full tag.
fn facet_select(label: &str, facet: &str, prefix: &str, options: &[String]) -> Markup {
    html! {
        div.filter {
            label for={ "filter-" (facet) } { (label) }
            select id={ "filter-" (facet) } data-facet=(facet) {
                option value="" { "All" }
                @for opt in options {
                    option value=(opt.to_lowercase()) {
                        (opt.strip_prefix(prefix).unwrap_or(opt))
                    }
                }
            }
        }
    }
}

/// Renders one grid item: a link to the photo page, carrying the data the
/// client-side filter and scroll-restore need.
fn grid_item(image: &ImageRecord, delivery: &Delivery<'_>, grid_width: u32) -> Markup {
    let tags: String = image
        .tags
        .iter()
        .map(|t| t.to_lowercase())
        .collect::<Vec<_>>()
        .join("|");
    let alt = image.caption().unwrap_or("Analog photograph").to_string();
    let placeholder = image
        .blur_placeholder
        .as_ref()
        .map(|uri| format!("background-image: url('{}')", uri));

    html! {
        a.grid-item
            id={ "photo-" (image.id) }
            href={ "p/" (image.id) ".html" }
            data-photo-id=(image.id)
            data-tags=(tags)
        {
            img src=(delivery.grid_url(image, grid_width))
                alt=(alt)
                width=(image.width)
                height=(image.height)
                loading="lazy"
                style=[placeholder];
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the homepage: hero, filters, grid, content sections.
fn render_home(manifest: &Manifest, options: &FacetOptions, css: &str) -> Markup {
    let site = &manifest.config.site;
    let delivery = Delivery::new(&manifest.config.media);
    let grid_width = manifest.config.display.grid_width;
    // The newest photo doubles as the social preview; an empty portfolio
    // simply has none.
    let og_image = manifest
        .images
        .first()
        .map(|img| delivery.detail_url(img, manifest.config.display.detail_width));

    let content = html! {
        (site_header(site))
        main {
            section.hero {
                h1 { (site.title) }
                p.tagline { (site.description) }
                a.button href="#booking" { "Book a session" }
            }

            @if !options.is_empty() {
                section.filters {
                    (facet_select("Camera", "camera", CAMERA_PREFIX, &options.camera))
                    (facet_select("Film", "film", FILM_PREFIX, &options.film))
                    (facet_select("Theme", "theme", THEME_PREFIX, &options.theme))
                }
            }

            section id="portfolio" {
                @if manifest.images.is_empty() {
                    div.empty-state {
                        h2 { "No photographs yet" }
                        p { "Configure the media library folder and upload images to fill the portfolio." }
                    }
                } @else {
                    div.photo-grid {
                        @for image in &manifest.images {
                            (grid_item(image, &delivery, grid_width))
                        }
                    }
                }
            }

            section id="overview" {
                h2 { "Overview" }
                @for paragraph in &site.overview {
                    p { (paragraph) }
                }
            }

            section id="equipment" {
                h2 { "Equipment" }
                ul.shelf {
                    @for camera in &site.cameras {
                        li { (camera) }
                    }
                }
            }

            section id="film" {
                h2 { "Film stock" }
                ul.shelf {
                    @for stock in &site.film_stock {
                        li { (stock) }
                    }
                }
            }

            section id="contact" {
                h2 { "Get in touch" }
                a.button href={ "mailto:" (site.email) } { (site.email) }
                a.button.secondary href={ "tel:" (site.phone) } { (site.phone) }
            }

            section id="booking" {
                h2 { "Book a session" }
                form.booking-form method="post" action={ "mailto:" (site.email) } {
                    input type="text" name="name" placeholder="Name" required;
                    input type="email" name="email" placeholder="Email address" required;
                    select name="service" {
                        option value="" { "Choose a service" }
                        option value="portrait" { "Portrait session" }
                        option value="event" { "Event photography" }
                        option value="artistic" { "Artistic project" }
                    }
                    textarea name="message" rows="4" placeholder="Tell me about your project..." {}
                    button type="submit" { "Send" }
                }
            }
        }
        footer {
            p { "© " (site.photographer) ". All rights reserved." }
        }
    };

    base_document(
        &site.title,
        &site.description,
        og_image.as_deref(),
        Some(&site.base_url),
        css,
        content,
    )
}

/// Renders a photo detail page with baked-in lightbox navigation.
fn render_photo_page(manifest: &Manifest, image: &ImageRecord, css: &str) -> Markup {
    let site = &manifest.config.site;
    let delivery = Delivery::new(&manifest.config.media);
    let detail_url = delivery.detail_url(image, manifest.config.display.detail_width);

    let total = manifest.images.len();
    // Resolve the state machine's neighbour indices against the listing, so
    // a link is only emitted when the target page really exists.
    let (prev, next) = lightbox::neighbors(image.id, total);
    let prev_href = prev
        .and_then(|i| listing::find_photo(&manifest.images, i))
        .map(|img| format!("{}.html", img.id));
    let next_href = next
        .and_then(|i| listing::find_photo(&manifest.images, i))
        .map(|img| format!("{}.html", img.id));

    let display_idx = image.id + 1;
    let page_title = format!("{} — Photo {}", site.photographer, display_idx);
    let alt_text = image
        .caption()
        .unwrap_or("Analog photograph")
        .to_string();
    let aspect_style = format!(
        "--aspect-ratio: {};",
        image.width as f64 / image.height as f64
    );
    let placeholder = image
        .blur_placeholder
        .as_ref()
        .map(|uri| format!("background-image: url('{}')", uri));

    let content = html! {
        div.photo-info {
            span.photographer { (site.photographer) }
            p.counter { "Photo " (display_idx) " of " (total) }
        }
        a.lightbox-close href="../index.html" { "×" }
        main.photo-page {
            figure.photo-frame style=(aspect_style) {
                img src=(detail_url) alt=(alt_text) style=[placeholder];
            }
            @if let Some(caption) = image.caption() {
                p.caption { (caption) }
            }
        }
        div.nav-zones
            data-photo-id=(image.id)
            data-close="../index.html"
            data-prev=[prev_href]
            data-next=[next_href] {}
    };

    let page_url = format!(
        "{}/p/{}.html",
        site.base_url.trim_end_matches('/'),
        image.id
    );
    base_document(
        &page_title,
        &site.description,
        Some(&detail_url),
        Some(&page_url),
        css,
        content,
    )
}

/// Renders the not-found page.
fn render_not_found(config: &SiteConfig, css: &str) -> Markup {
    let content = html! {
        (site_header(&config.site))
        main.not-found {
            h1 { "Photo not found" }
            p { "That photograph is no longer in the portfolio." }
            a.button href="/" { "Back to the portfolio" }
        }
    };
    base_document("Not found", &config.site.description, None, None, css, content)
}

// ============================================================================
// Tests
// ============================================================================
