//! Terminal output formatting.
//!
//! Follows the information-first principle: most important info at the start
//! of each line, aligned columns for scanning. All `format_*` functions are
//! pure (return `Vec<String>`) with thin `print_*` wrappers, so tests assert
//! on strings and never capture stdout.

use crate::facets::FacetOptions;
use crate::types::{ImageRecord, Manifest};

const INDENT: &str = "    ";

fn indent(text: &str) -> String {
    format!("{INDENT}{text}")
}

/// `001 portfolio/roll-12/04` style line for one image.
fn image_line(position: usize, image: &ImageRecord) -> String {
    format!(
        "{:03} {} ({}x{})",
        position + 1,
        image.public_id,
        image.width,
        image.height
    )
}

fn count_noun(count: usize, singular: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {singular}s")
    }
}

// =============================================================================
// Stage reports
// =============================================================================

/// Format the fetch stage report: the listing with tags, then facet counts.
pub fn format_fetch_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = Vec::new();

    if manifest.images.is_empty() {
        lines.push("Portfolio (no photos)".to_string());
        if manifest.config.media.folder.is_none() {
            lines.push(indent("media.folder is not configured"));
        }
        return lines;
    }

    lines.push(format!(
        "Portfolio ({})",
        count_noun(manifest.images.len(), "photo")
    ));
    for image in &manifest.images {
        lines.push(image_line(image.id, image));
        if !image.tags.is_empty() {
            lines.push(indent(&format!("Tags: {}", image.tags.join(", "))));
        }
    }

    let options = FacetOptions::derive(&manifest.images);
    lines.push(String::new());
    lines.push("Facets".to_string());
    lines.push(indent(&format!(
        "camera: {}",
        count_noun(options.camera.len(), "option")
    )));
    lines.push(indent(&format!(
        "film: {}",
        count_noun(options.film.len(), "option")
    )));
    lines.push(indent(&format!(
        "theme: {}",
        count_noun(options.theme.len(), "option")
    )));

    lines
}

/// Format the enrich stage report: inlined placeholder sizes per image.
pub fn format_enrich_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!(
        "Enriched {}",
        count_noun(manifest.images.len(), "placeholder")
    ));
    for image in &manifest.images {
        let size = image
            .blur_placeholder
            .as_ref()
            .map(|uri| format!("{} bytes inline", uri.len()))
            .unwrap_or_else(|| "missing".to_string());
        lines.push(indent(&format!(
            "{:03} {}: {}",
            image.id + 1,
            image.public_id,
            size
        )));
    }

    lines
}

/// Format the generate stage summary.
pub fn format_generate_output(manifest: &Manifest, output_dir: &str) -> Vec<String> {
    vec![
        format!(
            "Generated 1 index page, {}, 1 not-found page",
            count_noun(manifest.images.len(), "photo page")
        ),
        indent(&format!("Output: {output_dir}")),
    ]
}

// =============================================================================
// Print wrappers
// =============================================================================

pub fn print_fetch_output(manifest: &Manifest) {
    for line in format_fetch_output(manifest) {
        println!("{line}");
    }
}

pub fn print_enrich_output(manifest: &Manifest) {
    for line in format_enrich_output(manifest) {
        println!("{line}");
    }
}

pub fn print_generate_output(manifest: &Manifest, output_dir: &str) {
    for line in format_generate_output(manifest, output_dir) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{image, manifest_with, sample_images};

    #[test]
    fn fetch_output_lists_photos_with_tags() {
        let manifest = manifest_with(sample_images());
        let lines = format_fetch_output(&manifest);

        assert_eq!(lines[0], "Portfolio (3 photos)");
        assert_eq!(lines[1], "001 A (3000x2000)");
        assert_eq!(lines[2], "    Tags: camera:X");
        assert!(lines.contains(&"Facets".to_string()));
        assert!(lines.contains(&"    camera: 2 options".to_string()));
        assert!(lines.contains(&"    film: 0 options".to_string()));
        assert!(lines.contains(&"    theme: 1 option".to_string()));
    }

    #[test]
    fn fetch_output_empty_portfolio_mentions_missing_folder() {
        let manifest = manifest_with(vec![]);
        let lines = format_fetch_output(&manifest);

        assert_eq!(lines[0], "Portfolio (no photos)");
        assert_eq!(lines[1], "    media.folder is not configured");
    }

    #[test]
    fn enrich_output_reports_placeholder_sizes() {
        let mut manifest = manifest_with(vec![image(0, "a", &[])]);
        manifest.images[0].blur_placeholder = Some("data:image/webp;base64,AAAA".to_string());

        let lines = format_enrich_output(&manifest);
        assert_eq!(lines[0], "Enriched 1 placeholder");
        assert!(lines[1].starts_with("    001 a: "));
        assert!(lines[1].ends_with("bytes inline"));
    }

    #[test]
    fn generate_output_summarizes_pages() {
        let manifest = manifest_with(sample_images());
        let lines = format_generate_output(&manifest, "dist");

        assert_eq!(
            lines[0],
            "Generated 1 index page, 3 photo pages, 1 not-found page"
        );
        assert_eq!(lines[1], "    Output: dist");
    }
}
