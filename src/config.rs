//! Site configuration module.
//!
//! Handles loading, validating, and merging the `halation.toml` config file.
//! Stock defaults are overridden by the user config; unknown keys are
//! rejected to catch typos early.
//!
//! ## Configuration Options
//!
//! ```toml
//! [site]
//! title = "Analog Photography Portfolio"
//! photographer = "Stephen Adei"
//! email = "stephen@example.com"
//!
//! [media]
//! folder = "portfolio"      # Library folder to list (listing is empty if absent)
//! cloud_name = "demo"       # Media library account namespace
//! max_results = 400         # Listing cap
//! ```
//!
//! ## Credentials
//!
//! The media library search API requires credentials. They are read from the
//! `MEDIA_API_KEY` / `MEDIA_API_SECRET` environment variables and never
//! appear in the config file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `halation.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site identity: titles, photographer, contact details.
    pub site: SiteInfo,
    /// Media library account, folder, and listing settings.
    pub media: MediaConfig,
    /// Delivery variant widths for grid, detail, and placeholder images.
    pub display: DisplayConfig,
    /// Site color palette.
    pub colors: ColorConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: SiteInfo::default(),
            media: MediaConfig::default(),
            display: DisplayConfig::default(),
            colors: ColorConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.media.max_results == 0 || self.media.max_results > 500 {
            return Err(ConfigError::Validation(
                "media.max_results must be 1-500".into(),
            ));
        }
        if self.display.grid_width == 0 || self.display.detail_width == 0 {
            return Err(ConfigError::Validation(
                "display widths must be non-zero".into(),
            ));
        }
        if self.display.placeholder_width > self.display.grid_width {
            return Err(ConfigError::Validation(
                "display.placeholder_width must not exceed display.grid_width".into(),
            ));
        }
        if self.media.folder.as_deref() == Some("") {
            return Err(ConfigError::Validation(
                "media.folder must not be empty (omit it to build without a listing)".into(),
            ));
        }
        Ok(())
    }
}

/// Site identity and homepage content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    /// Browser/OG title of the homepage.
    pub title: String,
    /// Photographer name shown in the header and footer.
    pub photographer: String,
    /// Meta description for the homepage.
    pub description: String,
    /// Contact email rendered in the contact section.
    pub email: String,
    /// Contact phone rendered in the contact section.
    pub phone: String,
    /// Absolute base URL of the published site (used for OG page URLs).
    pub base_url: String,
    /// Paragraphs for the overview section on the homepage.
    pub overview: Vec<String>,
    /// Camera bodies listed in the equipment section.
    pub cameras: Vec<String>,
    /// Film stocks listed in the film shelf section.
    pub film_stock: Vec<String>,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "Analog Photography Portfolio".to_string(),
            photographer: "Stephen Adei".to_string(),
            description:
                "Professional analog photography. Timeless, artistic portraits and events."
                    .to_string(),
            email: "stephen@example.com".to_string(),
            phone: "+31 6 1234 5678".to_string(),
            base_url: "https://example.com".to_string(),
            overview: vec![
                "Analog photography with a focus on portraits, events, and artistic \
                 projects. Every frame is shot on film and scanned by hand."
                    .to_string(),
                "Available for bookings, from intimate portrait sessions to full \
                 events. Prints and digital scans included."
                    .to_string(),
            ],
            cameras: vec![
                "Canon A1".to_string(),
                "Mamiya 645".to_string(),
                "Yashica D".to_string(),
                "Ricoh FF-9".to_string(),
            ],
            film_stock: vec![
                "Kodak Portra 400".to_string(),
                "Kodak Ektar 100".to_string(),
                "Cinestill 800T".to_string(),
            ],
        }
    }
}

/// Media library account and listing settings.
///
/// The listing query is scoped to `folder`; when no folder is configured the
/// listing is empty and the site builds with its "no images" state. This is
/// deliberate: a half-configured deploy degrades, it never fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MediaConfig {
    /// Account namespace in API and delivery URLs.
    pub cloud_name: String,
    /// Library folder to list. Absent → empty listing (not an error).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    /// Maximum number of assets requested from the listing call.
    pub max_results: u32,
    /// Search API base URL.
    pub api_base: String,
    /// Image delivery base URL.
    pub delivery_base: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            cloud_name: "demo".to_string(),
            folder: None,
            max_results: 400,
            api_base: "https://api.cloudinary.com".to_string(),
            delivery_base: "https://res.cloudinary.com".to_string(),
        }
    }
}

impl MediaConfig {
    /// The folder-scoped search expression, or `None` when unconfigured.
    pub fn folder_expression(&self) -> Option<String> {
        self.folder.as_ref().map(|f| format!("folder:{}/*", f))
    }
}

/// Delivery variant widths.
///
/// The media service owns all image transformation; these only parameterize
/// the URLs the generator emits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Width of grid images on the homepage.
    pub grid_width: u32,
    /// Width of the full image on photo detail pages.
    pub detail_width: u32,
    /// Width of the tiny blurred variant fetched for blur-up placeholders.
    pub placeholder_width: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            grid_width: 720,
            detail_width: 2560,
            placeholder_width: 100,
        }
    }
}

/// Site color palette.
///
/// The published site is dark by design — film scans read best on near-black.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Page background.
    pub background: String,
    /// Primary text color.
    pub text: String,
    /// Muted/secondary text (captions, nav links, counters).
    pub text_muted: String,
    /// Card and panel surfaces.
    pub surface: String,
    /// Borders and separators.
    pub border: String,
    /// Accent color (buttons, hover states).
    pub accent: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: "#0a0a0a".to_string(),
            text: "#f5f5f5".to_string(),
            text_muted: "rgba(255, 255, 255, 0.6)".to_string(),
            surface: "rgba(255, 255, 255, 0.05)".to_string(),
            border: "rgba(255, 255, 255, 0.1)".to_string(),
            accent: "#ffffff".to_string(),
        }
    }
}

/// Media library API credentials, read from the environment.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    /// Read `MEDIA_API_KEY` / `MEDIA_API_SECRET`. Returns `None` when either
    /// is absent — the caller decides whether that's fatal (fetch) or merely
    /// reportable (check).
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("MEDIA_API_KEY").ok()?;
        let api_secret = std::env::var("MEDIA_API_SECRET").ok()?;
        Some(Self {
            api_key,
            api_secret,
        })
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load the config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file path.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result. A missing file yields the stock defaults.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock config with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Halation Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.
#
# API credentials are NOT configured here: set the MEDIA_API_KEY and
# MEDIA_API_SECRET environment variables before running `fetch` or `build`.

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
title = "Analog Photography Portfolio"
photographer = "Stephen Adei"
description = "Professional analog photography. Timeless, artistic portraits and events."
email = "stephen@example.com"
phone = "+31 6 1234 5678"

# Absolute base URL of the published site, used for Open Graph page URLs.
base_url = "https://example.com"

# Paragraphs for the overview section on the homepage.
overview = [
    "Analog photography with a focus on portraits, events, and artistic projects. Every frame is shot on film and scanned by hand.",
    "Available for bookings, from intimate portrait sessions to full events. Prints and digital scans included.",
]

# Equipment and film shelves shown on the homepage.
cameras = ["Canon A1", "Mamiya 645", "Yashica D", "Ricoh FF-9"]
film_stock = ["Kodak Portra 400", "Kodak Ektar 100", "Cinestill 800T"]

# ---------------------------------------------------------------------------
# Media library
# ---------------------------------------------------------------------------
[media]
# Account namespace in API and delivery URLs.
cloud_name = "demo"

# Library folder to list. When omitted, the site builds with an empty
# portfolio instead of failing.
# folder = "portfolio"

# Maximum number of assets requested from the listing call (1-500).
max_results = 400

# API endpoints. Only change these for self-hosted or test setups.
api_base = "https://api.cloudinary.com"
delivery_base = "https://res.cloudinary.com"

# ---------------------------------------------------------------------------
# Delivery variants
# ---------------------------------------------------------------------------
[display]
# Width of grid images on the homepage.
grid_width = 720

# Width of the full image on photo detail pages.
detail_width = 2560

# Width of the tiny blurred variant used for blur-up placeholders.
placeholder_width = 100

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors]
background = "#0a0a0a"
text = "#f5f5f5"
text_muted = "rgba(255, 255, 255, 0.6)"
surface = "rgba(255, 255, 255, 0.05)"
border = "rgba(255, 255, 255, 0.1)"
accent = "#ffffff"
"##
}

/// Generate CSS custom properties from the color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {background};
    --color-text: {text};
    --color-text-muted: {text_muted};
    --color-surface: {surface};
    --color-border: {border};
    --color-accent: {accent};
}}"#,
        background = colors.background,
        text = colors.text,
        text_muted = colors.text_muted,
        surface = colors.surface,
        border = colors.border,
        accent = colors.accent,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_listing_cap() {
        let config = SiteConfig::default();
        assert_eq!(config.media.max_results, 400);
        assert!(config.media.folder.is_none());
    }

    #[test]
    fn default_config_has_display_widths() {
        let config = SiteConfig::default();
        assert_eq!(config.display.grid_width, 720);
        assert_eq!(config.display.detail_width, 2560);
        assert_eq!(config.display.placeholder_width, 100);
    }

    #[test]
    fn folder_expression_scopes_to_folder() {
        let mut media = MediaConfig::default();
        assert_eq!(media.folder_expression(), None);

        media.folder = Some("portfolio".to_string());
        assert_eq!(
            media.folder_expression().as_deref(),
            Some("folder:portfolio/*")
        );
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[media]
folder = "shoots"
"##;
        let overlay: toml::Value = toml::from_str(toml).unwrap();
        let config = resolve_config(stock_defaults_value(), Some(overlay)).unwrap();
        // Overridden value
        assert_eq!(config.media.folder.as_deref(), Some("shoots"));
        // Defaults preserved
        assert_eq!(config.media.max_results, 400);
        assert_eq!(config.site.photographer, "Stephen Adei");
    }

    #[test]
    fn unknown_keys_rejected() {
        let toml = r##"
[media]
flder = "typo"
"##;
        let overlay: toml::Value = toml::from_str(toml).unwrap();
        let result = resolve_config(stock_defaults_value(), Some(overlay));
        assert!(result.is_err());
    }

    #[test]
    fn validation_rejects_zero_max_results() {
        let mut config = SiteConfig::default();
        config.media.max_results = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_oversized_cap() {
        let mut config = SiteConfig::default();
        config.media.max_results = 5000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_empty_folder_string() {
        let mut config = SiteConfig::default();
        config.media.folder = Some(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn generate_css_uses_config_colors() {
        let mut colors = ColorConfig::default();
        colors.background = "#111111".to_string();

        let css = generate_color_css(&colors);
        assert!(css.contains("--color-bg: #111111"));
        assert!(css.contains("--color-text-muted:"));
    }

    #[test]
    fn merge_preserves_unrelated_tables() {
        let base = stock_defaults_value();
        let overlay: toml::Value = toml::from_str("[colors]\nbackground = \"#000\"").unwrap();
        let merged = merge_toml(base, overlay);
        let config: SiteConfig = merged.try_into().unwrap();

        assert_eq!(config.colors.background, "#000");
        assert_eq!(config.display.grid_width, 720);
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("halation.toml")).unwrap();

        assert!(config.media.folder.is_none());
        assert_eq!(config.colors.background, "#0a0a0a");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("halation.toml");

        fs::write(
            &config_path,
            r##"
[site]
photographer = "Ansel Adams"

[media]
folder = "yosemite"
max_results = 120
"##,
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.site.photographer, "Ansel Adams");
        assert_eq!(config.media.folder.as_deref(), Some("yosemite"));
        assert_eq!(config.media.max_results, 120);
        // Unspecified values should be defaults
        assert_eq!(config.display.grid_width, 720);
    }

    #[test]
    fn stock_config_toml_parses_to_defaults() {
        let parsed: toml::Value = toml::from_str(stock_config_toml()).unwrap();
        let config = resolve_config(stock_defaults_value(), Some(parsed)).unwrap();
        assert_eq!(config.media.max_results, 400);
        assert_eq!(config.site.photographer, "Stephen Adei");
    }
}
