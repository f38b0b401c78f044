use clap::{Parser, Subcommand};
use halation::config::{self, Credentials, SiteConfig};
use halation::listing::{self, ListingCache};
use halation::media::{Client, Delivery, MediaError};
use halation::types::Manifest;
use halation::{enrich, generate, output};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "halation")]
#[command(about = "Static site generator for analog photography portfolios")]
#[command(long_about = "\
Static site generator for analog photography portfolios

A hosted media library is the data source. The configured folder is listed
once, sorted by identifier descending, and turned into a static site: a
filterable photo grid plus one lightbox-style page per photo.

Pipeline stages (chained by 'build', or run individually):

  fetch      List the library folder into .halation-temp/manifest.json
  enrich     Inline blur-up placeholders → .halation-temp/enriched.json
  generate   Render HTML into the output directory

Tags on the uploaded assets drive the grid filters:

  camera:Mamiya 645      → camera facet
  film:Portra 400        → film facet
  theme:Golden Hour      → theme facet

Credentials come from the MEDIA_API_KEY and MEDIA_API_SECRET environment
variables. A site with no folder configured (or an unreachable library at
build time) produces an empty portfolio instead of failing.

Run 'halation gen-config' to generate a documented halation.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file
    #[arg(long, default_value = "halation.toml", global = true)]
    config: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate manifests
    #[arg(long, default_value = ".halation-temp", global = true)]
    temp_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the media library folder into a manifest
    Fetch,
    /// Inline blur placeholders into the fetched manifest
    Enrich,
    /// Produce the final HTML site from the enriched manifest
    Generate,
    /// Run the full pipeline: fetch → enrich → generate
    Build,
    /// Validate config and report folder/credential status without building
    Check,
    /// Print a stock halation.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Fetch => {
            let site_config = config::load_config(&cli.config)?;
            let manifest = fetch_manifest(&site_config).await?;
            std::fs::create_dir_all(&cli.temp_dir)?;
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(cli.temp_dir.join("manifest.json"), json)?;
            output::print_fetch_output(&manifest);
        }
        Command::Enrich => {
            let manifest_path = cli.temp_dir.join("manifest.json");
            let manifest_content = std::fs::read_to_string(&manifest_path)?;
            let manifest: Manifest = serde_json::from_str(&manifest_content)?;
            let manifest = enrich_manifest(manifest).await?;
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(cli.temp_dir.join("enriched.json"), json)?;
            output::print_enrich_output(&manifest);
        }
        Command::Generate => {
            let enriched_path = cli.temp_dir.join("enriched.json");
            generate::generate(&enriched_path, &cli.output)?;
            let manifest_content = std::fs::read_to_string(&enriched_path)?;
            let manifest: Manifest = serde_json::from_str(&manifest_content)?;
            output::print_generate_output(&manifest, &cli.output.display().to_string());
        }
        Command::Build => {
            let site_config = config::load_config(&cli.config)?;
            std::fs::create_dir_all(&cli.temp_dir)?;

            println!("==> Stage 1: Fetching listing");
            // The library is the one external dependency; if it is down the
            // site still deploys, just empty.
            let manifest = match fetch_manifest(&site_config).await {
                Ok(manifest) => manifest,
                Err(err) => {
                    eprintln!("Warning: listing unavailable ({err}); building an empty portfolio");
                    Manifest::empty(site_config.clone())
                }
            };
            let manifest_path = cli.temp_dir.join("manifest.json");
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(&manifest_path, json)?;
            output::print_fetch_output(&manifest);

            println!("==> Stage 2: Inlining blur placeholders");
            let manifest = match enrich_manifest(manifest).await {
                Ok(manifest) => manifest,
                Err(err) => {
                    eprintln!("Warning: enrichment failed ({err}); building an empty portfolio");
                    Manifest::empty(site_config.clone())
                }
            };
            let enriched_path = cli.temp_dir.join("enriched.json");
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(&enriched_path, json)?;
            output::print_enrich_output(&manifest);

            println!("==> Stage 3: Generating HTML → {}", cli.output.display());
            generate::generate(&enriched_path, &cli.output)?;
            output::print_generate_output(&manifest, &cli.output.display().to_string());

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.config.display());
            let site_config = config::load_config(&cli.config)?;
            match &site_config.media.folder {
                Some(folder) => println!("Folder: {folder} (cloud: {})", site_config.media.cloud_name),
                None => println!("Folder: not configured — builds will produce an empty portfolio"),
            }
            match Credentials::from_env() {
                Some(_) => println!("Credentials: present"),
                None => println!("Credentials: MEDIA_API_KEY / MEDIA_API_SECRET not set"),
            }
            println!("==> Config is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// List the configured folder and build the fetch-stage manifest.
///
/// No folder means no listing query at all; missing credentials with a
/// configured folder is an error (the build command downgrades it to an
/// empty portfolio, the fetch command reports it).
async fn fetch_manifest(site_config: &SiteConfig) -> Result<Manifest, Box<dyn std::error::Error>> {
    if site_config.media.folder.is_none() {
        return Ok(Manifest::empty(site_config.clone()));
    }
    let credentials = Credentials::from_env().ok_or(MediaError::MissingCredentials)?;
    let client = Client::new(&site_config.media, credentials)?;
    let cache = ListingCache::new();
    let images = listing::fetch_records(&cache, &client, &site_config.media).await?;
    Ok(Manifest {
        images,
        config: site_config.clone(),
    })
}

/// Run the enrich stage against the real delivery CDN.
async fn enrich_manifest(manifest: Manifest) -> Result<Manifest, Box<dyn std::error::Error>> {
    let Manifest { images, config } = manifest;
    if images.is_empty() {
        return Ok(Manifest {
            images,
            config,
        });
    }
    let credentials = Credentials::from_env().ok_or(MediaError::MissingCredentials)?;
    let client = Client::new(&config.media, credentials)?;
    let delivery = Delivery::new(&config.media);
    let images = enrich::enrich(&client, &delivery, &config.display, images).await?;
    Ok(Manifest { images, config })
}
