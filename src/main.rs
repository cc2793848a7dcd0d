mod error;
mod fetch;
mod phones;
mod provider;
mod runner;
mod settings;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use fetch::HttpFetcher;
use provider::{JsonFileProvider, SqliteProvider};
use runner::RunOptions;
use settings::{Settings, Storage};

#[derive(Parser)]
#[command(name = "phone_scraper", about = "Collect phone numbers from a list of web pages")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every page from the page source and store the phones found (default)
    Run,
    /// Extract phones from local text/HTML files and print them
    Extract {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Load page URLs from a JSON array into the SQLite store
    Import {
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let fetcher = Arc::new(HttpFetcher::new().context("Failed to build HTTP client")?);
            let opts = RunOptions::from(&settings);
            let stats = match settings.storage {
                Storage::Json => {
                    let provider =
                        JsonFileProvider::new(&settings.pages_path, &settings.phones_path);
                    let stats = runner::run(&provider, fetcher, &opts).await?;
                    info!("See results in {}", provider.phones_path().display());
                    stats
                }
                Storage::Sqlite => {
                    let provider = SqliteProvider::open(&settings.db_path).with_context(|| {
                        format!("Failed to open {}", settings.db_path.display())
                    })?;
                    let stats = runner::run(&provider, fetcher, &opts).await?;
                    info!("See results in {}", settings.db_path.display());
                    stats
                }
            };
            println!(
                "Done: {} pages ({} ok, {} errors), {} unique phones in {:.1}s",
                stats.total,
                stats.ok,
                stats.errors,
                stats.phones,
                t0.elapsed().as_secs_f64()
            );
        }
        Commands::Extract { files } => {
            for (path, phones) in extract_files(&files)? {
                println!("{}: {}", path.display(), phones.join(", "));
            }
        }
        Commands::Import { file } => {
            let pages = provider::read_pages(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let mut provider = SqliteProvider::open(&settings.db_path)
                .with_context(|| format!("Failed to open {}", settings.db_path.display()))?;
            let inserted = provider.insert_pages(&pages)?;
            println!("Inserted {} new page URLs ({} in file)", inserted, pages.len());
        }
    }

    Ok(())
}

/// Read and scan files in parallel; output keeps the order of `files`.
fn extract_files(files: &[PathBuf]) -> Result<Vec<(&PathBuf, Vec<String>)>> {
    use rayon::prelude::*;

    files
        .par_iter()
        .map(|path| {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok::<_, anyhow::Error>((path, phones::extract(&text)))
        })
        .collect()
}
