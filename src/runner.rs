use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::{mpsc, Semaphore};
use tracing::{info, warn};

use crate::error::FetchError;
use crate::fetch::PageFetcher;
use crate::phones;
use crate::provider::DataProvider;
use crate::settings::Settings;

const CHANNEL_CAPACITY: usize = 64;

pub struct RunOptions {
    pub fetch_timeout: Duration,
    /// 0 = no limit beyond one task per page.
    pub max_concurrency: usize,
}

impl From<&Settings> for RunOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            fetch_timeout: settings.fetch_timeout(),
            max_concurrency: settings.max_concurrency,
        }
    }
}

/// Outcome for one page: its phones in scan order, or why it has none.
#[derive(Debug)]
pub struct PageResult {
    pub url: String,
    pub outcome: Result<Vec<String>, FetchError>,
}

/// Run stats returned after the sink has the results.
#[derive(Debug, PartialEq, Eq)]
pub struct RunStats {
    pub total: usize,
    pub ok: usize,
    pub errors: usize,
    pub phones: usize,
}

/// Merges page results as they arrive. Failed pages are counted and logged only.
#[derive(Default)]
struct Collector {
    phones: BTreeSet<String>,
    ok: usize,
    errors: usize,
}

impl Collector {
    fn record(&mut self, result: PageResult) {
        match result.outcome {
            Ok(found) => {
                info!(url = %result.url, phones = ?found, "Page processed");
                self.ok += 1;
                self.phones.extend(found);
            }
            Err(e) => {
                warn!(url = %result.url, error = %e, "Error while processing page");
                self.errors += 1;
            }
        }
    }
}

/// Fetch every page concurrently, extract phones, hand the union to the sink once.
///
/// Only page source and sink failures are returned as errors.
pub async fn run(
    provider: &dyn DataProvider,
    fetcher: Arc<dyn PageFetcher>,
    opts: &RunOptions,
) -> Result<RunStats> {
    let pages = provider.get_pages().context("Failed to read page list")?;
    let total = pages.len();
    info!("Start processing {} pages", total);

    let permits = match opts.max_concurrency {
        0 => total.max(1),
        n => n,
    };
    let semaphore = Arc::new(Semaphore::new(permits));

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    // Workers send page results, the loop below is the only writer of the set
    let (tx, mut rx) = mpsc::channel::<PageResult>(CHANNEL_CAPACITY);

    for url in pages {
        let fetcher = Arc::clone(&fetcher);
        let sem = Arc::clone(&semaphore);
        let tx = tx.clone();
        let timeout = opts.fetch_timeout;

        tokio::spawn(async move {
            let Ok(_permit) = sem.acquire().await else {
                return;
            };
            let outcome = fetch_phones(fetcher.as_ref(), &url, timeout).await;
            let _ = tx.send(PageResult { url, outcome }).await;
        });
    }

    // rx closes once every task has dropped its sender
    drop(tx);

    let mut collector = Collector::default();
    while let Some(result) = rx.recv().await {
        collector.record(result);
        pb.inc(1);
    }
    pb.finish_and_clear();

    // A task that panicked never sent its result
    let missing = total - collector.ok - collector.errors;
    if missing > 0 {
        warn!("{} page tasks ended without a result", missing);
        collector.errors += missing;
    }

    let phones: Vec<String> = collector.phones.into_iter().collect();
    provider
        .process_phone_numbers(&phones)
        .context("Failed to deliver phone numbers")?;

    let stats = RunStats {
        total,
        ok: collector.ok,
        errors: collector.errors,
        phones: phones.len(),
    };
    info!(
        "Processed {} pages ({} ok, {} errors), {} unique phones",
        stats.total, stats.ok, stats.errors, stats.phones
    );
    Ok(stats)
}

async fn fetch_phones(
    fetcher: &dyn PageFetcher,
    url: &str,
    timeout: Duration,
) -> Result<Vec<String>, FetchError> {
    let body = tokio::time::timeout(timeout, fetcher.fetch(url))
        .await
        .map_err(|_| FetchError::Timeout(timeout))??;
    Ok(phones::extract(&body))
}
