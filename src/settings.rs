use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

const CONFIG_FILE: &str = "phone_scraper";
const ENV_PREFIX: &str = "PHONES";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Storage {
    Json,
    Sqlite,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub storage: Storage,
    pub pages_path: PathBuf,
    pub phones_path: PathBuf,
    pub db_path: PathBuf,
    pub fetch_timeout_secs: u64,
    /// 0 means one task per page with no further limit.
    pub max_concurrency: usize,
}

impl Settings {
    /// Defaults, then `phone_scraper.toml` if present, then `PHONES_*` env vars.
    pub fn load() -> Result<Self> {
        let builder = Config::builder().add_source(File::with_name(CONFIG_FILE).required(false));
        Self::build(builder)
    }

    fn build(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let settings: Settings = builder
            .set_default("storage", "json")?
            .set_default("pages_path", "json_data/pages.json")?
            .set_default("phones_path", "json_data/phones.json")?
            .set_default("db_path", "data/phones.sqlite")?
            .set_default("fetch_timeout_secs", 15)?
            .set_default("max_concurrency", 0)?
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
            .context("Invalid settings")?;

        if settings.fetch_timeout_secs == 0 {
            bail!("fetch_timeout_secs must be greater than zero");
        }
        Ok(settings)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
