use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Directory holding the JSON snapshots written by the fetch layer.
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    /// Official news items shown by `news`.
    pub news_limit: usize,
}

impl Settings {
    /// Defaults, overridden by `RSO_*` environment variables
    /// (`RSO_DATA_DIR`, `RSO_DB_PATH`, `RSO_NEWS_LIMIT`).
    pub fn load() -> Result<Self> {
        config::Config::builder()
            .set_default("data_dir", "data")?
            .set_default("db_path", "data/rso.sqlite")?
            .set_default("news_limit", 5)?
            .add_source(config::Environment::with_prefix("RSO"))
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Invalid settings")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load() {
        let s = Settings::load().unwrap();
        assert!(s.news_limit > 0);
        assert!(!s.db_path.as_os_str().is_empty());
    }
}
