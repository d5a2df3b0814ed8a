//! `recu add <url> [--trim START END EXTRA]` – add a task manually.

use anyhow::{bail, Result};
use recu_core::record::TrimSpec;
use recu_core::store::ConfigStore;

pub fn run_add(store: &ConfigStore, url: &str, trim: Option<&[f64]>) -> Result<()> {
    if url.trim().is_empty() {
        bail!("url must not be empty");
    }
    let trim = match trim {
        Some(&[start, end, extra]) => Some(TrimSpec::new(start, end, extra)?),
        Some(other) => bail!("--trim takes 3 values, got {}", other.len()),
        None => None,
    };

    let mut config = store.load_or_init()?;
    if config.contains_url(url) {
        println!("Already tracked: {url}");
        return Ok(());
    }
    let index = config.push_url(url, trim);
    store.save(&config)?;
    println!("Added task {index} for URL: {url}");
    Ok(())
}
