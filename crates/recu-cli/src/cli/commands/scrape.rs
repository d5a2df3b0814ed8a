//! `recu scrape <page-url>` – add play links found on a listing page.

use anyhow::Result;
use recu_core::discover::discover_links;
use recu_core::store::ConfigStore;
use recu_core::transport::CurlTransport;

pub fn run_scrape(store: &ConfigStore, page_url: &str) -> Result<()> {
    let mut config = store.load_or_init()?;
    config.validate_headers()?;

    println!("Downloading HTML");
    let added = discover_links(store, &mut config, &CurlTransport::new(), page_url)?;
    println!("Added {added} new link(s) to {}", store.path().display());
    Ok(())
}
