//! `recu status` – list tasks and their progress.

use anyhow::Result;
use recu_core::store::ConfigStore;

pub fn run_status(store: &ConfigStore) -> Result<()> {
    let config = store.load()?;
    if config.urls.is_empty() {
        println!("No tasks in {}.", store.path().display());
        return Ok(());
    }
    println!("{:<6} {:<12} {:<12} {}", "INDEX", "STATE", "TRIM", "URL");
    for (index, entry) in config.urls.iter().enumerate() {
        let (trim, url) = match entry.decode() {
            Ok(rec) => {
                let w = rec.trim_window();
                let trim = if w.is_full() {
                    "-".to_string()
                } else {
                    format!("{}-{}%", w.start, w.end)
                };
                (trim, rec.url)
            }
            Err(_) => ("-".to_string(), entry.as_value().to_string()),
        };
        println!("{:<6} {:<12} {:<12} {}", index, entry.describe(), trim, url);
    }
    Ok(())
}
