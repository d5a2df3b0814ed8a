//! `recu init` – write the task file template.

use anyhow::Result;
use recu_core::store::ConfigStore;

pub fn run_init(store: &ConfigStore) -> Result<()> {
    if store.path().exists() {
        println!("Task file already exists: {}", store.path().display());
        return Ok(());
    }
    store.load_or_init()?;
    println!(
        "Wrote {}; fill in the Cookie and User-Agent headers and add urls.",
        store.path().display()
    );
    Ok(())
}
