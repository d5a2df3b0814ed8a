//! `recu run` – download every unfinished task.

use anyhow::{bail, Result};
use recu_core::controller::Controller;
use recu_core::hls::{HlsPageParser, SegmentMuxer};
use recu_core::store::ConfigStore;
use recu_core::transport::CurlTransport;
use std::path::Path;

pub fn run_batch(store: &ConfigStore, output_dir: &Path) -> Result<()> {
    let mut config = store.load_or_init()?;
    if config.is_empty() {
        bail!(
            "{} is not configured yet: add urls and fill in the Cookie and User-Agent headers",
            store.path().display()
        );
    }
    config.validate_headers()?;

    let controller = Controller::new(
        store,
        HlsPageParser::new(CurlTransport::new()),
        SegmentMuxer::new(CurlTransport::new(), output_dir).with_progress(true),
    );
    let summary = controller.process_all(&mut config);
    println!(
        "Done: {} completed, {} already complete, {} failed, {} skipped",
        summary.completed, summary.already_complete, summary.failed, summary.skipped
    );
    Ok(())
}
