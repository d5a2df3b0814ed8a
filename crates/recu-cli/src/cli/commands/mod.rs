//! CLI command handlers, one file per command.

mod add;
mod init;
mod run;
mod scrape;
mod status;

pub use add::run_add;
pub use init::run_init;
pub use run::run_batch;
pub use scrape::run_scrape;
pub use status::run_status;
