pub mod config;
pub mod controller;
pub mod discover;
pub mod error;
pub mod header;
pub mod hls;
pub mod logging;
pub mod mux;
pub mod playlist;
pub mod record;
pub mod search;
pub mod store;
pub mod transport;
pub mod trim;
