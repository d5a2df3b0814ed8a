//! CLI parse tests.

use super::{Cli, CliCommand};
use clap::Parser;
use std::path::Path;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn cli_parse_default_config_path() {
    let cli = parse(&["recu", "status"]);
    assert_eq!(cli.config, Path::new("config.json"));
    assert!(matches!(cli.command, CliCommand::Status));
}

#[test]
fn cli_parse_global_config_flag() {
    let cli = parse(&["recu", "run", "--config", "/tmp/tasks.json"]);
    assert_eq!(cli.config, Path::new("/tmp/tasks.json"));
    match cli.command {
        CliCommand::Run { output_dir } => assert!(output_dir.is_none()),
        _ => panic!("expected Run"),
    }
}

#[test]
fn cli_parse_run_output_dir() {
    match parse(&["recu", "run", "--output-dir", "/videos"]).command {
        CliCommand::Run { output_dir } => {
            assert_eq!(output_dir.as_deref(), Some(Path::new("/videos")))
        }
        _ => panic!("expected Run with --output-dir"),
    }
}

#[test]
fn cli_parse_add() {
    match parse(&["recu", "add", "https://site.example/r/video/a/play"]).command {
        CliCommand::Add { url, trim } => {
            assert_eq!(url, "https://site.example/r/video/a/play");
            assert!(trim.is_none());
        }
        _ => panic!("expected Add"),
    }
}

#[test]
fn cli_parse_add_trim() {
    match parse(&["recu", "add", "https://s/x/play", "--trim", "10", "55.5", "0"]).command {
        CliCommand::Add { trim, .. } => assert_eq!(trim, Some(vec![10.0, 55.5, 0.0])),
        _ => panic!("expected Add with --trim"),
    }
}

#[test]
fn cli_parse_add_trim_needs_three_values() {
    assert!(Cli::try_parse_from(["recu", "add", "https://s/x/play", "--trim", "10", "20"]).is_err());
}

#[test]
fn cli_parse_scrape_and_init() {
    match parse(&["recu", "scrape", "https://site.example/room1/listing"]).command {
        CliCommand::Scrape { page_url } => {
            assert_eq!(page_url, "https://site.example/room1/listing")
        }
        _ => panic!("expected Scrape"),
    }
    assert!(matches!(parse(&["recu", "init"]).command, CliCommand::Init));
}
