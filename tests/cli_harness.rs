#![allow(unused)]
//! Binary wiring harness: CLI flags + config file → picker.
//!
//! # What this covers
//!
//! - Flags override values from `config.toml`; unset flags leave them alone.
//! - `--directory` loads people from JSON; without it the demo roster is used.
//! - `--select` seeds the initial selection in flag order and rejects
//!   emails the directory does not know.
//! - The built picker searches the directory it was given.
//!
//! # Running
//!
//! ```sh
//! cargo test --test cli_harness
//! ```

mod common;
use clap::Parser;
use common::*;
use ppl::{build_picker, open_directory, resolve_selection, Cli};
use ppl_core::{config::Config, StalePolicy};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::{io::Write, time::Duration};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("ppl").chain(args.iter().copied()))
        .expect("valid arguments")
}

fn directory_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let people = vec![
        PersonBuilder::new("Ada Lovelace").email("ada@x.com").build(),
        PersonBuilder::new("Alan Turing").email("alan@x.com").alias("at").build(),
    ];
    file.write_all(serde_json::to_string(&people).unwrap().as_bytes())
        .unwrap();
    file
}

#[test]
fn flags_override_config_values() {
    let cli = parse(&[
        "--min-search-length",
        "1",
        "--debounce-ms",
        "50",
        "--required",
        "--required-message",
        "Pick a reviewer",
        "--theme",
        "gruvbox",
        "--latency-ms",
        "0",
    ]);
    let mut config = Config::defaults();
    cli.apply(&mut config);

    let options = config.picker.to_options();
    assert_eq!(options.min_search_length, 1);
    assert_eq!(options.debounce_delay, Duration::from_millis(50));
    assert!(options.is_required);
    assert_eq!(options.required_error_message, "Pick a reviewer");
    assert_eq!(config.ui.theme, "gruvbox");
    assert_eq!(config.directory.latency_ms, 0);
}

#[test]
fn unset_flags_keep_config_values() {
    let cli = parse(&[]);
    let mut config = Config::defaults();
    cli.apply(&mut config);
    let options = config.picker.to_options();
    assert_eq!(options.min_search_length, 3);
    assert_eq!(options.debounce_delay, Duration::from_millis(300));
    assert!(!options.is_required);
    assert_eq!(options.stale_policy, StalePolicy::LatestWins);
    assert_eq!(config.directory.latency_ms, 300);
}

#[rstest]
#[case::min_length(&["--min-search-length", "5"], "min_search_length", "5")]
#[case::debounce(&["--debounce-ms", "0"], "debounce_delay_ms", "0")]
#[case::required(&["--required"], "is_required", "true")]
#[case::message(&["--required-message", "Who?"], "required_error_message", "Who?")]
#[case::latency(&["--latency-ms", "15"], "latency_ms", "15")]
#[case::theme(&["--theme", "gruvbox"], "theme", "gruvbox")]
fn single_flag_overrides_one_value(
    #[case] args: &[&str],
    #[case] field: &str,
    #[case] expected: &str,
) {
    let mut config = Config::defaults();
    parse(args).apply(&mut config);
    let actual = match field {
        "min_search_length" => config.picker.min_search_length.to_string(),
        "debounce_delay_ms" => config.picker.debounce_delay_ms.to_string(),
        "is_required" => config.picker.is_required.to_string(),
        "required_error_message" => config.picker.required_error_message.clone(),
        "latency_ms" => config.directory.latency_ms.to_string(),
        "theme" => config.ui.theme.clone(),
        other => panic!("unknown field {other}"),
    };
    assert_eq!(actual, expected);
}

#[test]
fn config_file_is_layered_over_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[picker]\nmin_search_length = 2\nstale_results = \"arrival\"\n").unwrap();

    let cli = parse(&["--config", path.to_str().unwrap()]);
    let config = cli.resolve_config().unwrap();
    let options = config.picker.to_options();
    assert_eq!(options.min_search_length, 2);
    assert_eq!(options.stale_policy, StalePolicy::CompletionOrder);
    assert_eq!(options.debounce_delay, Duration::from_millis(300));
}

#[test]
fn select_flags_resolve_in_order() {
    let file = directory_file();
    let cli = parse(&[
        "--directory",
        file.path().to_str().unwrap(),
        "--select",
        "alan@x.com",
        "--select",
        "ADA@x.com",
    ]);
    let mut config = Config::defaults();
    cli.apply(&mut config);

    let directory = open_directory(&config).unwrap();
    assert_eq!(directory.len(), 2);
    let selected = resolve_selection(&directory, &cli.select).unwrap();
    assert_emails!(selected, ["alan@x.com", "ada@x.com"]);
}

#[test]
fn unknown_select_email_is_an_error() {
    let file = directory_file();
    let cli = parse(&["--directory", file.path().to_str().unwrap(), "--select", "who@x.com"]);
    let mut config = Config::defaults();
    cli.apply(&mut config);

    let directory = open_directory(&config).unwrap();
    let err = resolve_selection(&directory, &cli.select).unwrap_err();
    assert!(err.to_string().contains("who@x.com"));
}

#[test]
fn missing_directory_file_is_an_error() {
    let cli = parse(&["--directory", "/definitely/not/here.json"]);
    let mut config = Config::defaults();
    cli.apply(&mut config);
    assert!(open_directory(&config).is_err());
}

#[test]
fn demo_roster_is_the_default_directory() {
    let mut config = Config::defaults();
    config.directory.path = None;
    let directory = open_directory(&config).unwrap();
    assert!(!directory.is_empty());
}

#[tokio::test(start_paused = true)]
async fn built_picker_searches_the_directory() {
    let file = directory_file();
    let cli = parse(&[
        "--directory",
        file.path().to_str().unwrap(),
        "--min-search-length",
        "2",
        "--latency-ms",
        "200",
        "--select",
        "ada@x.com",
    ]);
    let mut config = Config::defaults();
    cli.apply(&mut config);
    let directory = open_directory(&config).unwrap();
    let selected = resolve_selection(&directory, &cli.select).unwrap();
    let mut picker = build_picker(config.picker.to_options(), directory, selected);

    // "la" matches both names; Ada is already selected.
    picker.set_query("la");
    picker.run_until_idle().await;
    assert_emails!(picker.results(), ["alan@x.com"]);
    assert_emails!(picker.selection(), ["ada@x.com"]);
}
