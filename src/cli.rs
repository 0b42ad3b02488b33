// File: ./src/cli.rs
//! Shared command-line interface logic: argument parsing, help, and the
//! non-interactive `list` command.
use crate::client::SourceClient;
use crate::config::{Config, LogLevel};
use crate::controller::DashboardController;
use crate::loader::{DatasetSources, load_dataset};
use crate::model::{ConferenceDisplay, ConferenceInstance};
use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dashboard,
    List { search: Option<String> },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub command: Command,
    pub root: Option<PathBuf>,
    pub conferences: Option<String>,
    pub taxonomies: Vec<String>,
}

fn value_for(flag: &str, it: &mut impl Iterator<Item = String>) -> Result<String> {
    it.next()
        .ok_or_else(|| anyhow!("Option '{}' requires a value", flag))
}

/// Parses arguments, excluding the program name.
pub fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs> {
    let mut parsed = CliArgs {
        command: Command::Dashboard,
        root: None,
        conferences: None,
        taxonomies: Vec::new(),
    };
    let mut it = args.into_iter();

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" | "help" => parsed.command = Command::Help,
            "-r" | "--root" => parsed.root = Some(PathBuf::from(value_for(&arg, &mut it)?)),
            "--conferences" => parsed.conferences = Some(value_for(&arg, &mut it)?),
            "--taxonomy" => parsed.taxonomies.push(value_for(&arg, &mut it)?),
            "list" => {
                if parsed.command == Command::Dashboard {
                    parsed.command = Command::List { search: None };
                }
            }
            "--search" => {
                let q = value_for(&arg, &mut it)?;
                match &mut parsed.command {
                    Command::List { search } => *search = Some(q),
                    _ => return Err(anyhow!("'--search' is only valid after 'list'")),
                }
            }
            other => return Err(anyhow!("Unknown argument '{}'", other)),
        }
    }
    Ok(parsed)
}

pub fn print_help(binary_name: &str) {
    println!(
        "Deadlines v{} - Countdown dashboard for academic conference deadlines",
        env!("CARGO_PKG_VERSION"),
    );
    println!();
    println!("USAGE:");
    println!("    {} [OPTIONS]                    Start the interactive dashboard", binary_name);
    println!("    {} list [--search <q>] [OPTIONS] Print the deadline list and exit", binary_name);
    println!("    {} --help", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>         Use a different directory for config and data.");
    println!("    --conferences <src>       Conference list (YAML), as a path or http(s) URL.");
    println!("    --taxonomy <src>          Area classification table (CSV). Repeatable.");
    println!("    -h, --help                Show this help message.");
    println!();
    println!("CONFIG:");
    println!("    config.toml in the config directory; created with defaults on first run.");
    println!("    log_level accepts: {}", LogLevel::accepted());
    println!();
    println!("KEYBINDINGS:");
    println!("    Press '?' inside the app for full interactive help");
}

/// One line per conference: title, countdown and deadline date, padded into columns.
pub fn render_list(list: &[ConferenceInstance], now: DateTime<Utc>) -> Vec<String> {
    let titles: Vec<String> = list.iter().map(|c| c.title()).collect();
    let width = titles.iter().map(|t| t.width()).max().unwrap_or(0);

    list.iter()
        .zip(titles)
        .map(|(c, title)| {
            let pad = " ".repeat(width - title.width());
            format!(
                "{}{}  {:<16}  {}",
                title,
                pad,
                c.countdown_label(now),
                c.deadline_label()
            )
        })
        .collect()
}

/// Loads every source, applies the default selection and the query, and
/// returns the display list.
pub async fn list_deadlines(
    config: &Config,
    sources: &DatasetSources,
    search: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Vec<ConferenceInstance>> {
    let client = SourceClient::new()?;
    let dataset = load_dataset(&client, sources).await?;

    let mut controller = DashboardController::new();
    controller.apply_dataset(dataset, config.default_taxonomy.as_deref(), now);
    controller.set_hide_next_tier(config.hide_next_tier, now);
    Ok(controller.set_search_query(search.unwrap_or_default(), now))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults_to_dashboard() {
        let parsed = parse_args(Vec::new()).unwrap();
        assert_eq!(parsed.command, Command::Dashboard);
        assert!(parsed.taxonomies.is_empty());
    }

    #[test]
    fn test_list_with_search_and_sources() {
        let parsed = parse_args(args(&[
            "list",
            "--search",
            "icse",
            "--taxonomy",
            "a.csv",
            "--taxonomy",
            "https://example.org/core.csv",
            "-r",
            "/tmp/x",
        ]))
        .unwrap();
        assert_eq!(
            parsed.command,
            Command::List {
                search: Some("icse".into())
            }
        );
        assert_eq!(parsed.taxonomies.len(), 2);
        assert_eq!(parsed.root, Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(parse_args(args(&["--root"])).is_err());
        assert!(parse_args(args(&["--search", "x"])).is_err());
        assert!(parse_args(args(&["--bogus"])).is_err());
    }

    #[test]
    fn test_help_wins() {
        let parsed = parse_args(args(&["list", "--help"])).unwrap();
        assert_eq!(parsed.command, Command::Help);
    }

    #[test]
    fn test_render_list_columns() {
        let now = Utc::now();
        let list = vec![
            ConferenceInstance::new("FSE", Some(2026))
                .with_deadline(now + chrono::Duration::seconds(90061)),
            ConferenceInstance::new("NeurIPS", None),
        ];
        let lines = render_list(&list, now);
        assert!(lines[0].starts_with("FSE 2026  01d 01h 0"));
        assert!(lines[1].starts_with("NeurIPS   TBD"));
        assert!(lines[1].ends_with("TBD"));
    }
}
