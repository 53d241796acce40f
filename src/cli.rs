//! Command-line interface for Retrace
//!
//! This module provides the CLI for retrieving shell history with trace
//! markers and for garbage-collecting old trace files.

use crate::config::Config;
use crate::entry::HistoryEntry;
use crate::error::{Error, Result};
use crate::gc::{self, RetentionPolicy};
use crate::histfile;
use crate::keeper::{Harvest, RetrievalMode};
use crate::process;
use crate::traces::FsTraceStore;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Retrace - shell history retrieval with per-command output traces
#[derive(Parser)]
#[command(name = "retrace")]
#[command(about = "Shell history retrieval with per-command output traces")]
#[command(version, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show history entries, marking commands that have a recorded trace
    Show(ShowArgs),
    /// Garbage-collect old trace files
    Gc(GcArgs),
    /// Show effective configuration
    Config,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Show only the most recent entry
    #[arg(short, long, conflicts_with_all = ["number", "range"])]
    pub last: bool,

    /// Show the entry with exactly this sequence number
    #[arg(short, long, conflicts_with = "range")]
    pub number: Option<u64>,

    /// Show entries at positions START..FINISH (inclusive, zero-based)
    #[arg(short, long, num_args = 2, value_names = ["START", "FINISH"])]
    pub range: Option<Vec<usize>>,

    /// History file to read instead of the configured one
    #[arg(long)]
    pub histfile: Option<PathBuf>,

    /// History file format instead of the configured one
    #[arg(long)]
    pub shell: Option<String>,
}

#[derive(Args)]
pub struct GcArgs {
    /// Delete every trace file
    #[arg(long, conflicts_with_all = ["keep_latest", "older_than"])]
    pub all: bool,

    /// Retain only the N most recently modified trace files
    #[arg(long, value_name = "N", conflicts_with = "older_than")]
    pub keep_latest: Option<usize>,

    /// Delete trace files older than DAYS days
    #[arg(long, value_name = "DAYS")]
    pub older_than: Option<u32>,
}

/// Application state shared across command handlers
pub struct CliApp {
    config: Config,
    quiet: bool,
}

impl CliApp {
    /// Create a new CLI application from parsed arguments
    pub fn new(cli: &Cli) -> Result<Self> {
        let config = if let Some(config_path) = &cli.config {
            Config::load_from_path(config_path)?
        } else {
            Config::load().unwrap_or_else(|_| Config::default())
        };

        Ok(Self {
            config,
            quiet: cli.quiet,
        })
    }

    /// Run the CLI application
    pub fn run(&mut self, command: &Commands) -> Result<()> {
        match command {
            Commands::Show(args) => self.handle_show(args),
            Commands::Gc(args) => self.handle_gc(args),
            Commands::Config => self.handle_config(),
        }
    }

    fn handle_show(&self, args: &ShowArgs) -> Result<()> {
        let mode = retrieval_mode(args)?;

        let history_file = args
            .histfile
            .as_ref()
            .unwrap_or(&self.config.history_file);
        let shell = args.shell.as_deref().unwrap_or(&self.config.shell);

        let entries = histfile::load(history_file, shell)?;
        let store = FsTraceStore::new(self.config.traces_dir.clone());
        let harvest = process::collect(entries, mode, store, self.config.effective_capacity())?;

        match harvest {
            Harvest::Single(entry) => self.print_entry(&entry),
            Harvest::Entries(entries) => {
                for entry in &entries {
                    self.print_entry(entry);
                }
            }
        }

        Ok(())
    }

    fn handle_gc(&self, args: &GcArgs) -> Result<()> {
        let policy = retention_policy(args)?;

        let store = FsTraceStore::new(self.config.traces_dir.clone());
        let deleted = gc::prune(&store, policy)?;

        if !self.quiet {
            println!("Removed {} trace file(s)", deleted.len());
        }

        Ok(())
    }

    fn handle_config(&self) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(&self.config)?);
        Ok(())
    }

    fn print_entry(&self, entry: &HistoryEntry) {
        println!(
            "{:>5} {} {}",
            entry.number,
            entry.history_marker(),
            entry.display_command()
        );
    }
}

/// Map show flags to a retrieval mode; no flags means everything.
fn retrieval_mode(args: &ShowArgs) -> Result<RetrievalMode> {
    if args.last {
        return Ok(RetrievalMode::Single);
    }
    if let Some(number) = args.number {
        return Ok(RetrievalMode::PreciseNumber(number));
    }
    if let Some(range) = &args.range {
        let [start, finish] = range.as_slice() else {
            return Err(Error::invalid_arguments(
                "--range takes exactly two positions",
            ));
        };
        return Ok(RetrievalMode::Range {
            start: *start,
            finish: *finish,
        });
    }
    Ok(RetrievalMode::All)
}

/// Map gc flags to a retention policy; exactly one must be given.
fn retention_policy(args: &GcArgs) -> Result<RetentionPolicy> {
    match (args.all, args.keep_latest, args.older_than) {
        (true, None, None) => Ok(RetentionPolicy::All),
        (false, Some(keep), None) => Ok(RetentionPolicy::KeepLatest(keep)),
        (false, None, Some(days)) => Ok(RetentionPolicy::OlderThan(days)),
        _ => Err(Error::invalid_arguments(
            "gc requires exactly one of --all, --keep-latest, --older-than",
        )),
    }
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut app = CliApp::new(&cli)?;
    app.run(&cli.command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show_args() -> ShowArgs {
        ShowArgs {
            last: false,
            number: None,
            range: None,
            histfile: None,
            shell: None,
        }
    }

    #[test]
    fn test_retrieval_mode_defaults_to_all() {
        assert_eq!(retrieval_mode(&show_args()).unwrap(), RetrievalMode::All);
    }

    #[test]
    fn test_retrieval_mode_last() {
        let mut args = show_args();
        args.last = true;
        assert_eq!(retrieval_mode(&args).unwrap(), RetrievalMode::Single);
    }

    #[test]
    fn test_retrieval_mode_number() {
        let mut args = show_args();
        args.number = Some(17);
        assert_eq!(
            retrieval_mode(&args).unwrap(),
            RetrievalMode::PreciseNumber(17)
        );
    }

    #[test]
    fn test_retrieval_mode_range() {
        let mut args = show_args();
        args.range = Some(vec![2, 5]);
        assert_eq!(
            retrieval_mode(&args).unwrap(),
            RetrievalMode::Range { start: 2, finish: 5 }
        );
    }

    #[test]
    fn test_retention_policy_requires_exactly_one_flag() {
        let args = GcArgs {
            all: false,
            keep_latest: None,
            older_than: None,
        };
        assert!(retention_policy(&args).is_err());

        let args = GcArgs {
            all: true,
            keep_latest: Some(3),
            older_than: None,
        };
        assert!(retention_policy(&args).is_err());
    }

    #[test]
    fn test_retention_policy_mapping() {
        let args = GcArgs {
            all: false,
            keep_latest: Some(10),
            older_than: None,
        };
        assert_eq!(
            retention_policy(&args).unwrap(),
            RetentionPolicy::KeepLatest(10)
        );

        let args = GcArgs {
            all: false,
            keep_latest: None,
            older_than: Some(30),
        };
        assert_eq!(
            retention_policy(&args).unwrap(),
            RetentionPolicy::OlderThan(30)
        );
    }

    #[test]
    fn test_cli_parses_show_range() {
        let cli = Cli::try_parse_from(["retrace", "show", "--range", "2", "5"]).unwrap();
        match cli.command {
            Commands::Show(args) => assert_eq!(args.range, Some(vec![2, 5])),
            _ => panic!("expected show command"),
        }
    }

    #[test]
    fn test_cli_rejects_conflicting_show_flags() {
        assert!(Cli::try_parse_from(["retrace", "show", "--last", "--number", "3"]).is_err());
    }

    #[test]
    fn test_cli_parses_gc_keep_latest() {
        let cli = Cli::try_parse_from(["retrace", "gc", "--keep-latest", "20"]).unwrap();
        match cli.command {
            Commands::Gc(args) => assert_eq!(args.keep_latest, Some(20)),
            _ => panic!("expected gc command"),
        }
    }
}
