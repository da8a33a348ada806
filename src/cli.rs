//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - --contents may be repeated; every value is also split on commas.
//! - --debug is a shorthand for --log-level debug.

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};

/// Move named entries from one directory to another and symlink them back.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Relocate directory contents and leave symlinks behind (re-runnable)"
)]
pub struct Args {
    /// Folder where the contents currently are.
    #[arg(long, short = 'f', value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub from: Option<String>,

    /// Folder the contents will be moved to.
    #[arg(long, short = 't', value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub to: Option<String>,

    /// Comma separated list of entries under --from to move. May be repeated.
    #[arg(long, short = 'c', value_name = "NAMES")]
    pub contents: Vec<String>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Also write logs to this file.
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Print where lswap will look for the config file (or LSWAP_CONFIG if set), then exit.
    #[arg(long, help = "Print the config file location used by lswap and exit")]
    pub print_config: bool,

    /// Dry-run: validate and log actions but do not modify the filesystem.
    #[arg(
        long,
        help = "Validate and show what would be done, but do not modify anything"
    )]
    pub dry_run: bool,

    /// Relink entries an interrupted run already moved to the destination.
    /// Any real destination entry whose source is missing is linked, whether or
    /// not lswap moved it there.
    #[arg(
        long,
        help = "Accept contents already moved by an interrupted run and only relink them. \
                Any name missing under --from but present under --to gets linked, \
                so check the names first"
    )]
    pub resume: bool,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    /// Contents given on the command line replace those from the config file.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(from) = &self.from {
            cfg.from = Some(sanitize_str(from));
        }
        if let Some(to) = &self.to {
            cfg.to = Some(sanitize_str(to));
        }
        if !self.contents.is_empty() {
            cfg.contents = self.contents.clone();
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(p) = &self.log_file {
            cfg.log_file = Some(p.clone());
        }
        if self.dry_run {
            cfg.dry_run = true;
        }
        if self.resume {
            cfg.resume = true;
        }
    }
}

/// Trim surrounding single/double quotes left behind by PowerShell/CMD quoting
/// mistakes. A lone trailing separator is kept; path cleaning removes it later.
fn sanitize_str(s: &str) -> String {
    let trimmed = s.trim();
    let quoted = trimmed.len() >= 2
        && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')));
    if quoted {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.trim_matches(|c| c == '\'' || c == '"').to_string()
    }
}

pub fn parse() -> Args {
    Args::parse()
}
