//! Core configuration types.
//! - Config holds the three run inputs plus runtime knobs.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::LswapError;
use crate::fs_ops::{ContentList, SwapOptions};

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Runtime configuration for one lswap run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Directory the contents currently live in
    pub from: Option<String>,
    /// Directory the contents are moved to
    pub to: Option<String>,
    /// Raw content chunks; each may hold several comma-separated names
    pub contents: Vec<String>,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// If true, log actions but do not modify the filesystem
    pub dry_run: bool,
    /// If true, relink names an interrupted run already moved
    pub resume: bool,
}

impl Config {
    /// The three run inputs, checked for presence. Content names are split and
    /// validated here, once.
    pub fn inputs(&self) -> Result<(&str, &str, ContentList), LswapError> {
        let from = non_empty(self.from.as_deref()).ok_or(LswapError::MissingInput("from"))?;
        let to = non_empty(self.to.as_deref()).ok_or(LswapError::MissingInput("to"))?;
        if self.contents.is_empty() {
            return Err(LswapError::MissingInput("contents"));
        }
        let contents = ContentList::from_delimited(&self.contents)?;
        Ok((from, to, contents))
    }

    pub fn swap_options(&self) -> SwapOptions {
        SwapOptions {
            dry_run: self.dry_run,
            resume: self.resume,
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inputs_report_first_missing_value() {
        let mut cfg = Config::default();
        assert!(matches!(cfg.inputs(), Err(LswapError::MissingInput("from"))));
        cfg.from = Some("/a".into());
        assert!(matches!(cfg.inputs(), Err(LswapError::MissingInput("to"))));
        cfg.to = Some("/b".into());
        assert!(matches!(cfg.inputs(), Err(LswapError::MissingInput("contents"))));
        cfg.contents = vec!["pkg,bin".into()];
        let (from, to, list) = cfg.inputs().unwrap();
        assert_eq!((from, to, list.len()), ("/a", "/b", 2));
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let cfg = Config {
            from: Some(String::new()),
            to: Some("/b".into()),
            contents: vec!["x".into()],
            ..Config::default()
        };
        assert!(matches!(cfg.inputs(), Err(LswapError::MissingInput("from"))));
    }
}
