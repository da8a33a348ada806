//! Application orchestrator.
//! Loads/merges config, initializes logging, runs the swap and reports the outcome.
//! Only this layer and `main` know about processes and exit codes.

use anyhow::Result;
use std::io;
use tracing::{debug, error, info};

use lswap::cli::Args;
use lswap::config::load_config;
use lswap::fs_ops::io_hint;
use lswap::output as out;
use lswap::{Config, ContentName, LswapError, Report, default_config_path, swap};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handle --print-config before logging init
    if args.print_config {
        print_config();
        return Ok(());
    }

    let (cfg_path, mut cfg) = match load_config()? {
        Some((path, cfg)) => (Some(path), cfg),
        None => (None, Config::default()),
    };
    args.apply_overrides(&mut cfg);

    // Hold the guard until the run is over so buffered file logs get flushed.
    let guard = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).inspect_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {}", e));
    })?;

    debug!(?args, "Starting lswap");
    if let Some(p) = &cfg_path {
        debug!(config = %p.display(), "Using config file");
    }

    let result = execute(&cfg);
    drop(guard);
    result
}

fn execute(cfg: &Config) -> Result<()> {
    let outcome = cfg
        .inputs()
        .and_then(|(from, to, contents)| swap(from, to, &contents, &cfg.swap_options()));

    match outcome {
        Ok(report) => {
            report_success(&report);
            Ok(())
        }
        Err(e) => {
            error!(code = e.code(), kind = %e.kind(), tag = e.tag(), error = %e, "lswap failed");
            Err(e.into())
        }
    }
}

fn list(names: &[ContentName]) -> String {
    names.iter().map(ContentName::as_str).collect::<Vec<_>>().join(",")
}

fn report_success(report: &Report) {
    if report.dry_run {
        info!(
            relocate = %list(&report.relocated),
            relink = %list(&report.relinked),
            skip = %list(&report.skipped),
            "dry-run complete"
        );
        out::print_info(&format!(
            "Dry-run: would relocate [{}], relink [{}]; already done [{}]",
            list(&report.relocated),
            list(&report.relinked),
            list(&report.skipped)
        ));
        return;
    }

    info!(
        relocated = %list(&report.relocated),
        relinked = %list(&report.relinked),
        skipped = %list(&report.skipped),
        "done"
    );
    if report.changed_anything() {
        let mut done = report.relocated.clone();
        done.extend(report.relinked.iter().cloned());
        out::print_success(&format!("relocated {}", list(&done)));
    } else {
        out::print_success("nothing to do; all contents already relocated");
    }
}

fn print_config() {
    if let Ok(cfg_env) = std::env::var(lswap::config::CONFIG_ENV) {
        out::print_info(&format!("Using LSWAP_CONFIG (explicit):\n  {}\n", cfg_env));
        out::print_info("To override, unset LSWAP_CONFIG or set it to another file.");
        return;
    }
    match default_config_path() {
        Ok(p) => {
            out::print_info(&format!("Default lswap config path:\n  {}\n", p.display()));
            if p.exists() {
                out::print_info("A config file exists at that location.");
            } else {
                out::print_info(
                    "No config file exists there. Create one with <from>, <to>, <contents>, <log_level> or <log_file> elements inside <config>.",
                );
            }
        }
        Err(e) => out::print_error(&format!("Could not determine a default config path: {e}")),
    }
}

/// One-line diagnostic for a failed run, with an OS hint when an I/O error is
/// somewhere in the chain.
pub fn diagnostic(err: &anyhow::Error) -> String {
    let mut msg = err.to_string();
    let hint = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<io::Error>())
        .and_then(io_hint);
    if let Some(hint) = hint {
        msg.push_str(" (hint: ");
        msg.push_str(hint);
        msg.push(')');
    }
    msg
}

/// Exit code for a failed run: the error kind's code, or 1 for anything untyped.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<LswapError>().map_or(1, LswapError::code)
}
