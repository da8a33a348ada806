//! Core library for `lswap`.
//!
//! Moves a list of named entries from a source directory into a destination
//! directory and leaves a symlink at each original location. Running it again
//! with the same inputs is a no-op.
//!
//! Layout:
//! - `fs_ops`: path resolution, preflight checks and the unlink/move/link phases
//! - `config` and `cli`: where the three inputs come from
//! - `platform`: file identity and symlink primitives per OS

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;

pub use config::{
    Config, LogLevel, default_config_path, default_log_path, path_has_symlink_ancestor,
};
pub use errors::{ErrorKind, LswapError, VerificationError};
pub use fs_ops::{
    Action, ContentList, ContentName, EntryState, Plan, Report, SwapOptions, swap,
};
