//! Typed error definitions for lswap.
//! Every failure the core can produce maps to one of five kinds; the binary
//! turns the kind into an exit code.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse failure category. Drives exit codes and the `kind` log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    PathResolution,
    RootValidation,
    Preflight,
    Mutation,
}

impl ErrorKind {
    /// Process exit code for this category.
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Configuration => 2,
            ErrorKind::PathResolution => 3,
            ErrorKind::RootValidation => 4,
            ErrorKind::Preflight => 5,
            ErrorKind::Mutation => 6,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::PathResolution => "path_resolution",
            ErrorKind::RootValidation => "root_validation",
            ErrorKind::Preflight => "preflight",
            ErrorKind::Mutation => "mutation",
        };
        f.write_str(s)
    }
}

/// Why a destination symlink could not be confirmed to point at its origin.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("{0} is not a symlink")]
    NotASymlink(PathBuf),

    #[error("cannot inspect {path}: {source}")]
    Inspect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("symlink {link} is broken; target {target} cannot be read: {source}")]
    BrokenLink {
        link: PathBuf,
        target: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("expected origin {origin} cannot be read: {source}")]
    OriginMissing {
        origin: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("symlink {link} points to {target}, not to {origin}")]
    MismatchedTarget {
        link: PathBuf,
        target: PathBuf,
        origin: PathBuf,
    },
}

#[derive(Debug, Error)]
pub enum LswapError {
    // Configuration
    #[error("missing required input: {0}")]
    MissingInput(&'static str),

    #[error("cannot provide empty string for content")]
    EmptyContentName,

    #[error("content name '{0}' must name a single entry directly under the source")]
    InvalidContentName(String),

    #[error("content name '{0}' given more than once")]
    DuplicateContent(String),

    #[error("invalid config file {path}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    // Path resolution
    #[error("cannot resolve absolute path for {path}: {source}")]
    PathResolution {
        path: String,
        #[source]
        source: io::Error,
    },

    // Root validation
    #[error("from: {from} and to: {to} are same file locations")]
    SameLocation { from: PathBuf, to: PathBuf },

    #[error("cannot read file information for root {path}: {source}")]
    RootInspect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("provided root should not be a symlink: {0}")]
    RootIsSymlink(PathBuf),

    #[error("provided root is not a directory: {0}")]
    RootNotDirectory(PathBuf),

    // Preflight
    #[error("content {0} not found")]
    MissingSourceContent(PathBuf),

    #[error("content {0} is a symlink; only real entries can be relocated")]
    SourceContentIsSymlink(PathBuf),

    #[error("{0} already exists and is not a symlink")]
    DestinationContentNotSymlink(PathBuf),

    #[error("destination symlink {link} does not point to expected source: {source}")]
    DestinationSymlinkMismatch {
        link: PathBuf,
        #[source]
        source: VerificationError,
    },

    #[error("content {content} contains the destination root {dest}")]
    ContentContainsDestination { content: PathBuf, dest: PathBuf },

    #[error("cannot inspect {path}: {source}")]
    Inspect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // Mutation
    #[error("unlink phase failed on {path}: {source}")]
    Unlink {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("move phase failed for {from} -> {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("link phase failed creating {link} -> {target}: {source}")]
    Link {
        link: PathBuf,
        target: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LswapError {
    pub fn kind(&self) -> ErrorKind {
        use LswapError::*;
        match self {
            MissingInput(_)
            | EmptyContentName
            | InvalidContentName(_)
            | DuplicateContent(_)
            | InvalidConfig { .. } => ErrorKind::Configuration,
            PathResolution { .. } => ErrorKind::PathResolution,
            SameLocation { .. } | RootInspect { .. } | RootIsSymlink(_) | RootNotDirectory(_) => {
                ErrorKind::RootValidation
            }
            MissingSourceContent(_)
            | SourceContentIsSymlink(_)
            | DestinationContentNotSymlink(_)
            | DestinationSymlinkMismatch { .. }
            | ContentContainsDestination { .. }
            | Inspect { .. } => ErrorKind::Preflight,
            Unlink { .. } | Move { .. } | Link { .. } => ErrorKind::Mutation,
        }
    }

    /// Exit code used by the binary.
    pub fn code(&self) -> u8 {
        self.kind().exit_code()
    }

    /// Short snake_case tag for structured logs.
    pub fn tag(&self) -> &'static str {
        use LswapError::*;
        match self {
            MissingInput(_) => "missing_input",
            EmptyContentName => "empty_content_name",
            InvalidContentName(_) => "invalid_content_name",
            DuplicateContent(_) => "duplicate_content",
            InvalidConfig { .. } => "invalid_config",
            PathResolution { .. } => "path_resolution",
            SameLocation { .. } => "same_location",
            RootInspect { .. } => "root_inspect",
            RootIsSymlink(_) => "root_is_symlink",
            RootNotDirectory(_) => "root_not_directory",
            MissingSourceContent(_) => "missing_source_content",
            SourceContentIsSymlink(_) => "source_content_is_symlink",
            DestinationContentNotSymlink(_) => "destination_content_not_symlink",
            DestinationSymlinkMismatch { .. } => "destination_symlink_mismatch",
            ContentContainsDestination { .. } => "content_contains_destination",
            Inspect { .. } => "inspect",
            Unlink { .. } => "unlink",
            Move { .. } => "move",
            Link { .. } => "link",
        }
    }
}
