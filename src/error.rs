//! Error taxonomy for the recorder.
//!
//! Two tiers, kept as distinct types so callers cannot confuse them:
//! - [`RecorderError`] — fatal, aborts the whole run (missing import root,
//!   a delivered path without the `ASCII/` marker, database loss).
//! - [`FileFailure`] — aborts one staged file; the dispatcher records the
//!   failure on its `load_log` entry and moves on.
//!
//! Row-level failures never surface as errors at all: parsers convert them
//! into `fail_pop` counter increments at the row boundary.

/// Fatal errors that abort the run.
#[derive(thiserror::Error, Debug)]
pub enum RecorderError {
    /// The configured import root does not exist; no partial walk is attempted.
    #[error("missing import directory: {0}")]
    MissingImportRoot(String),

    /// A delivered path lacks the `ASCII/` marker segment. Every legitimate
    /// delivery contains it, so this is a configuration or delivery error.
    #[error("delivered path lacks the ASCII marker segment: {0}")]
    UnmarkedPath(String),

    /// Database error outside any per-file scope.
    #[error(transparent)]
    Db(#[from] diesel::result::Error),
}

/// File-level failures: abort one staged file, the run continues.
#[derive(thiserror::Error, Debug)]
pub enum FileFailure {
    /// The file's path prefix matched no known exchange; discovery stages such
    /// files for triage but no parser accepts them.
    #[error("unknown exchange classification for {0}")]
    UnknownExchange(String),

    /// The classified exchange has no row yet; every instrument must belong
    /// to a known exchange, so the whole file is rejected.
    #[error("exchange {tag} not loaded yet, rejecting {file}")]
    ExchangeNotLoaded {
        /// Exchange tag from the path prefix table.
        tag: String,
        /// Normalized name of the rejected file.
        file: String,
    },

    /// The file disappeared or became unreadable between discovery and parse.
    #[error("unreadable file {path}: {source}")]
    Unreadable {
        /// Normalized name of the file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The document container itself could not be parsed (e.g., broken XML).
    #[error("malformed document {path}: {detail}")]
    MalformedDocument {
        /// Normalized name of the file.
        path: String,
        /// Parser diagnostic.
        detail: String,
    },

    /// Database error while loading the file.
    #[error(transparent)]
    Db(#[from] diesel::result::Error),
}
