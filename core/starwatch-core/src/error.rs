//! Error types for the extraction pipeline.
//!
//! A simulation that is not running is an expected condition and is modelled
//! as `Option::None` by the locator, not as an error variant here.

use std::path::PathBuf;

/// All errors that can occur while resolving and parsing simulation output.
///
/// Every variant is local to a single history file or run directory; callers
/// keep assembling the rest of the snapshot when one of these comes back.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// No candidate path for the star-1 history file exists under the run
    /// directory. The layout cannot be used at all without it.
    #[error("no star history file found under {0}")]
    LayoutUnresolved(PathBuf),

    /// A required history file could not be opened or read.
    #[error("history file unavailable: {path}: {source}")]
    FileUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A recognized column or header carried a value that failed type
    /// conversion. Unrecognized columns never produce this.
    #[error("malformed {column} value {value:?} in {path}")]
    MalformedField {
        path: PathBuf,
        column: String,
        value: String,
    },

    /// The file ended before the fixed header block was complete. The row
    /// positions are an external contract; a deviation is an error, never
    /// guessed around.
    #[error("history file {0} is truncated before the column-name row")]
    TruncatedHistory(PathBuf),
}

/// Convenience type alias for Results using WatchError.
pub type Result<T> = std::result::Result<T, WatchError>;
