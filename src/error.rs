//! Error types for calibration and runtime input reads.

use std::path::PathBuf;

/// Errors that can occur while reading correction inputs.
///
/// None of these reach the caller of [`AlsCorrector::correct`](crate::AlsCorrector::correct):
/// every read falls back to its default and the error is only logged.
#[derive(Debug, thiserror::Error)]
pub enum CorrectionError {
    /// A calibration or backlight file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// The file that was read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A file was read but does not start with an integer.
    #[error("No integer in {}: {content:?}", path.display())]
    Parse {
        /// The file that was read.
        path: PathBuf,
        /// The offending content, trimmed.
        content: String,
    },

    /// A value was read but is outside the range the algorithm accepts.
    #[error("Invalid value {value} for {name}")]
    InvalidValue {
        /// The field or property name.
        name: &'static str,
        /// The rejected value.
        value: i64,
    },

    /// Delivering the refresh signal to the color process failed.
    #[error("Failed to signal pid {pid}: {source}")]
    Signal {
        /// The target process id.
        pid: i32,
        /// The OS error reported by `kill`.
        #[source]
        source: std::io::Error,
    },
}
