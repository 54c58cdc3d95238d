//! Station metadata loading errors.

/// Errors that can occur when loading the station metadata table.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// Reading the metadata file failed
    #[error("failed to read station file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the metadata JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },
}
