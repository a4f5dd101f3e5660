use thiserror::Error;

/// Errors surfaced by gscp. Validation, auth and listing errors abort the
/// run; `Download` is per-object and only affects that task's outcome.
#[derive(Error, Debug)]
pub enum GscpError {
    /// The source argument is not a valid `scheme://bucket[/prefix]` URL
    #[error("invalid source url: {0}")]
    InvalidSourceUrl(String),

    /// The destination exists but is not a usable directory
    #[error("invalid destination: {0}")]
    InvalidDestination(String),

    /// A ListObjectsV2 call failed
    #[error("listing failed: {0}")]
    Listing(String),

    /// A GetObject call or local write failed for a single object
    #[error("download failed for '{key}': {message}")]
    Download { key: String, message: String },

    /// Credentials could not be resolved before the run started
    #[error("authentication failed: {0}")]
    Auth(String),
}
