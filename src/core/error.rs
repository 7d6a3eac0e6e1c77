//! Error types for checksum resolution and recipe patching.

use std::path::PathBuf;

use thiserror::Error;

/// A single failed HTTP fetch.
///
/// The resolver treats these as "this source failed, try the next one"; only
/// the last one is surfaced when every source comes up empty.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("GitHub API rate limit exceeded ({url}). Try again later.")]
    RateLimited { url: String },

    #[error("not found: {url}")]
    NotFound { url: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("HTTP GET failed for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("failed to read response from {url}: {message}")]
    Body { url: String, message: String },
}

impl FetchError {
    /// URL of the request that failed.
    pub fn url(&self) -> &str {
        match self {
            Self::RateLimited { url }
            | Self::NotFound { url }
            | Self::Status { url, .. }
            | Self::Transport { url, .. }
            | Self::Body { url, .. } => url,
        }
    }
}

/// Errors that abort a bump.
#[derive(Error, Debug)]
pub enum BumpError {
    #[error(
        "release reference should look like https://github.com/<owner>/<repo>/releases/tag/<tag>\n  got: {0}"
    )]
    InvalidReferenceFormat(String),

    #[error("checksum source failed")]
    SourceFetchFailure(#[from] FetchError),

    #[error("no checksum source found for {release}")]
    NoChecksumSourceFound { release: String },

    #[error("release payload from {url} has no {field}")]
    InvalidReleasePayload { url: String, field: &'static str },

    #[error("checksum for {filename} not found in release checksums")]
    ChecksumNotFound { filename: String },

    #[error("no sha256 line found after url for {filename} (line {line})")]
    MissingChecksumLine { filename: String, line: usize },

    #[error("cannot access recipe {}", path.display())]
    RecipeIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
