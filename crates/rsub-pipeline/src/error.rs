//! Error types for the pipeline stages.

use std::path::PathBuf;

/// Which part of a fetch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorKind {
    /// Request could not be sent or no response arrived (DNS, connect, TLS).
    Fetch,
    /// Response arrived but its body could not be read.
    Read,
}

impl LoadErrorKind {
    fn describe(self) -> &'static str {
        match self {
            Self::Fetch => "failed to fetch",
            Self::Read => "failed to read response body from",
        }
    }
}

/// Loading stopped at `url`.
///
/// Documents fetched before the failure are kept in [`LoadError::partial`],
/// in source order.
#[derive(Debug, thiserror::Error)]
#[error("{} {url}", .kind.describe())]
pub struct LoadError {
    /// URL whose request failed.
    pub url: String,
    /// Failure category.
    pub kind: LoadErrorKind,
    /// Documents loaded before the failing URL.
    pub partial: Vec<String>,
    #[source]
    source: ureq::Error,
}

impl LoadError {
    pub(crate) fn new(
        url: impl Into<String>,
        kind: LoadErrorKind,
        partial: Vec<String>,
        source: ureq::Error,
    ) -> Self {
        Self {
            url: url.into(),
            kind,
            partial,
            source,
        }
    }

    /// Take the partially loaded documents, leaving an empty list behind.
    pub fn take_partial(&mut self) -> Vec<String> {
        std::mem::take(&mut self.partial)
    }
}

/// Error emitting documents.
#[derive(Debug, thiserror::Error)]
pub enum PrintError {
    /// Output file could not be created or truncated.
    #[error("failed to create output file {}", .path.display())]
    Create {
        /// Target path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing or flushing the output file failed.
    #[error("failed to write output file {}", .path.display())]
    Write {
        /// Target path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error from a full pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Print(#[from] PrintError),
}
