//! Content loading errors

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a [`ContentIndex`](super::ContentIndex)
#[derive(Debug, Error)]
pub enum ContentError {
    /// The content directory, or a file inside it, could not be opened or read
    #[error("content source unavailable: {}: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A data file is not valid UTF-8 or does not parse as JSON
    #[error("malformed content in {file}: {reason}")]
    MalformedContent { file: String, reason: String },
}

impl ContentError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(file: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedContent {
            file: file.into(),
            reason: reason.to_string(),
        }
    }

    /// File name of the offending document, if the error is tied to one
    pub fn file(&self) -> Option<&str> {
        match self {
            Self::MalformedContent { file, .. } => Some(file),
            Self::SourceUnavailable { .. } => None,
        }
    }
}
