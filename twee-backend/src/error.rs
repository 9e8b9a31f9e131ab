//! Error type shared across the story backend.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoryError {
    #[error("failed to read {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to list {}: {}", .path.display(), .source)]
    List {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to watch {}: {}", .path.display(), .source)]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("failed to encode passage metadata: {0}")]
    MetaEncode(#[from] serde_json::Error),

    /// The recorded title line no longer occurs in the file, so there is
    /// nothing safe to replace. The file was edited outside the editor.
    #[error("title line of passage {:?} no longer present in {}", .title, .path.display())]
    StaleAnchor { title: String, path: PathBuf },
}
