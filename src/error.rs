/*
 * Copyright (c) 2017, Alan Chen
 * See LICENCE file for BSD-2 terms
 */

//! Error types for sorting runs.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while sorting.
///
/// The first two variants are configuration errors and stop a run before it
/// starts. The rest belong to a single file and end up inside
/// [`CopyOutcome::Failed`](crate::actions::CopyOutcome::Failed).
#[derive(Debug, Error)]
pub enum SortError {
    /// A root directory could not be stat'd.
    #[error("Specified {role} directory not valid: {path}: {source}")]
    InvalidRoot {
        role: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Destination root exists but is not a directory.
    #[error("Destination is not a directory: {path}")]
    RootNotADirectory { path: PathBuf },

    /// A bucket path is taken by something that is not a directory.
    #[error("Bucket path exists but is not a directory: {path}")]
    BucketNotADirectory { path: PathBuf },

    #[error("Cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot open source file {path}: {source}")]
    OpenSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot create destination file {path}: {source}")]
    CreateDestination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Copy from {from} to {to} failed: {source}")]
    Stream {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Flushing or syncing the finished destination failed.
    #[error("Cannot finish writing {path}: {source}")]
    Finish {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SortError {
    /// True for errors that are detected before any file is touched.
    pub fn is_config(&self) -> bool
    {
        matches!(self, Self::InvalidRoot { .. } | Self::RootNotADirectory { .. })
    }
}
