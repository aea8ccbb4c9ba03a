// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for analysis archives.

/// Failure while building or reading an analysis archive.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("Please load a video before saving")]
    NoVideoLoaded,

    #[error("Archive has no {0} entry")]
    MissingMetadata(&'static str),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Invalid analysis data: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type ArchiveResult<T> = Result<T, ArchiveError>;
