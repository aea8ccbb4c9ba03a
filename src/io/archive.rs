// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Analysis archives.
//!
//! An archive is a zip file with exactly two entries: the pretty-printed
//! `analysis_data.json` metadata and the original video stored under its
//! own file name. The metadata's `primaryVideoFileName` links the two.

use super::media::LoadedVideo;
use crate::error::{ArchiveError, ArchiveResult};
use crate::models::project::AnalysisData;
use chrono::NaiveDate;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Name of the metadata entry inside an archive.
pub const METADATA_ENTRY: &str = "analysis_data.json";

/// Result of reading an archive.
#[derive(Debug)]
pub struct ImportedAnalysis {
    pub data: AnalysisData,
    /// Referenced video entry: name and contents.
    pub video: Option<(String, Vec<u8>)>,
    /// Set when the metadata names a video the archive does not contain.
    pub missing_video: Option<String>,
}

/// `BioMotion_<YYYY-MM-DD>.zip`
pub fn archive_file_name(date: NaiveDate) -> String {
    format!("BioMotion_{}.zip", date.format("%Y-%m-%d"))
}

/// Archive file name for today's date.
pub fn default_archive_file_name() -> String {
    archive_file_name(chrono::Utc::now().date_naive())
}

/// Package metadata and the primary video into archive bytes.
pub fn build_archive(data: &AnalysisData, video: Option<&LoadedVideo>) -> ArchiveResult<Vec<u8>> {
    let video = video.ok_or(ArchiveError::NoVideoLoaded)?;
    let json = serde_json::to_string_pretty(data)?;

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    writer.start_file(
        METADATA_ENTRY,
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
    )?;
    writer.write_all(json.as_bytes())?;

    // Video payloads are already compressed.
    writer.start_file(
        video.file_name.as_str(),
        SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .large_file(video.bytes.len() as u64 >= u32::MAX as u64),
    )?;
    writer.write_all(&video.bytes)?;

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

/// Read metadata and the referenced video from archive bytes.
///
/// Any read or parse failure fails the whole import. A referenced video
/// entry that is absent is reported through `missing_video` instead.
pub fn read_archive(bytes: &[u8]) -> ArchiveResult<ImportedAnalysis> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let json = {
        let mut entry = match archive.by_name(METADATA_ENTRY) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => {
                return Err(ArchiveError::MissingMetadata(METADATA_ENTRY))
            }
            Err(e) => return Err(e.into()),
        };
        let mut json = String::new();
        entry.read_to_string(&mut json)?;
        json
    };
    let data: AnalysisData = serde_json::from_str(&json)?;

    let mut video = None;
    let mut missing_video = None;
    if let Some(name) = data.primary_video_file_name.clone() {
        match archive.by_name(&name) {
            Ok(mut entry) => {
                let mut contents = Vec::with_capacity(entry_capacity(entry.size(), bytes.len()));
                entry.read_to_end(&mut contents)?;
                video = Some((name, contents));
            }
            Err(ZipError::FileNotFound) => {
                log::warn!("Archive references video {} but does not contain it", name);
                missing_video = Some(name);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(ImportedAnalysis {
        data,
        video,
        missing_video,
    })
}

/// Buffer size for an entry. The declared size comes from the archive
/// itself and is only trusted up to the archive's own length.
fn entry_capacity(declared: u64, archive_len: usize) -> usize {
    declared.min(archive_len as u64) as usize
}

pub fn write_archive_file(path: &Path, bytes: &[u8]) -> ArchiveResult<()> {
    std::fs::write(path, bytes)?;
    Ok(())
}

pub fn read_archive_file(path: &Path) -> ArchiveResult<ImportedAnalysis> {
    let bytes = std::fs::read(path)?;
    read_archive(&bytes)
}
