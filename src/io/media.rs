// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media file loading.
//!
//! This module handles loading video files, probing their length, and
//! (with the `video-opencv` feature) decoding frames into RGBA pixels
//! suitable for display in egui.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// A video the session is annotating.
#[derive(Debug, Clone)]
pub struct LoadedVideo {
    /// Original file name, used as the archive entry name.
    pub file_name: String,
    /// Raw file contents, kept for archive export.
    pub bytes: Arc<Vec<u8>>,
    /// Location on disk the decoder reads from.
    pub path: PathBuf,
    /// Length in seconds if it could be determined.
    pub duration: Option<f64>,
    /// Temporary directory holding `path`, removed with the last clone.
    pub scratch: Option<Arc<TempDir>>,
}

/// A decoded RGBA frame.
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Source of frames for the playback surface.
pub trait FrameSource {
    /// Decode the frame shown at `time` seconds. `None` when unavailable.
    fn frame_at(&mut self, time: f64) -> Option<VideoFrame>;

    /// Length in seconds reported by the decoder.
    fn duration(&self) -> Option<f64>;
}

/// Load a video file from disk.
pub fn load_video(path: &Path) -> Result<LoadedVideo> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read video {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "video.mp4".to_string());

    let duration = probe_duration(&bytes);
    log::info!(
        "Read video {} ({} bytes, duration {:?})",
        file_name,
        bytes.len(),
        duration
    );

    Ok(LoadedVideo {
        file_name,
        bytes: Arc::new(bytes),
        path: path.to_path_buf(),
        duration,
        scratch: None,
    })
}

/// Wrap video bytes restored from an archive.
///
/// Only a frame decoder needs the video as a file; without one the bytes
/// stay in memory.
pub fn video_from_bytes(file_name: &str, bytes: Vec<u8>) -> Result<LoadedVideo> {
    materialize_video(file_name, bytes, cfg!(feature = "video-opencv"))
}

fn materialize_video(file_name: &str, bytes: Vec<u8>, write_to_disk: bool) -> Result<LoadedVideo> {
    let duration = probe_duration(&bytes);
    if !write_to_disk {
        return Ok(LoadedVideo {
            file_name: file_name.to_string(),
            bytes: Arc::new(bytes),
            path: PathBuf::from(file_name),
            duration,
            scratch: None,
        });
    }

    let scratch = tempfile::Builder::new()
        .prefix("biomotion-")
        .tempdir()
        .context("Failed to create a temporary folder for the video")?;

    // Entry names may carry directories; only the last component is used on disk.
    let disk_name = Path::new(file_name)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "video.mp4".to_string());
    let path = scratch.path().join(disk_name);
    std::fs::write(&path, &bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(LoadedVideo {
        file_name: file_name.to_string(),
        bytes: Arc::new(bytes),
        path,
        duration,
        scratch: Some(Arc::new(scratch)),
    })
}

/// Read the movie duration from an MP4/MOV `moov/mvhd` box.
pub fn probe_duration(bytes: &[u8]) -> Option<f64> {
    let moov = find_box(bytes, b"moov")?;
    let mvhd = find_box(moov, b"mvhd")?;

    let version = *mvhd.first()?;
    // version(1) + flags(3), then creation/modification times.
    let (timescale, duration) = if version == 1 {
        (read_u32(mvhd, 20)?, read_u64(mvhd, 24)?)
    } else {
        (read_u32(mvhd, 12)?, read_u32(mvhd, 16)? as u64)
    };

    if timescale == 0 || duration == 0 || duration == u64::MAX || duration == u32::MAX as u64 {
        return None;
    }
    Some(duration as f64 / timescale as f64)
}

/// Find the payload of the first box of type `kind` at this nesting level.
fn find_box<'a>(mut data: &'a [u8], kind: &[u8; 4]) -> Option<&'a [u8]> {
    while data.len() >= 8 {
        let size = read_u32(data, 0)? as u64;
        let (header, size) = match size {
            0 => (8, data.len() as u64),
            1 => (16, read_u64(data, 8)?),
            _ => (8, size),
        };
        if size < header || size > data.len() as u64 {
            return None;
        }

        let size = size as usize;
        if &data[4..8] == kind {
            return Some(&data[header as usize..size]);
        }
        data = &data[size..];
    }
    None
}

fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset + 4)?;
    Some(u32::from_be_bytes(bytes.try_into().ok()?))
}

fn read_u64(data: &[u8], offset: usize) -> Option<u64> {
    let bytes = data.get(offset..offset + 8)?;
    Some(u64::from_be_bytes(bytes.try_into().ok()?))
}

/// Open a frame decoder for the video, if one is compiled in.
#[cfg(feature = "video-opencv")]
pub fn open_frame_source(video: &LoadedVideo) -> Result<Option<Box<dyn FrameSource>>> {
    let source = opencv_source::OpenCvFrames::open(&video.path)?;
    Ok(Some(Box::new(source)))
}

/// Open a frame decoder for the video, if one is compiled in.
#[cfg(not(feature = "video-opencv"))]
pub fn open_frame_source(video: &LoadedVideo) -> Result<Option<Box<dyn FrameSource>>> {
    log::warn!(
        "Built without a video decoder; {} plays without frames",
        video.file_name
    );
    Ok(None)
}

#[cfg(feature = "video-opencv")]
mod opencv_source {
    use super::{FrameSource, VideoFrame};
    use anyhow::{bail, Result};
    use opencv::{core::Mat, imgproc, prelude::*, videoio};
    use std::path::Path;

    pub struct OpenCvFrames {
        capture: videoio::VideoCapture,
        fps: f64,
        frame_count: f64,
        last_index: Option<i64>,
    }

    impl OpenCvFrames {
        pub fn open(path: &Path) -> Result<Self> {
            let capture =
                videoio::VideoCapture::from_file(&path.to_string_lossy(), videoio::CAP_ANY)?;
            if !capture.is_opened()? {
                bail!("OpenCV could not open {}", path.display());
            }
            let fps = capture.get(videoio::CAP_PROP_FPS)?;
            let frame_count = capture.get(videoio::CAP_PROP_FRAME_COUNT)?;
            log::info!(
                "Opened decoder for {} ({:.2} fps, {} frames)",
                path.display(),
                fps,
                frame_count
            );
            Ok(Self {
                capture,
                fps: if fps > 0.0 { fps } else { 30.0 },
                frame_count,
                last_index: None,
            })
        }

        fn decode(&mut self, index: i64) -> Result<Option<VideoFrame>> {
            // Sequential reads are cheap; anything else needs a seek.
            if self.last_index.map(|last| last + 1) != Some(index) {
                self.capture
                    .set(videoio::CAP_PROP_POS_FRAMES, index as f64)?;
            }

            let mut frame = Mat::default();
            if !self.capture.read(&mut frame)? || frame.empty() {
                return Ok(None);
            }

            let mut rgba = Mat::default();
            imgproc::cvt_color(&frame, &mut rgba, imgproc::COLOR_BGR2RGBA, 0)?;
            let size = rgba.size()?;

            Ok(Some(VideoFrame {
                width: size.width as u32,
                height: size.height as u32,
                pixels: rgba.data_bytes()?.to_vec(),
            }))
        }
    }

    impl FrameSource for OpenCvFrames {
        fn frame_at(&mut self, time: f64) -> Option<VideoFrame> {
            let mut index = (time.max(0.0) * self.fps).floor() as i64;
            if self.frame_count > 0.0 {
                index = index.min(self.frame_count as i64 - 1);
            }
            if self.last_index == Some(index) {
                return None;
            }

            match self.decode(index) {
                Ok(frame) => {
                    self.last_index = Some(index);
                    frame
                }
                Err(e) => {
                    log::error!("Failed to decode frame {}: {}", index, e);
                    None
                }
            }
        }

        fn duration(&self) -> Option<f64> {
            (self.frame_count > 0.0).then(|| self.frame_count / self.fps)
        }
    }
}
