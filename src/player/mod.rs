// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Playback surface.
//!
//! The surface owns the loaded video, its playback clock and the decoded
//! frame texture. The application drives it only through the `Transport`
//! capability; pointer capture state stays private to the surface and the
//! canvas that renders it.

pub mod capture;
pub mod clip;
pub mod clock;

use crate::io::media::{self, FrameSource, LoadedVideo};
use capture::StrokeCapture;
use clock::PlaybackClock;
use std::time::Instant;

/// Imperative transport controls. Every method is a no-op without a video.
pub trait Transport {
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, time: f64);
    /// Total length in seconds; NaN when unknown.
    fn duration(&self) -> f64;
    fn current_time(&self) -> f64;
    fn set_muted(&mut self, muted: bool);
}

#[derive(Default)]
pub struct PlaybackSurface {
    video: Option<LoadedVideo>,
    clock: Option<PlaybackClock>,
    frames: Option<Box<dyn FrameSource>>,
    texture: Option<egui::TextureHandle>,
    frame_size: Option<(u32, u32)>,
    capture: StrokeCapture,
}

impl PlaybackSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a video, replacing the current one.
    pub fn load(&mut self, video: LoadedVideo) {
        let frames = match media::open_frame_source(&video) {
            Ok(frames) => frames,
            Err(e) => {
                log::warn!("No frames for {}: {}", video.file_name, e);
                None
            }
        };

        let duration = frames
            .as_ref()
            .and_then(|f| f.duration())
            .or(video.duration);

        log::info!("Loaded video {} (duration {:?})", video.file_name, duration);

        self.clock = Some(PlaybackClock::new(duration));
        self.frames = frames;
        self.texture = None;
        self.frame_size = None;
        self.capture.cancel();
        self.video = Some(video);
    }

    pub fn unload(&mut self) {
        *self = Self::default();
    }

    pub fn video(&self) -> Option<&LoadedVideo> {
        self.video.as_ref()
    }

    pub fn has_video(&self) -> bool {
        self.video.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.clock.as_ref().is_some_and(|c| c.is_playing())
    }

    pub fn is_muted(&self) -> bool {
        self.clock.as_ref().is_some_and(|c| c.is_muted())
    }

    pub fn set_rate(&mut self, rate: f32) {
        if let Some(clock) = self.clock.as_mut() {
            clock.set_rate(rate);
        }
    }

    pub fn texture(&self) -> Option<&egui::TextureHandle> {
        self.texture.as_ref()
    }

    pub fn frame_size(&self) -> Option<(u32, u32)> {
        self.frame_size
    }

    pub(crate) fn capture(&self) -> &StrokeCapture {
        &self.capture
    }

    pub(crate) fn capture_mut(&mut self) -> &mut StrokeCapture {
        &mut self.capture
    }

    /// Per-frame update: advance the clock and refresh the frame texture.
    pub fn update(&mut self, ctx: &egui::Context, now: Instant) {
        let Some(clock) = self.clock.as_mut() else {
            return;
        };
        clock.tick(now);
        let position = clock.position();

        let Some(frames) = self.frames.as_mut() else {
            return;
        };
        let Some(frame) = frames.frame_at(position) else {
            return;
        };

        let image = egui::ColorImage::from_rgba_unmultiplied(
            [frame.width as usize, frame.height as usize],
            &frame.pixels,
        );
        match self.texture.as_mut() {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(ctx.load_texture("video_frame", image, egui::TextureOptions::LINEAR));
            }
        }
        self.frame_size = Some((frame.width, frame.height));
    }
}

impl Transport for PlaybackSurface {
    fn play(&mut self) {
        if let Some(clock) = self.clock.as_mut() {
            clock.play();
        }
    }

    fn pause(&mut self) {
        if let Some(clock) = self.clock.as_mut() {
            clock.pause();
        }
    }

    fn seek(&mut self, time: f64) {
        if let Some(clock) = self.clock.as_mut() {
            clock.seek(time);
        }
    }

    fn duration(&self) -> f64 {
        self.clock
            .as_ref()
            .and_then(|c| c.duration())
            .unwrap_or(f64::NAN)
    }

    fn current_time(&self) -> f64 {
        self.clock.as_ref().map_or(0.0, |c| c.position())
    }

    fn set_muted(&mut self, muted: bool) {
        if let Some(clock) = self.clock.as_mut() {
            clock.set_muted(muted);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn video(duration: Option<f64>) -> LoadedVideo {
        LoadedVideo {
            file_name: "drill.mp4".to_string(),
            bytes: Arc::new(Vec::new()),
            path: PathBuf::from("drill.mp4"),
            duration,
            scratch: None,
        }
    }

    #[test]
    fn test_transport_noops_without_video() {
        let mut surface = PlaybackSurface::new();
        surface.play();
        surface.seek(4.0);
        surface.set_muted(true);

        assert!(!surface.is_playing());
        assert!(!surface.is_muted());
        assert_eq!(surface.current_time(), 0.0);
        assert!(surface.duration().is_nan());
    }

    #[cfg(not(feature = "video-opencv"))]
    #[test]
    fn test_transport_with_video() {
        let mut surface = PlaybackSurface::new();
        surface.load(video(Some(8.0)));

        assert_eq!(surface.duration(), 8.0);
        surface.seek(3.5);
        surface.set_muted(true);
        surface.play();
        assert!(surface.is_playing());
        assert!(surface.is_muted());
        assert_eq!(surface.current_time(), 3.5);

        surface.unload();
        assert!(!surface.has_video());
        assert_eq!(surface.current_time(), 0.0);
    }

    #[cfg(not(feature = "video-opencv"))]
    #[test]
    fn test_load_cancels_stroke() {
        let mut surface = PlaybackSurface::new();
        surface
            .capture_mut()
            .begin(crate::models::annotation::Point::new(0.1, 0.1));
        surface.load(video(None));
        assert!(!surface.capture().is_drawing());
        assert!(surface.duration().is_nan());
    }
}
