// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Clip replay loop.
//!
//! At most one clip is active. While active, playback is muted, slowed to
//! the clip speed, zoomed onto the clip target and looped over the clip's
//! time range until stopped.

use super::Transport;
use crate::models::annotation::Point;
use crate::models::clip::{Clip, CLIP_SPEED};
use crate::util::geometry::ZoomConfig;
use std::time::{Duration, Instant};

/// Wait after seeking to the clip start before resuming playback.
pub const SEEK_SETTLE_DELAY: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
struct ActiveClip {
    id: String,
    start_time: f64,
    end_time: f64,
    zoom: Point,
    /// Deadline of the delayed `play()` after the initial seek.
    resume_at: Option<Instant>,
}

#[derive(Debug, Default)]
pub struct ClipLoop {
    active: Option<ActiveClip>,
}

impl ClipLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.id.as_str())
    }

    /// Start looping `clip`, stopping any clip already active.
    pub fn play(&mut self, clip: &Clip, transport: &mut dyn Transport, now: Instant) {
        self.stop(transport);

        log::info!(
            "Playing clip '{}' ({:.2}s - {:.2}s)",
            clip.name,
            clip.start_time,
            clip.end_time
        );

        transport.pause();
        transport.set_muted(true);
        transport.seek(clip.start_time);

        self.active = Some(ActiveClip {
            id: clip.id.clone(),
            start_time: clip.start_time,
            end_time: clip.end_time,
            zoom: Point::new(clip.zoom_x, clip.zoom_y),
            resume_at: Some(now + SEEK_SETTLE_DELAY),
        });
    }

    /// Stop the active clip. Returns `true` if one was active, in which case
    /// the caller resets its nominal speed to 1.0.
    pub fn stop(&mut self, transport: &mut dyn Transport) -> bool {
        let Some(active) = self.active.take() else {
            return false;
        };

        log::info!("Stopped clip {}", active.id);
        transport.pause();
        transport.set_muted(false);
        true
    }

    /// Drive the loop from the repaint tick.
    pub fn update(&mut self, transport: &mut dyn Transport, now: Instant) {
        let Some(active) = self.active.as_mut() else {
            return;
        };

        if let Some(deadline) = active.resume_at {
            if now >= deadline {
                active.resume_at = None;
                transport.play();
            }
            return;
        }

        // The video may end before the clip does; playback stops there.
        // An unknown (NaN) duration leaves the clip end as is.
        let end = active.end_time.min(transport.duration());
        if transport.current_time() >= end {
            transport.pause();
            transport.seek(active.start_time);
            transport.play();
        }
    }

    /// Playback rate the surface should use.
    pub fn effective_rate(&self, nominal: f32) -> f32 {
        if self.is_active() {
            CLIP_SPEED
        } else {
            nominal
        }
    }

    /// Zoom the surface should apply.
    pub fn zoom(&self) -> ZoomConfig {
        match &self.active {
            Some(active) => ZoomConfig::towards(active.zoom),
            None => ZoomConfig::inactive(),
        }
    }
}
