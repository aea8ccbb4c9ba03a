// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Wall-clock playback position.
//!
//! The clock advances by elapsed time times the playback rate on every
//! `tick`. Ticks are driven by the repaint loop, so the caller passes the
//! current `Instant` in.

use std::time::Instant;

/// Transport state of the loaded video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Stopped,
    Playing,
    Paused,
}

#[derive(Debug, Clone)]
pub struct PlaybackClock {
    state: TransportState,
    position: f64,
    /// Total length in seconds, `None` when unknown.
    duration: Option<f64>,
    rate: f32,
    muted: bool,
    last_tick: Option<Instant>,
}

impl PlaybackClock {
    pub fn new(duration: Option<f64>) -> Self {
        Self {
            state: TransportState::Stopped,
            position: 0.0,
            duration: duration.filter(|d| d.is_finite() && *d > 0.0),
            rate: 1.0,
            muted: false,
            last_tick: None,
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn play(&mut self) {
        if let Some(duration) = self.duration {
            // Playing from the very end restarts, like a media element does.
            if self.position >= duration {
                self.position = 0.0;
            }
        }
        self.state = TransportState::Playing;
        self.last_tick = None;
    }

    pub fn pause(&mut self) {
        if self.state == TransportState::Playing {
            self.state = TransportState::Paused;
        }
        self.last_tick = None;
    }

    pub fn seek(&mut self, time: f64) {
        let time = if time.is_finite() { time.max(0.0) } else { 0.0 };
        self.position = match self.duration {
            Some(duration) => time.min(duration),
            None => time,
        };
    }

    pub fn set_rate(&mut self, rate: f32) {
        if rate.is_finite() && rate > 0.0 {
            self.rate = rate;
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Advance the position. Returns `true` if the position changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.state != TransportState::Playing {
            return false;
        }

        let Some(previous) = self.last_tick.replace(now) else {
            return false;
        };

        let elapsed = now.saturating_duration_since(previous).as_secs_f64();
        self.position += elapsed * self.rate as f64;

        if let Some(duration) = self.duration {
            if self.position >= duration {
                self.position = duration;
                self.state = TransportState::Paused;
                self.last_tick = None;
                log::debug!("Playback reached end at {:.2}s", duration);
            }
        }

        elapsed > 0.0
    }
}
