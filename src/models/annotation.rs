// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines the timestamped records placed on a video: labeled
//! points and freehand strokes. All positions are normalized to the
//! displayed frame so they are independent of the video resolution.

use serde::{Deserialize, Serialize};

/// Seconds either side of an item's timestamp during which it is drawn.
pub const VISIBILITY_WINDOW: f64 = 0.5;

/// A 2D point with normalized coordinates (0.0 to 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One sample of a freehand stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
    /// Marks the first sample of a pen-down run.
    #[serde(default)]
    pub is_start: bool,
}

impl PathPoint {
    pub fn new(point: Point, is_start: bool) -> Self {
        Self {
            x: point.x,
            y: point.y,
            is_start,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A freehand stroke anchored to the video position it was drawn at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub id: String,
    pub time: f64,
    pub color: String,
    pub size: f32,
    pub path: Vec<PathPoint>,
}

/// Split a stroke path into connected runs; a sample flagged `is_start`
/// begins a new run.
pub fn path_segments(path: &[PathPoint]) -> Vec<&[PathPoint]> {
    let mut segments = Vec::new();
    let mut start = 0;
    for (i, point) in path.iter().enumerate() {
        if point.is_start && i > start {
            segments.push(&path[start..i]);
            start = i;
        }
    }
    if start < path.len() {
        segments.push(&path[start..]);
    }
    segments
}

/// A labeled point anchored to a video timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub time: f64,
    pub text: String,
    pub color: String,
}

impl Annotation {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Whether something stamped at `time` is shown at playback position `current`.
pub fn visible_at(time: f64, current: f64) -> bool {
    (time - current).abs() <= VISIBILITY_WINDOW
}
