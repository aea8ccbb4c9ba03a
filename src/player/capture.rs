// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pen-mode stroke capture.

use crate::models::annotation::{Drawing, PathPoint, Point};
use crate::util::time::generate_id;

/// In-progress freehand stroke. Private to the playback surface.
#[derive(Debug, Default)]
pub struct StrokeCapture {
    path: Option<Vec<PathPoint>>,
}

impl StrokeCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_drawing(&self) -> bool {
        self.path.is_some()
    }

    /// Samples recorded so far, for live preview.
    pub fn path(&self) -> &[PathPoint] {
        self.path.as_deref().unwrap_or(&[])
    }

    /// Pointer down: start a new stroke, discarding any unfinished one.
    pub fn begin(&mut self, point: Point) {
        self.path = Some(vec![PathPoint::new(point, true)]);
    }

    /// Pointer move while down.
    pub fn extend(&mut self, point: Point) {
        if let Some(path) = self.path.as_mut() {
            path.push(PathPoint::new(point, false));
        }
    }

    /// Pointer up or leave: close the stroke.
    ///
    /// A stroke with fewer than two samples is a misclick and yields nothing.
    pub fn finish(&mut self, time: f64, color: &str, size: f32) -> Option<Drawing> {
        let path = self.path.take()?;
        if path.len() < 2 {
            return None;
        }

        Some(Drawing {
            id: generate_id(),
            time,
            color: color.to_string(),
            size,
            path,
        })
    }

    pub fn cancel(&mut self) {
        self.path = None;
    }
}
