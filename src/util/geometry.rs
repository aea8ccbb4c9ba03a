// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides utilities for coordinate transformations between
//! screen coordinates and normalized coordinates, plus the scale-about-origin
//! transform used when a clip zooms into its annotation.

use crate::models::annotation::Point;

/// Scale factor applied to the video while a clip is zoomed in.
pub const ZOOM_SCALE: f32 = 2.0;

/// Zoom applied to the container holding both video and overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomConfig {
    pub active: bool,
    /// Normalized transform origin.
    pub origin: Point,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self::inactive()
    }
}

impl ZoomConfig {
    /// Identity transform, centered origin.
    pub fn inactive() -> Self {
        Self {
            active: false,
            origin: Point::new(0.5, 0.5),
        }
    }

    /// Zoom toward the given normalized target.
    pub fn towards(origin: Point) -> Self {
        Self { active: true, origin }
    }

    pub fn scale(&self) -> f32 {
        if self.active {
            ZOOM_SCALE
        } else {
            1.0
        }
    }
}

/// Convert a pointer position to normalized coordinates relative to the
/// rendered element's bounding box.
///
/// The rect must already include any zoom transform, so that positions
/// stay valid while a clip is zoomed in.
pub fn normalize_position(pointer: egui::Pos2, rect: egui::Rect) -> Point {
    Point {
        x: ((pointer.x - rect.min.x) / rect.width()) as f64,
        y: ((pointer.y - rect.min.y) / rect.height()) as f64,
    }
}

/// Convert normalized coordinates back to pixel space.
pub fn denormalize_position(point: &Point, width: f32, height: f32) -> (f32, f32) {
    (point.x as f32 * width, point.y as f32 * height)
}

/// Map a normalized point to a screen position inside `rect`.
pub fn to_screen(point: &Point, rect: egui::Rect) -> egui::Pos2 {
    let (x, y) = denormalize_position(point, rect.width(), rect.height());
    rect.min + egui::vec2(x, y)
}

/// Apply the zoom transform to a rect: scale about the normalized origin,
/// which stays fixed on screen.
pub fn zoomed_rect(rect: egui::Rect, zoom: &ZoomConfig) -> egui::Rect {
    let scale = zoom.scale();
    let origin = to_screen(&zoom.origin, rect);
    egui::Rect::from_min_max(
        origin + (rect.min - origin) * scale,
        origin + (rect.max - origin) * scale,
    )
}

/// Fit a frame of the given aspect ratio inside `available`, centered.
pub fn fit_rect(available: egui::Rect, frame_width: u32, frame_height: u32) -> egui::Rect {
    if frame_width == 0 || frame_height == 0 {
        return available;
    }
    let frame_aspect = frame_width as f32 / frame_height as f32;
    let available_aspect = available.width() / available.height();

    let size = if frame_aspect > available_aspect {
        // Frame is wider - fit to width
        egui::vec2(available.width(), available.width() / frame_aspect)
    } else {
        // Frame is taller - fit to height
        egui::vec2(available.height() * frame_aspect, available.height())
    };

    egui::Rect::from_center_size(available.center(), size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn screen_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(100.0, 50.0), egui::vec2(1920.0, 1080.0))
    }

    #[test]
    fn test_normalize_denormalize_roundtrip() {
        let rect = screen_rect();
        let pointer = egui::pos2(1060.0, 590.0);

        let normalized = normalize_position(pointer, rect);
        assert!((normalized.x - 0.5).abs() < 0.0001);
        assert!((normalized.y - 0.5).abs() < 0.0001);

        let (x, y) = denormalize_position(&normalized, rect.width(), rect.height());
        assert!((x + rect.min.x - pointer.x).abs() < 0.01);
        assert!((y + rect.min.y - pointer.y).abs() < 0.01);
    }

    #[test]
    fn test_normalize_corners() {
        let rect = screen_rect();

        let tl = normalize_position(rect.min, rect);
        assert_eq!(tl.x, 0.0);
        assert_eq!(tl.y, 0.0);

        let br = normalize_position(rect.max, rect);
        assert_eq!(br.x, 1.0);
        assert_eq!(br.y, 1.0);
    }

    #[test]
    fn test_inactive_zoom_is_identity() {
        let rect = screen_rect();
        assert_eq!(zoomed_rect(rect, &ZoomConfig::inactive()), rect);
    }

    #[test]
    fn test_zoom_keeps_origin_fixed() {
        let rect = screen_rect();
        let zoom = ZoomConfig::towards(Point::new(0.25, 0.75));
        let zoomed = zoomed_rect(rect, &zoom);

        assert!((zoomed.width() - rect.width() * ZOOM_SCALE).abs() < 0.01);
        let before = to_screen(&zoom.origin, rect);
        let after = to_screen(&zoom.origin, zoomed);
        assert!((before - after).length() < 0.01);

        // A point placed on the zoomed frame maps back to the same fraction.
        let p = normalize_position(after, zoomed);
        assert!((p.x - 0.25).abs() < 0.0001);
        assert!((p.y - 0.75).abs() < 0.0001);
    }

    #[test]
    fn test_fit_rect_letterboxes_wide_frame() {
        let available = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(800.0, 800.0));
        let fitted = fit_rect(available, 1920, 1080);
        assert_eq!(fitted.width(), 800.0);
        assert!((fitted.height() - 450.0).abs() < 0.01);
        assert_eq!(fitted.center(), available.center());
    }

    proptest! {
        #[test]
        fn normalize_roundtrips_any_pointer(
            px in 0.0f32..2000.0,
            py in 0.0f32..2000.0,
            w in 1.0f32..4000.0,
            h in 1.0f32..4000.0,
        ) {
            let rect = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(w, h));
            let normalized = normalize_position(egui::pos2(px, py), rect);
            let (x, y) = denormalize_position(&normalized, w, h);
            prop_assert!((x - px).abs() < 0.01 * px.max(1.0));
            prop_assert!((y - py).abs() < 0.01 * py.max(1.0));
        }
    }
}
