// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video canvas and annotation overlay.
//!
//! This module renders the current video frame, the strokes and markers
//! visible at the playback position, and turns pointer input into either a
//! marker placement or a freehand stroke depending on the active tool.

use crate::app::Tool;
use crate::models::annotation::{path_segments, Annotation, Drawing, PathPoint, Point};
use crate::models::session::Session;
use crate::player::{PlaybackSurface, Transport};
use crate::util::color::to_color32;
use crate::util::geometry::{fit_rect, normalize_position, to_screen, zoomed_rect, ZoomConfig};
use crate::util::time::format_time;

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    /// Point tool pressed on the frame.
    PlaceAnnotation { position: Point, time: f64 },
    /// Pen stroke completed.
    AddDrawing(Drawing),
}

/// Everything the canvas reads besides the surface itself.
pub struct CanvasView<'a> {
    pub session: &'a Session,
    pub tool: Tool,
    pub color: &'a str,
    pub brush_size: f32,
    pub zoom: ZoomConfig,
}

/// Frame shape assumed until a decoded frame says otherwise.
const PLACEHOLDER_FRAME: (u32, u32) = (16, 9);

/// Display the canvas and handle pointer interactions.
pub fn show(ui: &mut egui::Ui, surface: &mut PlaybackSurface, view: CanvasView<'_>) -> CanvasAction {
    let (container, response) =
        ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
    let painter = ui.painter_at(container);
    painter.rect_filled(container, 0.0, egui::Color32::from_gray(20));

    if !surface.has_video() {
        painter.text(
            container.center(),
            egui::Align2::CENTER_CENTER,
            "Open a video or a saved analysis to begin",
            egui::FontId::proportional(18.0),
            egui::Color32::from_gray(160),
        );
        return CanvasAction::None;
    }

    let (frame_w, frame_h) = surface.frame_size().unwrap_or(PLACEHOLDER_FRAME);
    let video_rect = zoomed_rect(fit_rect(container, frame_w, frame_h), &view.zoom);
    let scale = view.zoom.scale();
    let current_time = surface.current_time();

    // Frame
    match surface.texture() {
        Some(texture) => {
            painter.image(
                texture.id(),
                video_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
        None => {
            painter.rect_filled(video_rect, 0.0, egui::Color32::from_gray(45));
            painter.text(
                video_rect.center(),
                egui::Align2::CENTER_CENTER,
                format!("▶ {}", format_time(current_time)),
                egui::FontId::monospace(24.0 * scale),
                egui::Color32::from_gray(120),
            );
        }
    }

    // Stored strokes near the current time
    for drawing in view.session.drawings_visible_at(current_time) {
        draw_stroke(
            &painter,
            &drawing.path,
            video_rect,
            egui::Stroke::new(drawing.size * scale, to_color32(&drawing.color)),
        );
    }

    // Live stroke feedback
    if surface.capture().is_drawing() {
        draw_stroke(
            &painter,
            surface.capture().path(),
            video_rect,
            egui::Stroke::new(view.brush_size * scale, to_color32(view.color)),
        );
    }

    for annotation in view.session.annotations_visible_at(current_time) {
        draw_marker(&painter, annotation, video_rect);
    }

    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
    }

    handle_pointer(ui, &response, container, video_rect, surface, &view)
}

fn handle_pointer(
    ui: &egui::Ui,
    response: &egui::Response,
    container: egui::Rect,
    video_rect: egui::Rect,
    surface: &mut PlaybackSurface,
    view: &CanvasView<'_>,
) -> CanvasAction {
    let (pressed, down, released, pointer) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_down(),
            i.pointer.primary_released(),
            i.pointer.latest_pos(),
        )
    });

    // The frame may be zoomed past the container; only the visible part counts.
    let inside = pointer.filter(|p| container.contains(*p) && video_rect.contains(*p));
    let time = surface.current_time();

    match view.tool {
        Tool::Point => {
            if let (true, Some(pos)) = (pressed && response.hovered(), inside) {
                return CanvasAction::PlaceAnnotation {
                    position: normalize_position(pos, video_rect),
                    time,
                };
            }
        }
        Tool::Pen => {
            let capture = surface.capture_mut();

            if let (true, Some(pos)) = (pressed && response.hovered(), inside) {
                capture.begin(normalize_position(pos, video_rect));
                return CanvasAction::None;
            }

            if !capture.is_drawing() {
                return CanvasAction::None;
            }

            match inside {
                Some(pos) if down && !released => {
                    let point = normalize_position(pos, video_rect);
                    if capture.path().last().map(|p| p.point()) != Some(point) {
                        capture.extend(point);
                    }
                }
                // Released, or left the frame: close the stroke.
                _ => {
                    if let Some(drawing) = capture.finish(time, view.color, view.brush_size) {
                        return CanvasAction::AddDrawing(drawing);
                    }
                }
            }
        }
    }

    CanvasAction::None
}

/// Replay a stroke path as connected runs.
fn draw_stroke(painter: &egui::Painter, path: &[PathPoint], rect: egui::Rect, stroke: egui::Stroke) {
    for segment in path_segments(path) {
        let points: Vec<egui::Pos2> = segment
            .iter()
            .map(|sample| to_screen(&sample.point(), rect))
            .collect();
        if points.len() > 1 {
            painter.add(egui::Shape::line(points, stroke));
        }
    }
}

fn draw_marker(painter: &egui::Painter, annotation: &Annotation, rect: egui::Rect) {
    let color = to_color32(&annotation.color);
    let center = to_screen(&annotation.position(), rect);

    painter.circle_filled(center, 7.0, color);
    painter.circle_stroke(center, 7.0, egui::Stroke::new(2.0, egui::Color32::WHITE));

    let galley = painter.layout_no_wrap(
        annotation.text.clone(),
        egui::FontId::proportional(14.0),
        egui::Color32::WHITE,
    );
    let label_rect = egui::Rect::from_min_size(
        center + egui::vec2(12.0, -galley.size().y / 2.0 - 3.0),
        galley.size() + egui::vec2(8.0, 6.0),
    );
    painter.rect_filled(label_rect, 4.0, egui::Color32::from_black_alpha(180));
    painter.galley(label_rect.min + egui::vec2(4.0, 3.0), galley, egui::Color32::WHITE);
}
