// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video timeline scrubber control.
//!
//! This module provides the timeline scrubber for navigating through the
//! video and selecting the moment to annotate.

use crate::util::time::format_time;

/// Display the scrubber. Returns the requested seek position, if any.
pub fn show(ui: &mut egui::Ui, current_time: f64, duration: f64, marks: &[f64]) -> Option<f64> {
    let mut seek = None;

    ui.horizontal(|ui| {
        ui.monospace(format_time(current_time));

        if duration.is_finite() && duration > 0.0 {
            let mut position = current_time.clamp(0.0, duration);
            let width = (ui.available_width() - 90.0).max(100.0);
            ui.spacing_mut().slider_width = width;
            let response = ui.add(
                egui::Slider::new(&mut position, 0.0..=duration)
                    .show_value(false)
                    .trailing_fill(true),
            );

            // Ticks for annotated moments
            let rect = response.rect;
            let painter = ui.painter();
            for &mark in marks {
                let x = rect.left() + (mark / duration).clamp(0.0, 1.0) as f32 * rect.width();
                painter.line_segment(
                    [egui::pos2(x, rect.top()), egui::pos2(x, rect.top() + 4.0)],
                    egui::Stroke::new(2.0, egui::Color32::from_rgb(0xef, 0x44, 0x44)),
                );
            }

            if response.changed() {
                seek = Some(position);
            }
            ui.monospace(format_time(duration));
        } else {
            ui.label(egui::RichText::new("duration unknown").weak());
        }
    });

    seek
}
