// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar and tool selection UI.
//!
//! This module provides the toolbar interface for selecting the marker or
//! pen tool, the colour and brush size, and the transport controls.

use crate::app::Tool;
use crate::config::AppConfig;
use crate::util::color::to_color32;

/// Editable toolbar state owned by the application.
pub struct ToolbarState<'a> {
    pub tool: &'a mut Tool,
    pub color: &'a mut String,
    pub brush_size: &'a mut f32,
    pub speed: &'a mut f32,
}

/// Read-only playback status shown in the toolbar.
pub struct TransportStatus {
    pub has_video: bool,
    pub playing: bool,
    pub muted: bool,
    pub clip_active: bool,
}

/// Transport requests raised by the toolbar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolbarAction {
    None,
    TogglePlay,
    ToggleMute,
    SpeedChanged(f32),
}

/// Display the toolbar with tool selection buttons.
pub fn show(
    ui: &mut egui::Ui,
    config: &AppConfig,
    state: ToolbarState<'_>,
    status: &TransportStatus,
) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        let play_label = if status.clip_active {
            "⏹ Stop clip"
        } else if status.playing {
            "⏸ Pause"
        } else {
            "▶ Play"
        };
        if ui
            .add_enabled(status.has_video, egui::Button::new(play_label))
            .clicked()
        {
            action = ToolbarAction::TogglePlay;
        }

        let mute_label = if status.muted { "🔇" } else { "🔊" };
        if ui
            .add_enabled(status.has_video, egui::Button::new(mute_label))
            .clicked()
        {
            action = ToolbarAction::ToggleMute;
        }

        // Speed is locked while a clip loops.
        ui.add_enabled_ui(!status.clip_active, |ui| {
            let before = *state.speed;
            egui::ComboBox::from_id_source("speed")
                .selected_text(format!("{}x", state.speed))
                .width(70.0)
                .show_ui(ui, |ui| {
                    for &speed in &config.speeds {
                        ui.selectable_value(state.speed, speed, format!("{}x", speed));
                    }
                });
            if *state.speed != before {
                action = ToolbarAction::SpeedChanged(*state.speed);
            }
        });

        ui.separator();

        ui.label("Tools:");
        if ui
            .selectable_label(*state.tool == Tool::Point, "📍 Point")
            .clicked()
        {
            *state.tool = Tool::Point;
        }
        if ui
            .selectable_label(*state.tool == Tool::Pen, "✏ Pen")
            .clicked()
        {
            *state.tool = Tool::Pen;
        }

        ui.separator();

        for hex in &config.palette {
            let selected = state.color == hex;
            let size = egui::vec2(18.0, 18.0);
            let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
            ui.painter().rect_filled(rect, 3.0, to_color32(hex));
            if selected {
                ui.painter()
                    .rect_stroke(rect.expand(2.0), 3.0, egui::Stroke::new(2.0, egui::Color32::WHITE));
            }
            if response.on_hover_text(hex.as_str()).clicked() {
                *state.color = hex.clone();
            }
        }

        if *state.tool == Tool::Pen {
            ui.separator();
            ui.label("Brush:");
            for &size in &config.brush_sizes {
                ui.selectable_value(state.brush_size, size, format!("{}", size));
            }
        }

        ui.separator();

        let tool_text = match state.tool {
            Tool::Point => "Click the video to mark a moment; a zoomed replay clip is created",
            Tool::Pen => "Drag on the video to sketch over the current frame",
        };
        ui.label(egui::RichText::new(tool_text).italics().weak());
    });

    action
}
