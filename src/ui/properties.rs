// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Analysis sidebar.
//!
//! This module provides the side panel listing replay clips and markers,
//! the notes editor and the save action.

use crate::models::session::Session;
use crate::util::color::to_color32;
use crate::util::time::format_time;

/// Result of sidebar interaction.
pub enum SidebarAction {
    None,
    PlayClip(String),
    StopClip,
    DeleteClip(String),
    SeekTo(f64),
    DeleteAnnotation(String),
    NotesChanged(String),
    Save,
}

/// Display the sidebar. Nothing is mutated here; edits come back as actions.
pub fn show(
    ui: &mut egui::Ui,
    session: &Session,
    active_clip: Option<&str>,
    has_video: bool,
    busy: bool,
) -> SidebarAction {
    let mut action = SidebarAction::None;

    ui.heading("Analysis");
    ui.add_space(4.0);

    let button_size = egui::vec2(ui.available_width(), 28.0);
    if ui
        .add_enabled(has_video && !busy, egui::Button::new("💾 Save analysis").min_size(button_size))
        .on_disabled_hover_text("Load a video first")
        .clicked()
    {
        action = SidebarAction::Save;
    }

    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, true])
        .max_height(list_height(ui.available_height()))
        .show(ui, |ui| {
            egui::CollapsingHeader::new(format!("Clips ({})", session.clips.len()))
                .default_open(true)
                .show(ui, |ui| {
                    if session.clips.is_empty() {
                        ui.label(egui::RichText::new("Mark a point to create a clip").weak());
                    }
                    for clip in &session.clips {
                        let is_active = active_clip == Some(clip.id.as_str());
                        ui.horizontal(|ui| {
                            if is_active {
                                if ui.button("⏹").on_hover_text("Stop clip").clicked() {
                                    action = SidebarAction::StopClip;
                                }
                            } else if ui
                                .add_enabled(has_video, egui::Button::new("▶"))
                                .on_hover_text("Loop clip at half speed")
                                .clicked()
                            {
                                action = SidebarAction::PlayClip(clip.id.clone());
                            }

                            let name = egui::RichText::new(&clip.name);
                            ui.label(if is_active { name.strong() } else { name });
                            ui.label(
                                egui::RichText::new(format!(
                                    "{} · {:.2}s",
                                    format_time(clip.start_time),
                                    clip.duration
                                ))
                                .weak()
                                .small(),
                            );

                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if ui.small_button("🗑").on_hover_text("Delete clip").clicked() {
                                    action = SidebarAction::DeleteClip(clip.id.clone());
                                }
                            });
                        });
                    }
                });

            egui::CollapsingHeader::new(format!("Points ({})", session.annotations.len()))
                .default_open(true)
                .show(ui, |ui| {
                    if session.annotations.is_empty() {
                        ui.label(egui::RichText::new("No points yet").weak());
                    }
                    for annotation in &session.annotations {
                        ui.horizontal(|ui| {
                            ui.label(
                                egui::RichText::new("●").color(to_color32(&annotation.color)),
                            );
                            if ui
                                .link(format_time(annotation.time))
                                .on_hover_text("Jump to this moment")
                                .clicked()
                            {
                                action = SidebarAction::SeekTo(annotation.time);
                            }
                            ui.label(&annotation.text);

                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if ui.small_button("🗑").on_hover_text("Delete point").clicked() {
                                    action = SidebarAction::DeleteAnnotation(annotation.id.clone());
                                }
                            });
                        });
                    }
                });
        });

    ui.separator();
    ui.label("Notes");
    let mut notes = session.notes.clone();
    let response = ui.add(
        egui::TextEdit::multiline(&mut notes)
            .hint_text("Observations, cues, follow-ups…")
            .desired_rows(6)
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        action = SidebarAction::NotesChanged(notes);
    }

    action
}

/// Room left for the scrolling lists once notes and the save button are laid out.
fn list_height(available: f32) -> f32 {
    (available - 180.0).max(0.0)
}
