// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Modal dialogs: marker label prompt, notices and confirmation.

use crate::models::annotation::Point;

/// A marker placement waiting for its label.
pub struct LabelPrompt {
    pub position: Point,
    pub time: f64,
    pub text: String,
    focused: bool,
}

impl LabelPrompt {
    pub fn new(position: Point, time: f64) -> Self {
        Self {
            position,
            time,
            text: String::new(),
            focused: false,
        }
    }
}

pub enum PromptOutcome {
    Pending,
    Accepted,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message the user has to acknowledge.
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

fn modal(title: &str) -> egui::Window<'_> {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
}

/// Ask for a marker label. Enter accepts, Escape cancels.
pub fn show_label_prompt(ctx: &egui::Context, prompt: &mut LabelPrompt) -> PromptOutcome {
    let mut outcome = PromptOutcome::Pending;

    modal("Name this point").show(ctx, |ui| {
        ui.label(format!(
            "Label for the moment at {}",
            crate::util::time::format_time(prompt.time)
        ));
        let response = ui.text_edit_singleline(&mut prompt.text);
        if !prompt.focused {
            response.request_focus();
            prompt.focused = true;
        }

        let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        ui.horizontal(|ui| {
            if ui.button("OK").clicked() || enter {
                outcome = PromptOutcome::Accepted;
            }
            if ui.button("Cancel").clicked() {
                outcome = PromptOutcome::Cancelled;
            }
        });
    });

    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        outcome = PromptOutcome::Cancelled;
    }
    outcome
}

/// Show a notice. Returns `true` once dismissed.
pub fn show_notice(ctx: &egui::Context, notice: &Notice) -> bool {
    let mut dismissed = false;
    let (title, color) = match notice.level {
        NoticeLevel::Info => ("BioMotion", egui::Color32::from_gray(220)),
        NoticeLevel::Warning => ("Warning", egui::Color32::from_rgb(0xf5, 0x9e, 0x0b)),
        NoticeLevel::Error => ("Error", egui::Color32::from_rgb(0xef, 0x44, 0x44)),
    };

    modal(title).show(ctx, |ui| {
        ui.label(egui::RichText::new(&notice.message).color(color));
        ui.add_space(8.0);
        if ui.button("OK").clicked() {
            dismissed = true;
        }
    });
    dismissed
}

/// Yes/no confirmation. `Some(answer)` once the user picks one.
pub fn show_confirm(ctx: &egui::Context, title: &str, message: &str) -> Option<bool> {
    let mut answer = None;
    modal(title).show(ctx, |ui| {
        ui.label(message);
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("Yes").clicked() {
                answer = Some(true);
            }
            if ui.button("No").clicked() {
                answer = Some(false);
            }
        });
    });
    answer
}
