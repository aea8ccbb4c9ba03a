// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the application controller. It is the only owner of
//! the analysis session, the playback surface and the clip loop; the panels
//! in `ui` receive read-only views and report user intent back as actions.

use crate::config::AppConfig;
use crate::error::ArchiveError;
use crate::io::archive::{self, ImportedAnalysis};
use crate::io::media::{self, LoadedVideo};
use crate::io::serialization;
use crate::models::annotation::Point;
use crate::models::project::AnalysisData;
use crate::models::session::Session;
use crate::player::clip::ClipLoop;
use crate::player::{PlaybackSurface, Transport};
use crate::ui::dialogs::{self, LabelPrompt, Notice, PromptOutcome};
use crate::ui::{canvas, properties, timeline, toolbar};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::time::Instant;

/// Current drawing tool selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Point,
    Pen,
}

/// Analysis restored from an archive, with its video ready to play.
struct RestoredAnalysis {
    data: AnalysisData,
    video: Option<LoadedVideo>,
    missing_video: Option<String>,
}

/// Result of a background operation.
enum WorkerResult {
    VideoLoaded(LoadedVideo),
    AnalysisLoaded(RestoredAnalysis),
    AnalysisSaved(PathBuf),
}

/// Main application state.
pub struct BioMotionApp {
    config: AppConfig,

    /// Notes, strokes, markers and clips for the current video
    session: Session,

    /// Video, playback clock and frame texture
    surface: PlaybackSurface,

    /// Active clip replay, if any
    clips: ClipLoop,

    current_tool: Tool,
    color: String,
    brush_size: f32,
    /// User-selected playback speed outside clip replay
    speed: f32,

    /// Marker placement waiting for a label
    prompt: Option<LabelPrompt>,

    /// Messages waiting to be acknowledged
    notices: VecDeque<Notice>,

    confirm_clear: bool,

    /// Receiver for background loading and saving
    worker: Option<Receiver<Result<WorkerResult, String>>>,

    /// Busy state message
    loading_message: Option<String>,
}

impl BioMotionApp {
    /// Create a new BioMotion application instance.
    pub fn new(config: AppConfig) -> Self {
        Self {
            color: config.default_color(),
            brush_size: config.default_brush_size,
            config,
            session: Session::new(),
            surface: PlaybackSurface::new(),
            clips: ClipLoop::new(),
            current_tool: Tool::Point,
            speed: 1.0,
            prompt: None,
            notices: VecDeque::new(),
            confirm_clear: false,
            worker: None,
            loading_message: None,
        }
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }

    fn modal_open(&self) -> bool {
        self.prompt.is_some() || !self.notices.is_empty() || self.confirm_clear
    }

    /// A load or save is still running; only one may be in flight.
    fn is_busy(&self) -> bool {
        self.worker.is_some() || self.loading_message.is_some()
    }

    /// Run `job` on a background thread and poll for its result each frame.
    fn spawn_worker<F>(&mut self, message: &str, job: F)
    where
        F: FnOnce() -> Result<WorkerResult, String> + Send + 'static,
    {
        let (sender, receiver) = channel();
        self.worker = Some(receiver);
        self.loading_message = Some(message.to_string());

        std::thread::spawn(move || {
            let _ = sender.send(job());
        });
    }

    /// Open a raw video. All session state is discarded once it loads.
    fn load_video_file(&mut self, path: PathBuf) {
        if self.is_busy() {
            log::warn!("Busy, ignoring video {}", path.display());
            return;
        }
        self.spawn_worker("Loading video...", move || {
            media::load_video(&path)
                .map(WorkerResult::VideoLoaded)
                .map_err(|e| format!("Failed to load video: {:#}", e))
        });
    }

    /// Open an analysis archive.
    fn load_analysis_file(&mut self, path: PathBuf) {
        if self.is_busy() {
            log::warn!("Busy, ignoring analysis {}", path.display());
            return;
        }
        self.spawn_worker("Loading analysis...", move || {
            let imported: ImportedAnalysis = archive::read_archive_file(&path)
                .map_err(|e| format!("Could not load analysis: {}", e))?;

            let video = match imported.video {
                Some((name, bytes)) => Some(
                    media::video_from_bytes(&name, bytes)
                        .map_err(|e| format!("Could not load analysis: {:#}", e))?,
                ),
                None => None,
            };

            log::info!(
                "Read analysis {} (version {}, {} points, {} clips)",
                path.display(),
                imported.data.version,
                imported.data.annotations.len(),
                imported.data.clips.len()
            );

            Ok(WorkerResult::AnalysisLoaded(RestoredAnalysis {
                data: imported.data,
                video,
                missing_video: imported.missing_video,
            }))
        });
    }

    /// Package the session and its video into an archive.
    fn save_analysis(&mut self) {
        if self.is_busy() {
            log::warn!("Busy, save request ignored");
            return;
        }
        let Some(video) = self.surface.video().cloned() else {
            self.notify(Notice::error(ArchiveError::NoVideoLoaded.to_string()));
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("BioMotion analysis", &["zip"])
            .set_file_name(archive::default_archive_file_name())
            .save_file()
        else {
            // Dismissed dialog is not an error
            return;
        };

        let data = self
            .session
            .to_analysis_data(Some(video.file_name.clone()));

        self.spawn_worker("Saving analysis...", move || {
            let bytes = archive::build_archive(&data, Some(&video))
                .map_err(|e| format!("Failed to save analysis: {}", e))?;
            archive::write_archive_file(&path, &bytes)
                .map_err(|e| format!("Failed to save analysis: {}", e))?;
            Ok(WorkerResult::AnalysisSaved(path))
        });
    }

    /// Export only the metadata as JSON or YAML.
    fn export_metadata(&mut self, path: PathBuf) {
        let name = self.surface.video().map(|v| v.file_name.clone());
        let data = self.session.to_analysis_data(name);
        match serialization::export_metadata(&data, &path) {
            Ok(()) => log::info!("Exported metadata to {}", path.display()),
            Err(e) => {
                log::error!("Failed to export metadata: {:#}", e);
                self.notify(Notice::error(format!("Failed to export metadata: {:#}", e)));
            }
        }
    }

    /// Replace the session with metadata from a JSON or YAML file.
    fn import_metadata(&mut self, path: PathBuf) {
        match serialization::import_metadata(&path) {
            Ok(data) => {
                self.stop_clip();
                self.session.replace(data);
                log::info!("Imported metadata from {}", path.display());
            }
            Err(e) => {
                log::error!("Failed to import metadata: {:#}", e);
                self.notify(Notice::error(format!("Failed to import metadata: {:#}", e)));
            }
        }
    }

    fn poll_worker(&mut self) {
        let Some(receiver) = self.worker.as_ref() else {
            return;
        };

        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err("Background task stopped unexpectedly".to_string()),
        };

        // Busy state ends on every outcome.
        self.worker = None;
        self.loading_message = None;

        match result {
            Ok(WorkerResult::VideoLoaded(video)) => self.install_video(video),
            Ok(WorkerResult::AnalysisLoaded(restored)) => self.apply_analysis(restored),
            Ok(WorkerResult::AnalysisSaved(path)) => {
                log::info!("Saved analysis to {}", path.display());
            }
            Err(message) => {
                log::error!("{}", message);
                self.notify(Notice::error(message));
            }
        }
    }

    fn install_video(&mut self, video: LoadedVideo) {
        self.stop_clip();
        self.prompt = None;
        self.surface.load(video);
        self.session.reset();
        log::info!("Session cleared for new video");
    }

    fn apply_analysis(&mut self, restored: RestoredAnalysis) {
        self.stop_clip();
        self.prompt = None;
        self.session.replace(restored.data);

        if let Some(video) = restored.video {
            self.surface.load(video);
        } else if let Some(name) = restored.missing_video {
            self.surface.unload();
            self.notify(Notice::warning(format!(
                "The video \"{}\" was not found in the archive. Please open the original video separately.",
                name
            )));
        }

        log::info!(
            "Restored analysis: {} points, {} drawings, {} clips",
            self.session.annotations.len(),
            self.session.drawings.len(),
            self.session.clips.len()
        );
    }

    fn stop_clip(&mut self) {
        if self.clips.stop(&mut self.surface) {
            self.speed = 1.0;
        }
    }

    fn play_clip(&mut self, id: &str) {
        let Some(clip) = self.session.find_clip(id) else {
            return;
        };
        let clip = clip.clone();
        self.clips.play(&clip, &mut self.surface, Instant::now());
    }

    fn toggle_play(&mut self) {
        if self.clips.is_active() {
            self.stop_clip();
        } else if self.surface.is_playing() {
            self.surface.pause();
        } else {
            self.surface.play();
        }
    }

    fn begin_annotation(&mut self, ctx: &egui::Context, position: Point, time: f64) {
        if ctx.screen_rect().width() < self.config.compact_width {
            self.surface.pause();
        }
        self.prompt = Some(LabelPrompt::new(position, time));
    }

    fn finish_annotation(&mut self, prompt: LabelPrompt) {
        let duration = self.surface.duration();
        match self
            .session
            .add_annotation(prompt.position, prompt.time, &prompt.text, &self.color, duration)
        {
            Some((annotation, clip)) => log::info!(
                "Added point '{}' at {:.2}s with clip {:.2}s - {:.2}s",
                annotation.text,
                annotation.time,
                clip.start_time,
                clip.end_time
            ),
            None => log::debug!("Empty label, point discarded"),
        }
    }

    fn show_menu(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    let idle = !self.is_busy();
                    if ui.add_enabled(idle, egui::Button::new("Open Video...")).clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Video", &["mp4", "mov", "m4v", "webm", "mkv", "avi"])
                            .pick_file()
                        {
                            self.load_video_file(path);
                        }
                        ui.close_menu();
                    }
                    if ui.add_enabled(idle, egui::Button::new("Open Analysis...")).clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("BioMotion analysis", &["zip"])
                            .pick_file()
                        {
                            self.load_analysis_file(path);
                        }
                        ui.close_menu();
                    }
                    if ui
                        .add_enabled(
                            idle && self.surface.has_video(),
                            egui::Button::new("Save Analysis..."),
                        )
                        .clicked()
                    {
                        ui.close_menu();
                        self.save_analysis();
                    }
                    ui.separator();
                    ui.menu_button("Metadata", |ui| {
                        if ui.button("Export as JSON...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("JSON", &["json"])
                                .set_file_name(archive::METADATA_ENTRY)
                                .save_file()
                            {
                                self.export_metadata(path);
                            }
                            ui.close_menu();
                        }
                        if ui.button("Export as YAML...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("YAML", &["yaml", "yml"])
                                .set_file_name("analysis_data.yaml")
                                .save_file()
                            {
                                self.export_metadata(path);
                            }
                            ui.close_menu();
                        }
                        if ui.button("Import...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("Metadata", &["json", "yaml", "yml"])
                                .pick_file()
                            {
                                self.import_metadata(path);
                            }
                            ui.close_menu();
                        }
                    });
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    if ui
                        .add_enabled(!self.session.is_empty(), egui::Button::new("Clear All"))
                        .clicked()
                    {
                        self.confirm_clear = true;
                        ui.close_menu();
                    }
                });

                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        self.notify(Notice::info(
                            "BioMotion - mark moments on a movement video, sketch over frames \
                             and replay each marked moment as a zoomed, half-speed clip.",
                        ));
                        ui.close_menu();
                    }
                });
            });
        });
    }

    fn show_dialogs(&mut self, ctx: &egui::Context) {
        if let Some(notice) = self.notices.front() {
            if dialogs::show_notice(ctx, notice) {
                self.notices.pop_front();
            }
            return;
        }

        if self.confirm_clear {
            if let Some(answer) =
                dialogs::show_confirm(ctx, "Clear all", "Delete every point, drawing and clip?")
            {
                self.confirm_clear = false;
                if answer {
                    self.stop_clip();
                    self.session.clear_all();
                    log::info!("Cleared all annotations");
                }
            }
            return;
        }

        if let Some(prompt) = self.prompt.as_mut() {
            match dialogs::show_label_prompt(ctx, prompt) {
                PromptOutcome::Pending => {}
                PromptOutcome::Cancelled => self.prompt = None,
                PromptOutcome::Accepted => {
                    if let Some(prompt) = self.prompt.take() {
                        self.finish_annotation(prompt);
                    }
                }
            }
        }
    }
}

impl eframe::App for BioMotionApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_worker();

        // Playback tick
        let now = Instant::now();
        self.surface.set_rate(self.clips.effective_rate(self.speed));
        self.surface.update(ctx, now);
        self.clips.update(&mut self.surface, now);

        // Keep rendering every frame while a video or a task is live
        if self.surface.has_video() || self.loading_message.is_some() {
            ctx.request_repaint();
        }

        self.show_menu(ctx);

        // Toolbar
        let status = toolbar::TransportStatus {
            has_video: self.surface.has_video(),
            playing: self.surface.is_playing(),
            muted: self.surface.is_muted(),
            clip_active: self.clips.is_active(),
        };
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                toolbar::show(
                    ui,
                    &self.config,
                    toolbar::ToolbarState {
                        tool: &mut self.current_tool,
                        color: &mut self.color,
                        brush_size: &mut self.brush_size,
                        speed: &mut self.speed,
                    },
                    &status,
                )
            })
            .inner;

        match toolbar_action {
            toolbar::ToolbarAction::TogglePlay => self.toggle_play(),
            toolbar::ToolbarAction::ToggleMute => {
                let muted = self.surface.is_muted();
                self.surface.set_muted(!muted);
            }
            toolbar::ToolbarAction::SpeedChanged(speed) => log::info!("Playback speed {}x", speed),
            toolbar::ToolbarAction::None => {}
        }

        // Timeline (bottom)
        if self.surface.has_video() {
            let marks: Vec<f64> = self.session.annotations.iter().map(|a| a.time).collect();
            let seek = egui::TopBottomPanel::bottom("timeline")
                .show(ctx, |ui| {
                    timeline::show(ui, self.surface.current_time(), self.surface.duration(), &marks)
                })
                .inner;
            if let Some(time) = seek {
                self.surface.seek(time);
            }
        }

        // Sidebar (right side)
        let sidebar_action = egui::SidePanel::right("properties")
            .default_width(280.0)
            .show(ctx, |ui| {
                properties::show(
                    ui,
                    &self.session,
                    self.clips.active_id(),
                    self.surface.has_video(),
                    self.is_busy(),
                )
            })
            .inner;

        match sidebar_action {
            properties::SidebarAction::PlayClip(id) => self.play_clip(&id),
            properties::SidebarAction::StopClip => self.stop_clip(),
            properties::SidebarAction::DeleteClip(id) => {
                if self.clips.active_id() == Some(id.as_str()) {
                    self.stop_clip();
                }
                self.session.delete_clip(&id);
            }
            properties::SidebarAction::SeekTo(time) => self.surface.seek(time),
            properties::SidebarAction::DeleteAnnotation(id) => {
                self.session.delete_annotation(&id);
            }
            properties::SidebarAction::NotesChanged(notes) => self.session.notes = notes,
            properties::SidebarAction::Save => self.save_analysis(),
            properties::SidebarAction::None => {}
        }

        // Main canvas (center)
        let modal_open = self.modal_open();
        let canvas_action = egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                if let Some(ref message) = self.loading_message {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.spinner();
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new(message)
                                    .size(16.0)
                                    .color(egui::Color32::from_gray(200)),
                            );
                        });
                    });
                    return canvas::CanvasAction::None;
                }

                canvas::show(
                    ui,
                    &mut self.surface,
                    canvas::CanvasView {
                        session: &self.session,
                        tool: self.current_tool,
                        color: &self.color,
                        brush_size: self.brush_size,
                        zoom: self.clips.zoom(),
                    },
                )
            })
            .inner;

        if !modal_open {
            match canvas_action {
                canvas::CanvasAction::PlaceAnnotation { position, time } => {
                    self.begin_annotation(ctx, position, time);
                }
                canvas::CanvasAction::AddDrawing(drawing) => {
                    log::info!(
                        "Added drawing with {} points at {:.2}s",
                        drawing.path.len(),
                        drawing.time
                    );
                    self.session.add_drawing(drawing);
                }
                canvas::CanvasAction::None => {}
            }
        }

        // Space toggles playback when no text field has focus
        if !modal_open
            && !ctx.wants_keyboard_input()
            && ctx.input(|i| i.key_pressed(egui::Key::Space))
        {
            self.toggle_play();
        }

        self.show_dialogs(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn video(name: &str) -> LoadedVideo {
        LoadedVideo {
            file_name: name.to_string(),
            bytes: Arc::new(vec![1, 2, 3]),
            path: PathBuf::from(name),
            duration: Some(30.0),
            scratch: None,
        }
    }

    fn app_with_points() -> BioMotionApp {
        let mut app = BioMotionApp::new(AppConfig::default());
        app.surface.load(video("first.mp4"));
        app.session.notes = "first take".to_string();
        let mut prompt = LabelPrompt::new(Point::new(0.5, 0.5), 4.0);
        prompt.text = "contact".to_string();
        app.finish_annotation(prompt);
        app
    }

    #[test]
    fn test_new_video_clears_session() {
        let mut app = app_with_points();
        assert_eq!(app.session.annotations.len(), 1);
        assert_eq!(app.session.clips.len(), 1);

        app.install_video(video("second.mp4"));
        assert!(app.session.is_empty());
        assert!(app.session.notes.is_empty());
        assert_eq!(app.surface.video().unwrap().file_name, "second.mp4");
    }

    #[test]
    fn test_empty_label_creates_nothing() {
        let mut app = BioMotionApp::new(AppConfig::default());
        app.finish_annotation(LabelPrompt::new(Point::new(0.5, 0.5), 1.0));
        assert!(app.session.is_empty());
    }

    #[test]
    fn test_play_and_stop_clip_resets_speed() {
        let mut app = app_with_points();
        app.speed = 2.0;
        let id = app.session.clips[0].id.clone();

        app.play_clip(&id);
        assert_eq!(app.clips.active_id(), Some(id.as_str()));
        assert!(app.surface.is_muted());
        assert_eq!(app.surface.current_time(), 3.5);

        // Toggling play while a clip runs stops it instead of resuming.
        app.toggle_play();
        assert!(!app.clips.is_active());
        assert!(!app.surface.is_muted());
        assert!(!app.surface.is_playing());
        assert_eq!(app.speed, 1.0);
    }

    #[test]
    fn test_apply_analysis_with_missing_video() {
        let mut app = app_with_points();
        let data = app.session.to_analysis_data(Some("gone.mp4".to_string()));

        app.install_video(video("other.mp4"));
        app.apply_analysis(RestoredAnalysis {
            data: data.clone(),
            video: None,
            missing_video: Some("gone.mp4".to_string()),
        });

        assert_eq!(app.session.annotations, data.annotations);
        assert_eq!(app.session.notes, "first take");
        assert!(!app.surface.has_video());
        assert_eq!(app.notices.len(), 1);
    }

    #[test]
    fn test_save_without_video_reports_error() {
        let mut app = BioMotionApp::new(AppConfig::default());
        app.save_analysis();
        assert!(app.worker.is_none());
        assert_eq!(app.notices.len(), 1);
        assert_eq!(app.notices[0].level, dialogs::NoticeLevel::Error);
    }

    #[test]
    fn test_worker_disconnect_clears_busy_state() {
        let mut app = BioMotionApp::new(AppConfig::default());
        let (sender, receiver) = channel::<Result<WorkerResult, String>>();
        app.worker = Some(receiver);
        app.loading_message = Some("Saving analysis...".to_string());
        drop(sender);

        app.poll_worker();
        assert!(app.worker.is_none());
        assert!(app.loading_message.is_none());
        assert_eq!(app.notices.len(), 1);
    }

    #[test]
    fn test_request_while_busy_keeps_pending_result() {
        let mut app = BioMotionApp::new(AppConfig::default());
        let (sender, receiver) = channel::<Result<WorkerResult, String>>();
        app.worker = Some(receiver);
        app.loading_message = Some("Saving analysis...".to_string());

        app.load_video_file(PathBuf::from("x.mp4"));
        app.load_analysis_file(PathBuf::from("x.zip"));
        assert_eq!(app.loading_message.as_deref(), Some("Saving analysis..."));

        sender
            .send(Err("Failed to save analysis: disk full".to_string()))
            .unwrap();
        app.poll_worker();

        assert!(!app.is_busy());
        assert_eq!(app.notices.len(), 1);
        assert_eq!(app.notices[0].message, "Failed to save analysis: disk full");
    }
}
