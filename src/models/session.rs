// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Session state management.
//!
//! `Session` is the single owner of everything the user has marked on the
//! current video: notes, strokes, annotations and their derived clips. The
//! UI only reads from it and asks the application to mutate it.

use super::annotation::{visible_at, Annotation, Drawing, Point};
use super::clip::Clip;
use super::project::{AnalysisData, ANALYSIS_VERSION};
use crate::util::time::generate_id;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub notes: String,
    pub drawings: Vec<Drawing>,
    pub annotations: Vec<Annotation>,
    pub clips: Vec<Clip>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a labeled point and derive its replay clip.
    ///
    /// Returns `None` without touching the session when the label is empty.
    /// A non-empty label is stored exactly as typed.
    pub fn add_annotation(
        &mut self,
        position: Point,
        time: f64,
        text: &str,
        color: &str,
        total_duration: f64,
    ) -> Option<(&Annotation, &Clip)> {
        if text.is_empty() {
            return None;
        }

        let annotation = Annotation {
            id: generate_id(),
            x: position.x,
            y: position.y,
            time,
            text: text.to_string(),
            color: color.to_string(),
        };
        let clip = Clip::for_annotation(generate_id(), &annotation, total_duration);

        self.annotations.push(annotation);
        self.clips.push(clip);

        match (self.annotations.last(), self.clips.last()) {
            (Some(annotation), Some(clip)) => Some((annotation, clip)),
            _ => None,
        }
    }

    pub fn add_drawing(&mut self, drawing: Drawing) {
        self.drawings.push(drawing);
    }

    /// Remove one annotation. Its clip is left alone.
    pub fn delete_annotation(&mut self, id: &str) -> bool {
        let before = self.annotations.len();
        self.annotations.retain(|a| a.id != id);
        self.annotations.len() != before
    }

    /// Remove one clip. Its annotation is left alone.
    pub fn delete_clip(&mut self, id: &str) -> bool {
        let before = self.clips.len();
        self.clips.retain(|c| c.id != id);
        self.clips.len() != before
    }

    pub fn find_clip(&self, id: &str) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == id)
    }

    /// Bulk clear of everything marked on the video. Notes are kept.
    pub fn clear_all(&mut self) {
        self.drawings.clear();
        self.annotations.clear();
        self.clips.clear();
    }

    /// Discard all state, as when a new raw video is loaded.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Replace the session wholesale with restored data.
    pub fn replace(&mut self, data: AnalysisData) {
        self.notes = data.notes;
        self.drawings = data.drawings;
        self.annotations = data.annotations;
        self.clips = data.clips;
    }

    /// Snapshot the session for export.
    pub fn to_analysis_data(&self, primary_video_file_name: Option<String>) -> AnalysisData {
        AnalysisData {
            version: ANALYSIS_VERSION.to_string(),
            notes: self.notes.clone(),
            drawings: self.drawings.clone(),
            annotations: self.annotations.clone(),
            clips: self.clips.clone(),
            primary_video_file_name,
        }
    }

    pub fn drawings_visible_at(&self, current: f64) -> impl Iterator<Item = &Drawing> {
        self.drawings.iter().filter(move |d| visible_at(d.time, current))
    }

    pub fn annotations_visible_at(&self, current: f64) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter().filter(move |a| visible_at(a.time, current))
    }

    pub fn is_empty(&self) -> bool {
        self.drawings.is_empty() && self.annotations.is_empty() && self.clips.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::PathPoint;

    fn drawing_at(time: f64) -> Drawing {
        Drawing {
            id: generate_id(),
            time,
            color: "#22c55e".to_string(),
            size: 4.0,
            path: vec![
                PathPoint::new(Point::new(0.1, 0.1), true),
                PathPoint::new(Point::new(0.2, 0.2), false),
            ],
        }
    }

    #[test]
    fn test_add_annotation_derives_clip() {
        let mut session = Session::new();
        let (annotation, clip) = session
            .add_annotation(Point::new(0.4, 0.6), 12.0, "knee valgus", "#ef4444", 30.0)
            .unwrap();

        assert_eq!(annotation.text, "knee valgus");
        assert_eq!(annotation.time, 12.0);
        assert_eq!(annotation.color, "#ef4444");
        assert_eq!(clip.start_time, 11.5);
        assert_eq!(clip.end_time, 13.5);
        assert_eq!((clip.zoom_x, clip.zoom_y), (0.4, 0.6));
        assert_eq!(session.annotations.len(), 1);
        assert_eq!(session.clips.len(), 1);
    }

    #[test]
    fn test_empty_label_aborts() {
        let mut session = Session::new();
        assert!(session
            .add_annotation(Point::new(0.5, 0.5), 1.0, "", "#ef4444", 10.0)
            .is_none());
        assert!(session.is_empty());
    }

    #[test]
    fn test_label_kept_verbatim() {
        let mut session = Session::new();
        session.add_annotation(Point::new(0.5, 0.5), 1.0, "  knee ", "#ef4444", 10.0);
        assert_eq!(session.annotations[0].text, "  knee ");
        assert_eq!(session.clips[0].name, "  knee ");

        // Whitespace is still a label.
        assert!(session
            .add_annotation(Point::new(0.2, 0.2), 2.0, "   ", "#ef4444", 10.0)
            .is_some());
        assert_eq!(session.annotations.len(), 2);
    }

    #[test]
    fn test_deletes_do_not_cascade() {
        let mut session = Session::new();
        session.add_annotation(Point::new(0.5, 0.5), 3.0, "a", "#ef4444", 10.0);
        let annotation_id = session.annotations[0].id.clone();
        let clip_id = session.clips[0].id.clone();

        assert!(session.delete_annotation(&annotation_id));
        assert!(session.annotations.is_empty());
        assert_eq!(session.clips.len(), 1);

        assert!(session.delete_clip(&clip_id));
        assert!(session.clips.is_empty());
        assert!(!session.delete_clip(&clip_id));
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut session = Session::new();
        session.notes = "left knee".to_string();
        session.add_annotation(Point::new(0.5, 0.5), 3.0, "a", "#ef4444", 10.0);
        session.add_drawing(drawing_at(2.0));

        session.reset();
        assert_eq!(session, Session::default());
    }

    #[test]
    fn test_clear_all_keeps_notes() {
        let mut session = Session::new();
        session.notes = "keep me".to_string();
        session.add_annotation(Point::new(0.5, 0.5), 3.0, "a", "#ef4444", 10.0);
        session.add_drawing(drawing_at(2.0));

        session.clear_all();
        assert!(session.is_empty());
        assert_eq!(session.notes, "keep me");
    }

    #[test]
    fn test_snapshot_and_replace() {
        let mut session = Session::new();
        session.notes = "run 2".to_string();
        session.add_annotation(Point::new(0.5, 0.5), 3.0, "a", "#ef4444", 10.0);
        session.add_drawing(drawing_at(2.0));

        let data = session.to_analysis_data(Some("run.mp4".to_string()));
        assert_eq!(data.version, ANALYSIS_VERSION);
        assert_eq!(data.primary_video_file_name.as_deref(), Some("run.mp4"));

        let mut restored = Session::new();
        restored.replace(data);
        assert_eq!(restored, session);
    }

    #[test]
    fn test_visibility_queries() {
        let mut session = Session::new();
        session.add_drawing(drawing_at(2.0));
        session.add_drawing(drawing_at(5.0));
        session.add_annotation(Point::new(0.5, 0.5), 5.2, "a", "#ef4444", 10.0);

        assert_eq!(session.drawings_visible_at(2.3).count(), 1);
        assert_eq!(session.drawings_visible_at(3.5).count(), 0);
        assert_eq!(session.annotations_visible_at(5.0).count(), 1);
        assert_eq!(session.annotations_visible_at(2.0).count(), 0);
    }
}
