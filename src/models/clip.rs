// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Replay clips derived from annotations.

use super::annotation::Annotation;
use serde::{Deserialize, Serialize};

/// Seconds of lead-in before the annotated moment.
pub const CLIP_LEAD_IN: f64 = 0.5;
/// Length of a derived clip in seconds.
pub const CLIP_LENGTH: f64 = 2.0;
/// Playback rate while a clip loops.
pub const CLIP_SPEED: f32 = 0.5;

/// A short replay window zoomed onto an annotated position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub id: String,
    pub name: String,
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
    pub speed: f32,
    pub zoom_x: f64,
    pub zoom_y: f64,
}

impl Clip {
    /// Derive the replay clip for a freshly placed annotation.
    ///
    /// The window starts `CLIP_LEAD_IN` before the annotation and is clamped
    /// to `[0, total_duration]`. A non-finite or non-positive duration means
    /// the length is unknown and only the lower bound applies.
    pub fn for_annotation(id: String, annotation: &Annotation, total_duration: f64) -> Self {
        let mut start_time = (annotation.time - CLIP_LEAD_IN).max(0.0);
        let mut end_time = start_time + CLIP_LENGTH;
        if total_duration.is_finite() && total_duration > 0.0 {
            end_time = end_time.min(total_duration);
            start_time = start_time.min(end_time);
        }

        Self {
            id,
            name: annotation.text.clone(),
            start_time,
            end_time,
            duration: round2(end_time - start_time),
            speed: CLIP_SPEED,
            zoom_x: annotation.x,
            zoom_y: annotation.y,
        }
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn annotation_at(time: f64) -> Annotation {
        Annotation {
            id: "a1".to_string(),
            x: 0.3,
            y: 0.7,
            time,
            text: "heel strike".to_string(),
            color: "#ef4444".to_string(),
        }
    }

    #[test]
    fn test_clip_in_middle_of_video() {
        let clip = Clip::for_annotation("c1".to_string(), &annotation_at(10.0), 60.0);
        assert_eq!(clip.start_time, 9.5);
        assert_eq!(clip.end_time, 11.5);
        assert_eq!(clip.duration, 2.0);
        assert_eq!(clip.speed, 0.5);
        assert_eq!((clip.zoom_x, clip.zoom_y), (0.3, 0.7));
        assert_eq!(clip.name, "heel strike");
    }

    #[test]
    fn test_clip_clamped_at_start() {
        let clip = Clip::for_annotation("c1".to_string(), &annotation_at(0.2), 60.0);
        assert_eq!(clip.start_time, 0.0);
        assert_eq!(clip.end_time, 2.0);
    }

    #[test]
    fn test_clip_clamped_at_end() {
        let clip = Clip::for_annotation("c1".to_string(), &annotation_at(4.9), 5.0);
        assert!((clip.start_time - 4.4).abs() < 1e-9);
        assert_eq!(clip.end_time, 5.0);
        assert_eq!(clip.duration, 0.6);
    }

    #[test]
    fn test_clip_unknown_duration_is_unbounded() {
        let clip = Clip::for_annotation("c1".to_string(), &annotation_at(30.0), f64::NAN);
        assert_eq!(clip.end_time, 31.5);
        assert_eq!(clip.duration, 2.0);
    }

    #[test]
    fn test_clip_field_names() {
        let clip = Clip::for_annotation("c1".to_string(), &annotation_at(1.0), 10.0);
        let value = serde_json::to_value(&clip).unwrap();
        for key in ["startTime", "endTime", "duration", "speed", "zoomX", "zoomY"] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
    }

    proptest! {
        #[test]
        fn derived_clip_stays_inside_video(
            total in 0.1f64..600.0,
            fraction in 0.0f64..=1.0,
            x in 0.0f64..=1.0,
            y in 0.0f64..=1.0,
        ) {
            let t = total * fraction;
            let mut annotation = annotation_at(t);
            annotation.x = x;
            annotation.y = y;
            let clip = Clip::for_annotation("c".to_string(), &annotation, total);

            prop_assert!(clip.start_time >= 0.0);
            prop_assert!(clip.start_time <= t);
            prop_assert!(clip.end_time <= total);
            prop_assert_eq!(clip.duration, round2(clip.end_time - clip.start_time));
            prop_assert_eq!(clip.zoom_x, x);
            prop_assert_eq!(clip.zoom_y, y);
        }
    }
}
