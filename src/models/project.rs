// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Serializable analysis envelope.
//!
//! `AnalysisData` is the complete session state written into analysis
//! archives and sidecar metadata files.

use super::annotation::{Annotation, Drawing};
use super::clip::Clip;
use serde::{Deserialize, Serialize};

/// Format version written by this build.
pub const ANALYSIS_VERSION: &str = "1.0";

/// Complete analysis data for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisData {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub drawings: Vec<Drawing>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub clips: Vec<Clip>,
    /// Name of the video entry stored alongside this metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_video_file_name: Option<String>,
}

impl Default for AnalysisData {
    fn default() -> Self {
        Self {
            version: ANALYSIS_VERSION.to_string(),
            notes: String::new(),
            drawings: Vec::new(),
            annotations: Vec::new(),
            clips: Vec::new(),
            primary_video_file_name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_collections_default_to_empty() {
        let data: AnalysisData = serde_json::from_str(r#"{"version":"1.0","notes":"hi"}"#).unwrap();
        assert_eq!(data.notes, "hi");
        assert!(data.drawings.is_empty());
        assert!(data.annotations.is_empty());
        assert!(data.clips.is_empty());
        assert_eq!(data.primary_video_file_name, None);
    }

    #[test]
    fn test_video_name_field() {
        let data = AnalysisData {
            primary_video_file_name: Some("squat.mp4".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&data).unwrap();
        assert!(json.contains(r#""primaryVideoFileName":"squat.mp4""#));
        assert!(json.contains(r#""version":"1.0""#));
    }
}
