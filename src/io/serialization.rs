// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Metadata sidecar files.
//!
//! A sidecar holds the points, clips, strokes and notes of an analysis and
//! leaves the video where it is. The video is matched up again by
//! `primaryVideoFileName`. Full analyses with the video embedded go through
//! [`super::archive`].

use crate::models::project::AnalysisData;
use anyhow::{bail, Result};
use std::path::Path;

/// Write a YAML sidecar for hand editing or diffing between takes.
pub fn export_yaml(data: &AnalysisData, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(data)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Write a JSON sidecar in the same layout as `analysis_data.json` inside an archive.
pub fn export_json(data: &AnalysisData, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Read a YAML sidecar. Missing collections come back empty.
pub fn import_yaml(path: &Path) -> Result<AnalysisData> {
    let yaml = std::fs::read_to_string(path)?;
    let data = serde_yaml::from_str(&yaml)?;
    Ok(data)
}

/// Read a JSON sidecar, including an `analysis_data.json` pulled out of an archive.
pub fn import_json(path: &Path) -> Result<AnalysisData> {
    let json = std::fs::read_to_string(path)?;
    let data = serde_json::from_str(&json)?;
    Ok(data)
}

/// Write a sidecar, choosing the format from the extension (`.json`, `.yaml`, `.yml`).
pub fn export_metadata(data: &AnalysisData, path: &Path) -> Result<()> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => export_yaml(data, path),
        Some("json") => export_json(data, path),
        extension => bail!("Unsupported file extension: {:?}", extension),
    }
}

/// Read a sidecar chosen by extension. The current video is not touched.
pub fn import_metadata(path: &Path) -> Result<AnalysisData> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => import_yaml(path),
        Some("json") => import_json(path),
        extension => bail!("Unsupported file extension: {:?}", extension),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::Point;
    use crate::models::session::Session;
    use std::path::PathBuf;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "biomotion-serialization-{}",
            crate::util::time::generate_id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sample() -> AnalysisData {
        let mut session = Session::new();
        session.notes = "Sprint start, lane 4".to_string();
        session.add_annotation(Point::new(0.25, 0.5), 1.5, "first step", "#f59e0b", 12.0);
        session.to_analysis_data(Some("sprint.mov".to_string()))
    }

    #[test]
    fn test_yaml_and_json_roundtrip() {
        let dir = scratch_dir();
        let data = sample();

        for name in ["analysis.yaml", "analysis.json"] {
            let path = dir.join(name);
            export_metadata(&data, &path).unwrap();
            assert_eq!(import_metadata(&path).unwrap(), data);
        }

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let dir = scratch_dir();
        let path = dir.join("analysis.txt");
        assert!(export_metadata(&sample(), &path).is_err());
        assert!(!path.exists());
        assert!(import_metadata(&path).is_err());
        std::fs::remove_dir_all(dir).unwrap();
    }
    #[test]
    fn test_sidecar_names_video_without_embedding_it() {
        let dir = scratch_dir();
        let path = dir.join("analysis.json");
        export_metadata(&sample(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"primaryVideoFileName\": \"sprint.mov\""));
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_sparse_yaml_sidecar_defaults_collections() {
        let dir = scratch_dir();
        let path = dir.join("notes.yml");
        std::fs::write(&path, "notes: hip drop on landing\n").unwrap();

        let data = import_metadata(&path).unwrap();
        assert_eq!(data.notes, "hip drop on landing");
        assert!(data.annotations.is_empty());
        assert!(data.clips.is_empty());
        assert!(data.primary_video_file_name.is_none());
        std::fs::remove_dir_all(dir).unwrap();
    }
}
