// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! BioMotion - video movement analysis
//!
//! A cross-platform desktop application for marking moments on a video,
//! sketching over frames, replaying each marked moment as a zoomed
//! half-speed clip, and saving the whole analysis as a portable archive.

mod app;
mod config;
mod error;
mod io;
mod models;
mod player;
mod ui;
mod util;

use anyhow::Result;
use app::BioMotionApp;
use config::AppConfig;
use std::path::Path;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = AppConfig::load_or_default(Path::new(config::CONFIG_FILE));

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([640.0, 480.0])
            .with_title("BioMotion"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "BioMotion",
        options,
        Box::new(|_cc| Ok(Box::new(BioMotionApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
