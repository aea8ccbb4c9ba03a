// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model for a BioMotion analysis.

pub mod annotation;
pub mod clip;
pub mod project;
pub mod session;
