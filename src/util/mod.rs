// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Small pure helpers shared by the UI and the data model.

pub mod color;
pub mod geometry;
pub mod time;
