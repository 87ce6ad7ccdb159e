// SPDX-License-Identifier: MPL-2.0

//! Component pipelines built on the media framework
//!
//! # Pipeline Architecture
//!
//! ```text
//! ┌──────────────┐      ┌──────────────┐      ┌──────────────┐
//! │    Source    │ ───▶ │     ISP      │ ───▶ │   Renderer   │
//! │ test pattern │      │ format conv. │      │   display    │
//! └──────────────┘      └──────────────┘      └──────────────┘
//!         tunnelled, zero-copy        tunnelled, zero-copy
//! ```
//!
//! The controlling thread only configures the graph. Frames move between
//! components entirely inside the framework.
//!
//! # Modules
//!
//! - [`isp`]: Source → ISP → renderer bring-up, hold and teardown

pub mod isp;
