// SPDX-License-Identifier: MPL-2.0

//! Backend abstraction layer for the media framework
//!
//! # Modules
//!
//! - [`framework`]: Component graph call surface, GStreamer realisation and
//!   an in-memory recording framework

pub mod framework;
