// SPDX-License-Identifier: MPL-2.0

//! ISP pipeline driver
//!
//! Wires a synthetic video source, an image signal processor and a video
//! renderer together through a component graph framework, lets frames flow
//! through tunnelled connections for a fixed time, and tears the graph down.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`backends`]: Media framework abstraction and its implementations
//! - [`pipelines`]: Pipeline bring-up sequence
//! - [`config`]: Pipeline configuration
//! - [`constants`]: Built-in defaults
//! - [`errors`]: Error types and the fail-fast `check!` macro
//!
//! # Example
//!
//! ```no_run
//! use isp_pipeline::backends::framework::recording::RecordingFramework;
//! use isp_pipeline::config::PipelineConfig;
//! use isp_pipeline::pipelines::isp;
//! use std::sync::Arc;
//!
//! let config = PipelineConfig::default();
//! let pipeline = isp::bootstrap(Arc::new(RecordingFramework::new()), &config)?;
//! pipeline.run_for(config.run_duration());
//! # Ok::<(), isp_pipeline::errors::FrameworkError>(())
//! ```

pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod pipelines;

// Re-export commonly used types
pub use backends::framework::{FrameworkBackendType, MediaFramework};
pub use config::PipelineConfig;
pub use errors::{AppError, AppResult, FrameworkError};
pub use pipelines::isp::IspPipeline;
