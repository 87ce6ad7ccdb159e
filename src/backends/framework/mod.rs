// SPDX-License-Identifier: MPL-2.0

//! Media framework abstraction
//!
//! The pipeline never touches frame data. Everything it does is a call into
//! a component graph framework: create components, commit port formats, set
//! parameters, enable, connect. This module captures that call surface as the
//! [`MediaFramework`] trait.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │  ISP pipeline setup │
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ MediaFramework Trait│  ← Common call surface
//! └──────────┬──────────┘
//!            │
//!      ┌─────┴──────┐
//!      ▼            ▼
//! ┌─────────┐  ┌─────────┐
//! │GStreamer│  │Recording│  ← Hardware graph / in-memory double
//! └─────────┘  └─────────┘
//! ```

pub mod gst_graph;
pub mod recording;
pub mod types;

pub use types::*;

/// Component graph framework
///
/// Every call returns the framework's status; any `Err` is a failed call.
/// Implementations do their own internal threading (streaming, event
/// delivery), so the trait is `Send + Sync` and takes `&self`.
pub trait MediaFramework: Send + Sync {
    // ===== Components =====

    /// Create a component by framework name (e.g. `vc.ril.isp`)
    fn component_create(&self, name: &str) -> FrameworkResult<ComponentId>;

    /// Name and port counts of a created component
    fn component_info(&self, component: ComponentId) -> FrameworkResult<ComponentInfo>;

    /// Start the component processing
    fn component_enable(&self, component: ComponentId) -> FrameworkResult<()>;

    /// Stop the component processing
    fn component_disable(&self, component: ComponentId) -> FrameworkResult<()>;

    /// Release the component; the id is invalid afterwards
    fn component_destroy(&self, component: ComponentId) -> FrameworkResult<()>;

    // ===== Ports =====

    /// Enable a port with a callback
    ///
    /// Only control ports are enabled this way; data ports are driven by
    /// tunnelled connections.
    fn port_enable(&self, port: PortRef, callback: ControlCallback) -> FrameworkResult<()>;

    /// Currently committed format of a data port
    fn port_format(&self, port: PortRef) -> FrameworkResult<VideoFormat>;

    /// Validate and apply a format to a data port
    fn port_format_commit(&self, port: PortRef, format: &VideoFormat) -> FrameworkResult<()>;

    /// Set a parameter on a data port
    fn port_parameter_set(&self, port: PortRef, parameter: &Parameter) -> FrameworkResult<()>;

    // ===== Connections =====

    /// Create a connection from an output port to an input port
    fn connection_create(
        &self,
        output: PortRef,
        input: PortRef,
        flags: ConnectionFlags,
    ) -> FrameworkResult<ConnectionId>;

    /// Start moving buffers across the connection
    fn connection_enable(&self, connection: ConnectionId) -> FrameworkResult<()>;

    /// Stop moving buffers across the connection
    fn connection_disable(&self, connection: ConnectionId) -> FrameworkResult<()>;

    /// Release the connection; the id is invalid afterwards
    fn connection_destroy(&self, connection: ConnectionId) -> FrameworkResult<()>;
}

/// Framework backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FrameworkBackendType {
    /// Hardware component graph realised on GStreamer
    #[default]
    GStreamer,
    /// In-memory framework that records calls (dry run)
    Recording,
}

impl std::fmt::Display for FrameworkBackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameworkBackendType::GStreamer => write!(f, "GStreamer"),
            FrameworkBackendType::Recording => write!(f, "recording"),
        }
    }
}
