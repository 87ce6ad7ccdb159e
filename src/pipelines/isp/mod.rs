// SPDX-License-Identifier: GPL-3.0-only

//! Source → ISP → renderer pipeline
//!
//! # Modules
//!
//! - [`bootstrap`]: Ordered bring-up of components and connections
//! - [`control`]: Control port event logger
//! - [`port`]: Port format configuration with hardware alignment

pub mod bootstrap;
pub mod control;
pub mod port;

pub use bootstrap::bootstrap;
pub use control::control_event_logger;
pub use port::{aligned_format, configure_port};

use crate::backends::framework::{
    ComponentId, ComponentInfo, ConnectionId, FrameworkResult, MediaFramework,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// A running pipeline
///
/// Owns the components and connections it created. When teardown is enabled
/// they are disabled and destroyed on [`IspPipeline::shutdown`] or drop,
/// connections first, then components from the renderer back to the source.
pub struct IspPipeline {
    framework: Arc<dyn MediaFramework>,
    /// Source, ISP, renderer
    components: [ComponentId; 3],
    /// Source→ISP, ISP→renderer
    connections: [ConnectionId; 2],
    teardown: bool,
    active: bool,
}

impl IspPipeline {
    pub(crate) fn new(
        framework: Arc<dyn MediaFramework>,
        components: [ComponentId; 3],
        connections: [ConnectionId; 2],
        teardown: bool,
    ) -> Self {
        Self {
            framework,
            components,
            connections,
            teardown,
            active: true,
        }
    }

    pub fn source(&self) -> ComponentId {
        self.components[0]
    }

    pub fn isp(&self) -> ComponentId {
        self.components[1]
    }

    pub fn render(&self) -> ComponentId {
        self.components[2]
    }

    pub fn connections(&self) -> [ConnectionId; 2] {
        self.connections
    }

    /// Framework description of each component, source first
    pub fn component_infos(&self) -> FrameworkResult<Vec<ComponentInfo>> {
        self.components
            .iter()
            .map(|c| self.framework.component_info(*c))
            .collect()
    }

    /// Block the calling thread while the framework streams
    pub fn hold(&self, duration: Duration) {
        info!(seconds = duration.as_secs_f64(), "Streaming");
        let start = Instant::now();
        std::thread::sleep(duration);
        debug!(elapsed_ms = start.elapsed().as_millis() as u64, "Hold finished");
    }

    /// Stream for `duration`, then shut down
    pub fn run_for(self, duration: Duration) {
        self.hold(duration);
        self.shutdown();
    }

    /// Release everything the pipeline created
    pub fn shutdown(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        if !self.teardown {
            debug!("Teardown disabled, leaving pipeline to process exit");
            return;
        }

        info!("Tearing down ISP pipeline");
        let fw = self.framework.as_ref();

        for connection in self.connections.iter().rev() {
            if let Err(status) = fw.connection_disable(*connection) {
                warn!(?connection, %status, "Failed to disable connection");
            }
            if let Err(status) = fw.connection_destroy(*connection) {
                warn!(?connection, %status, "Failed to destroy connection");
            }
        }

        for component in self.components.iter().rev() {
            if let Err(status) = fw.component_disable(*component) {
                warn!(?component, %status, "Failed to disable component");
            }
            if let Err(status) = fw.component_destroy(*component) {
                warn!(?component, %status, "Failed to destroy component");
            }
        }
    }
}

impl Drop for IspPipeline {
    fn drop(&mut self) {
        self.release();
    }
}
