// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! This module provides command-line functionality for:
//! - Running the pipeline on the GStreamer component graph
//! - Dry-running the setup sequence against the recording framework
//! - Printing the effective configuration

use isp_pipeline::backends::framework::gst_graph::GstGraph;
use isp_pipeline::backends::framework::recording::RecordingFramework;
use isp_pipeline::pipelines::isp;
use isp_pipeline::{AppResult, FrameworkBackendType, MediaFramework, PipelineConfig};
use std::sync::Arc;
use tracing::{info, warn};

/// Bring the pipeline up, stream for the configured time, tear it down
pub fn run(config: &PipelineConfig, backend: FrameworkBackendType) -> AppResult<()> {
    info!(%backend, "Starting ISP pipeline");

    match backend {
        FrameworkBackendType::GStreamer => {
            let graph = GstGraph::new()?;
            run_pipeline(Arc::new(graph), config)
        }
        FrameworkBackendType::Recording => {
            let framework = RecordingFramework::new();
            let result = run_pipeline(Arc::new(framework.clone()), config);
            print_trace(&framework);
            result
        }
    }
}

fn run_pipeline(framework: Arc<dyn MediaFramework>, config: &PipelineConfig) -> AppResult<()> {
    let pipeline = isp::bootstrap(framework, config)?;
    match pipeline.component_infos() {
        Ok(infos) => {
            for info in infos {
                info!(
                    component = %info.name,
                    inputs = info.inputs,
                    outputs = info.outputs,
                    "Component ready"
                );
            }
        }
        Err(status) => warn!(%status, "Component info unavailable"),
    }
    pipeline.run_for(config.run_duration());
    Ok(())
}

/// Print every framework call issued during a dry run
fn print_trace(framework: &RecordingFramework) {
    let calls = framework.calls();
    println!("Framework calls ({}):", calls.len());
    for (index, call) in calls.iter().enumerate() {
        println!("  {:>2}. {}", index + 1, call);
    }
}

/// Print the effective configuration as JSON
pub fn print_config(config: &PipelineConfig) -> AppResult<()> {
    println!("{}", config.to_json()?);
    Ok(())
}
