// SPDX-License-Identifier: GPL-3.0-only

//! Pipeline bring-up sequence
//!
//! Source, ISP and renderer are created and enabled in that order, each with
//! the control logger attached first and its ports committed before enable.
//! The two tunnelled connections are made once all three are running.
//!
//! The first failing call ends the sequence. Nothing already created is
//! released on that path: no framework call follows a failed one.

use super::control::control_event_logger;
use super::port::configure_port;
use super::IspPipeline;
use crate::backends::framework::{ConnectionFlags, MediaFramework, Parameter, PortRef};
use crate::check;
use crate::config::PipelineConfig;
use crate::errors::FrameworkError;
use std::sync::Arc;
use tracing::{debug, info};

/// Bring up the source → ISP → renderer pipeline
pub fn bootstrap(
    framework: Arc<dyn MediaFramework>,
    config: &PipelineConfig,
) -> Result<IspPipeline, FrameworkError> {
    let fw = framework.as_ref();
    let (width, height) = (config.width, config.height);
    let zero_copy = Parameter::ZeroCopy(config.zero_copy);

    info!(
        width,
        height,
        source_encoding = %config.source.encoding,
        isp_encoding = %config.isp.output_encoding,
        zero_copy = config.zero_copy,
        "Bootstrapping ISP pipeline"
    );

    // Source
    let source = check!(fw.component_create(&config.source.component));
    check!(fw.port_enable(PortRef::control(source), control_event_logger));
    let source_out = PortRef::output(source, 0);
    check!(configure_port(fw, source_out, config.source.encoding, width, height));
    check!(fw.port_parameter_set(source_out, &Parameter::SourcePattern(config.source.pattern)));
    check!(fw.port_parameter_set(source_out, &zero_copy));
    check!(fw.component_enable(source));
    debug!(component = %config.source.component, "Source enabled");

    // ISP
    let isp = check!(fw.component_create(&config.isp.component));
    check!(fw.port_enable(PortRef::control(isp), control_event_logger));
    let isp_in = PortRef::input(isp, 0);
    let isp_out = PortRef::output(isp, 0);
    check!(configure_port(fw, isp_in, config.source.encoding, width, height));
    check!(configure_port(fw, isp_out, config.isp.output_encoding, width, height));
    check!(fw.port_parameter_set(isp_in, &zero_copy));
    check!(fw.port_parameter_set(isp_out, &zero_copy));
    check!(fw.component_enable(isp));
    debug!(component = %config.isp.component, "ISP enabled");

    // Renderer
    let render = check!(fw.component_create(&config.render.component));
    check!(fw.port_enable(PortRef::control(render), control_event_logger));
    let render_in = PortRef::input(render, 0);
    check!(configure_port(fw, render_in, config.isp.output_encoding, width, height));
    check!(fw.port_parameter_set(render_in, &zero_copy));
    check!(fw.component_enable(render));
    debug!(component = %config.render.component, "Renderer enabled");

    // source[0] -- [0]isp
    let source_to_isp = check!(fw.connection_create(source_out, isp_in, ConnectionFlags::TUNNELLING));
    check!(fw.connection_enable(source_to_isp));

    // isp[0] -- [0]render
    let isp_to_render = check!(fw.connection_create(isp_out, render_in, ConnectionFlags::TUNNELLING));
    check!(fw.connection_enable(isp_to_render));

    info!("ISP pipeline running");

    Ok(IspPipeline::new(
        framework,
        [source, isp, render],
        [source_to_isp, isp_to_render],
        config.teardown,
    ))
}
