// SPDX-License-Identifier: MPL-2.0

//! GStreamer realisation of the component graph framework
//!
//! - Components are elements inside one pipeline, created from a factory
//!   looked up by component name (`vc.ril.isp` → `videoconvert`, ...)
//! - Data ports are the element's sink pads (inputs) and src pads (outputs)
//! - A tunnelled connection is a capsfilter carrying the committed output
//!   format, linked between the two pads
//! - Control events are bus messages, dispatched on a background thread to
//!   the callback of the component that posted them
//!
//! Buffers are reference counted inside the pipeline and never reach this
//! process's control thread, so every connection is zero-copy.

use super::types::*;
use super::MediaFramework;
use crate::constants::{components, timing};
use gstreamer::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info, warn};

/// Element factories standing in for the framework's components
pub fn default_factories() -> HashMap<String, String> {
    [
        (components::SOURCE, "videotestsrc"),
        (components::ISP, "videoconvert"),
        (components::RENDER, "autovideosink"),
    ]
    .into_iter()
    .map(|(component, factory)| (component.to_string(), factory.to_string()))
    .collect()
}

/// GStreamer raw video format for a FourCC encoding
pub fn video_format_for(encoding: Encoding) -> Option<gstreamer_video::VideoFormat> {
    use gstreamer_video::VideoFormat as F;

    let format = match encoding {
        Encoding::I420 => F::I420,
        Encoding::YV12 => F::Yv12,
        Encoding::NV12 => F::Nv12,
        Encoding::NV21 => F::Nv21,
        Encoding::YUYV => F::Yuy2,
        Encoding::UYVY => F::Uyvy,
        Encoding::RGB24 => F::Rgb,
        Encoding::BGR24 => F::Bgr,
        Encoding::RGBA => F::Rgba,
        Encoding::BGRA => F::Bgra,
        _ => return None,
    };
    Some(format)
}

/// `videotestsrc` pattern nick for a source pattern
fn pattern_nick(pattern: SourcePattern) -> &'static str {
    match pattern {
        SourcePattern::White => "white",
        SourcePattern::Black => "black",
        SourcePattern::Diagonal => "gradient",
        SourcePattern::Noise | SourcePattern::Random => "snow",
        SourcePattern::Colour => "colors",
        SourcePattern::Blocks => "checkers-8",
        SourcePattern::Swirly => "pinwheel",
    }
}

/// Caps describing a committed port format
///
/// GStreamer keeps stride and plane padding inside the buffer metadata, so
/// the caps carry the visible (crop) size.
fn caps_for(format: &VideoFormat) -> FrameworkResult<gstreamer::Caps> {
    if format.crop.x != 0 || format.crop.y != 0 {
        return Err(Status::NotImplemented);
    }
    let video_format = video_format_for(format.encoding).ok_or(Status::Invalid)?;
    let info = gstreamer_video::VideoInfo::builder(video_format, format.crop.width, format.crop.height)
        .build()
        .map_err(|_| Status::Invalid)?;
    info.to_caps().map_err(|_| Status::Invalid)
}

struct GraphPort {
    pad: gstreamer::Pad,
    format: Option<VideoFormat>,
    zero_copy: bool,
    connected: bool,
}

struct GraphComponent {
    info: ComponentInfo,
    element: gstreamer::Element,
    inputs: Vec<GraphPort>,
    outputs: Vec<GraphPort>,
    control: Option<ControlCallback>,
    enabled: bool,
}

impl GraphComponent {
    fn port(&self, kind: PortKind, index: usize) -> FrameworkResult<&GraphPort> {
        match kind {
            PortKind::Input => self.inputs.get(index),
            PortKind::Output => self.outputs.get(index),
            PortKind::Control => None,
        }
        .ok_or(Status::Invalid)
    }

    fn port_mut(&mut self, kind: PortKind, index: usize) -> FrameworkResult<&mut GraphPort> {
        match kind {
            PortKind::Input => self.inputs.get_mut(index),
            PortKind::Output => self.outputs.get_mut(index),
            PortKind::Control => None,
        }
        .ok_or(Status::Invalid)
    }

    /// Every committed data port is part of a connection
    fn fully_connected(&self) -> bool {
        self.inputs
            .iter()
            .chain(self.outputs.iter())
            .filter(|p| p.format.is_some())
            .all(|p| p.connected)
    }
}

struct GraphConnection {
    output: PortRef,
    input: PortRef,
    filter: gstreamer::Element,
    enabled: bool,
}

#[derive(Default)]
struct GraphState {
    components: BTreeMap<ComponentId, GraphComponent>,
    connections: BTreeMap<ConnectionId, GraphConnection>,
    next_id: u32,
    playing: bool,
}

impl GraphState {
    fn component(&self, id: ComponentId) -> FrameworkResult<&GraphComponent> {
        self.components.get(&id).ok_or(Status::Invalid)
    }

    fn component_mut(&mut self, id: ComponentId) -> FrameworkResult<&mut GraphComponent> {
        self.components.get_mut(&id).ok_or(Status::Invalid)
    }

    fn port(&self, port: PortRef) -> FrameworkResult<&GraphPort> {
        self.component(port.component)?.port(port.kind, port.index)
    }

    fn port_mut(&mut self, port: PortRef) -> FrameworkResult<&mut GraphPort> {
        self.component_mut(port.component)?
            .port_mut(port.kind, port.index)
    }

    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Component graph on a single GStreamer pipeline
pub struct GstGraph {
    pipeline: gstreamer::Pipeline,
    factories: HashMap<String, String>,
    state: Arc<Mutex<GraphState>>,
    stop: Arc<AtomicBool>,
    event_thread: Option<JoinHandle<()>>,
}

impl GstGraph {
    /// Create a graph using the default component factories
    pub fn new() -> BackendResult<Self> {
        Self::with_factories(default_factories())
    }

    /// Create a graph with an explicit component → element factory map
    ///
    /// Component names missing from the map are used as factory names.
    pub fn with_factories(factories: HashMap<String, String>) -> BackendResult<Self> {
        gstreamer::init().map_err(|e| {
            BackendError::NotAvailable(format!("GStreamer init failed: {}", e))
        })?;

        let pipeline = gstreamer::Pipeline::with_name("isp-pipeline");
        let bus = pipeline
            .bus()
            .ok_or_else(|| BackendError::InitializationFailed("Pipeline has no bus".into()))?;

        let state = Arc::new(Mutex::new(GraphState::default()));
        let stop = Arc::new(AtomicBool::new(false));

        let event_thread = thread::Builder::new()
            .name("control-events".into())
            .spawn({
                let state = state.clone();
                let stop = stop.clone();
                move || dispatch_control_events(bus, state, stop)
            })
            .map_err(|e| {
                BackendError::InitializationFailed(format!("Failed to spawn event thread: {}", e))
            })?;

        info!(factories = ?factories, "GStreamer component graph created");

        Ok(Self {
            pipeline,
            factories,
            state,
            stop,
            event_thread: Some(event_thread),
        })
    }

    fn lock(&self) -> FrameworkResult<MutexGuard<'_, GraphState>> {
        self.state.lock().map_err(|_| {
            error!("Component graph state poisoned");
            Status::Fault
        })
    }

    /// Start streaming once every enabled component is fully connected
    fn try_start(&self, state: &mut GraphState) -> FrameworkResult<()> {
        if state.playing {
            return Ok(());
        }
        let ready = !state.components.is_empty()
            && state
                .components
                .values()
                .all(|c| c.enabled && c.fully_connected())
            && state.connections.values().all(|c| c.enabled);
        if !ready {
            debug!("Graph not complete yet, not starting");
            return Ok(());
        }

        info!("All components connected, starting pipeline");
        self.pipeline
            .set_state(gstreamer::State::Playing)
            .map_err(|e| {
                error!(error = %e, "Failed to start pipeline");
                Status::Io
            })?;
        state.playing = true;
        Ok(())
    }

    /// Stop streaming if running
    fn stop_streaming(&self, state: &mut GraphState) -> FrameworkResult<()> {
        if !state.playing {
            return Ok(());
        }
        debug!("Stopping pipeline");
        // Elements fall back to the state they were enabled in
        self.pipeline
            .set_state(gstreamer::State::Ready)
            .map_err(|e| {
                error!(error = %e, "Failed to stop pipeline");
                Status::Io
            })?;
        // Pads are unlinked right after this, wait until streaming threads are gone
        let timeout = gstreamer::ClockTime::from_mseconds(timing::STATE_CHANGE_TIMEOUT_MS);
        let (result, current, _) = self.pipeline.state(timeout);
        if result.is_err() {
            warn!(?current, "Pipeline did not settle after stopping");
        }
        state.playing = false;
        Ok(())
    }

    fn unlink(connection: &GraphConnection, state: &GraphState) -> FrameworkResult<()> {
        let out_pad = &state.port(connection.output)?.pad;
        let in_pad = &state.port(connection.input)?.pad;
        let filter_sink = connection.filter.static_pad("sink").ok_or(Status::Fault)?;
        let filter_src = connection.filter.static_pad("src").ok_or(Status::Fault)?;

        out_pad
            .unlink(&filter_sink)
            .map_err(|_| Status::NotConnected)?;
        filter_src.unlink(in_pad).map_err(|_| Status::NotConnected)?;
        Ok(())
    }
}

impl MediaFramework for GstGraph {
    fn component_create(&self, name: &str) -> FrameworkResult<ComponentId> {
        let factory = self
            .factories
            .get(name)
            .map(String::as_str)
            .unwrap_or(name);

        let element = gstreamer::ElementFactory::make(factory)
            .build()
            .map_err(|e| {
                warn!(component = name, factory, error = %e, "Failed to create element");
                Status::NotFound
            })?;

        // Frames are paced by the clock rather than produced as fast as possible
        if element.find_property("is-live").is_some() {
            element.set_property("is-live", true);
        }

        self.pipeline.add(&element).map_err(|e| {
            warn!(component = name, error = %e, "Failed to add element");
            Status::NoSpace
        })?;

        let port = |pad: gstreamer::Pad| GraphPort {
            pad,
            format: None,
            zero_copy: false,
            connected: false,
        };
        let inputs: Vec<GraphPort> = element.sink_pads().into_iter().map(port).collect();
        let outputs: Vec<GraphPort> = element.src_pads().into_iter().map(port).collect();

        let mut state = self.lock()?;
        let id = ComponentId(state.next_id());
        info!(
            component = name,
            factory,
            inputs = inputs.len(),
            outputs = outputs.len(),
            ?id,
            "Component created"
        );
        state.components.insert(
            id,
            GraphComponent {
                info: ComponentInfo {
                    name: name.to_string(),
                    inputs: inputs.len(),
                    outputs: outputs.len(),
                },
                element,
                inputs,
                outputs,
                control: None,
                enabled: false,
            },
        );
        Ok(id)
    }

    fn component_info(&self, component: ComponentId) -> FrameworkResult<ComponentInfo> {
        Ok(self.lock()?.component(component)?.info.clone())
    }

    fn component_enable(&self, component: ComponentId) -> FrameworkResult<()> {
        let mut state = self.lock()?;
        let comp = state.component_mut(component)?;
        if comp.enabled {
            return Ok(());
        }
        comp.element
            .set_state(gstreamer::State::Ready)
            .map_err(|e| {
                warn!(component = %comp.info.name, error = %e, "Failed to enable component");
                Status::Io
            })?;
        comp.enabled = true;
        debug!(component = %comp.info.name, "Component enabled");
        self.try_start(&mut state)
    }

    fn component_disable(&self, component: ComponentId) -> FrameworkResult<()> {
        let mut state = self.lock()?;
        self.stop_streaming(&mut state)?;
        let comp = state.component_mut(component)?;
        comp.element
            .set_state(gstreamer::State::Null)
            .map_err(|e| {
                warn!(component = %comp.info.name, error = %e, "Failed to disable component");
                Status::Io
            })?;
        comp.enabled = false;
        Ok(())
    }

    fn component_destroy(&self, component: ComponentId) -> FrameworkResult<()> {
        let mut state = self.lock()?;
        let in_use = state
            .connections
            .values()
            .any(|c| c.output.component == component || c.input.component == component);
        if in_use {
            return Err(Status::AlreadyConnected);
        }
        let comp = state.components.remove(&component).ok_or(Status::Invalid)?;
        let _ = comp.element.set_state(gstreamer::State::Null);
        self.pipeline.remove(&comp.element).map_err(|e| {
            warn!(component = %comp.info.name, error = %e, "Failed to remove element");
            Status::Io
        })?;
        debug!(component = %comp.info.name, "Component destroyed");
        Ok(())
    }

    fn port_enable(&self, port: PortRef, callback: ControlCallback) -> FrameworkResult<()> {
        if port.kind != PortKind::Control {
            return Err(Status::Invalid);
        }
        let mut state = self.lock()?;
        let comp = state.component_mut(port.component)?;
        if comp.control.is_some() {
            return Err(Status::Invalid);
        }
        comp.control = Some(callback);
        Ok(())
    }

    fn port_format(&self, port: PortRef) -> FrameworkResult<VideoFormat> {
        self.lock()?.port(port)?.format.ok_or(Status::NotConfigured)
    }

    fn port_format_commit(&self, port: PortRef, format: &VideoFormat) -> FrameworkResult<()> {
        let caps = caps_for(format)?;
        let mut state = self.lock()?;
        let graph_port = state.port_mut(port)?;
        if graph_port.connected {
            return Err(Status::AlreadyConnected);
        }
        if !graph_port.pad.pad_template_caps().can_intersect(&caps) {
            debug!(pad = %graph_port.pad.name(), %caps, "Caps rejected by pad template");
            return Err(Status::Invalid);
        }
        graph_port.format = Some(*format);
        debug!(pad = %graph_port.pad.name(), %caps, "Port format committed");
        Ok(())
    }

    fn port_parameter_set(&self, port: PortRef, parameter: &Parameter) -> FrameworkResult<()> {
        let mut state = self.lock()?;
        match *parameter {
            Parameter::ZeroCopy(enabled) => {
                state.port_mut(port)?.zero_copy = enabled;
            }
            Parameter::SourcePattern(pattern) => {
                if port.kind != PortKind::Output {
                    return Err(Status::Invalid);
                }
                let comp = state.component(port.component)?;
                comp.port(port.kind, port.index)?;
                if comp.element.find_property("pattern").is_none() {
                    return Err(Status::NotImplemented);
                }
                comp.element
                    .set_property_from_str("pattern", pattern_nick(pattern));
            }
        }
        Ok(())
    }

    fn connection_create(
        &self,
        output: PortRef,
        input: PortRef,
        flags: ConnectionFlags,
    ) -> FrameworkResult<ConnectionId> {
        // Buffers are only ever moved inside the pipeline
        if !flags.tunnelling {
            return Err(Status::NotImplemented);
        }
        if output.kind != PortKind::Output || input.kind != PortKind::Input {
            return Err(Status::Invalid);
        }

        let mut state = self.lock()?;
        if !state.component(output.component)?.enabled || !state.component(input.component)?.enabled {
            return Err(Status::NotReady);
        }
        let out_port = state.port(output)?;
        let in_port = state.port(input)?;
        if out_port.connected || in_port.connected {
            return Err(Status::AlreadyConnected);
        }
        let (out_format, in_format) = match (out_port.format, in_port.format) {
            (Some(o), Some(i)) => (o, i),
            _ => return Err(Status::NotConfigured),
        };
        if !out_format.is_compatible_with(&in_format) {
            return Err(Status::Invalid);
        }
        if out_port.zero_copy != in_port.zero_copy {
            debug!("Zero-copy differs between connection endpoints");
        }

        let filter = gstreamer::ElementFactory::make("capsfilter")
            .build()
            .map_err(|_| Status::NoMemory)?;
        filter.set_property("caps", &caps_for(&out_format)?);
        self.pipeline.add(&filter).map_err(|_| Status::NoSpace)?;

        state.port_mut(output)?.connected = true;
        state.port_mut(input)?.connected = true;

        let id = ConnectionId(state.next_id());
        state.connections.insert(
            id,
            GraphConnection {
                output,
                input,
                filter,
                enabled: false,
            },
        );
        debug!(?id, format = %out_format, "Connection created");
        Ok(id)
    }

    fn connection_enable(&self, connection: ConnectionId) -> FrameworkResult<()> {
        let mut state = self.lock()?;
        let conn = state.connections.get(&connection).ok_or(Status::Invalid)?;
        if conn.enabled {
            return Ok(());
        }

        let out_pad = &state.port(conn.output)?.pad;
        let in_pad = &state.port(conn.input)?.pad;
        let filter_sink = conn.filter.static_pad("sink").ok_or(Status::Fault)?;
        let filter_src = conn.filter.static_pad("src").ok_or(Status::Fault)?;

        out_pad.link(&filter_sink).map_err(|e| {
            warn!(pad = %out_pad.name(), error = ?e, "Failed to link output");
            Status::Invalid
        })?;
        filter_src.link(in_pad).map_err(|e| {
            warn!(pad = %in_pad.name(), error = ?e, "Failed to link input");
            Status::Invalid
        })?;
        conn.filter.set_state(gstreamer::State::Ready).map_err(|_| Status::Io)?;

        if let Some(conn) = state.connections.get_mut(&connection) {
            conn.enabled = true;
        }
        debug!(?connection, "Connection enabled");
        self.try_start(&mut state)
    }

    fn connection_disable(&self, connection: ConnectionId) -> FrameworkResult<()> {
        let mut state = self.lock()?;
        let enabled = state
            .connections
            .get(&connection)
            .map(|c| c.enabled)
            .ok_or(Status::Invalid)?;
        if !enabled {
            return Ok(());
        }

        self.stop_streaming(&mut state)?;
        let conn = state.connections.get(&connection).ok_or(Status::Invalid)?;
        Self::unlink(conn, &state)?;
        if let Some(conn) = state.connections.get_mut(&connection) {
            conn.enabled = false;
        }
        debug!(?connection, "Connection disabled");
        Ok(())
    }

    fn connection_destroy(&self, connection: ConnectionId) -> FrameworkResult<()> {
        let mut state = self.lock()?;
        let conn = state.connections.remove(&connection).ok_or(Status::Invalid)?;
        if conn.enabled {
            self.stop_streaming(&mut state)?;
            Self::unlink(&conn, &state)?;
        }

        let _ = conn.filter.set_state(gstreamer::State::Null);
        self.pipeline.remove(&conn.filter).map_err(|_| Status::Io)?;
        state.port_mut(conn.output)?.connected = false;
        state.port_mut(conn.input)?.connected = false;
        debug!(?connection, "Connection destroyed");
        Ok(())
    }
}

impl Drop for GstGraph {
    fn drop(&mut self) {
        debug!("Dropping component graph");
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.event_thread.take() {
            if handle.join().is_err() {
                warn!("Control event thread panicked");
            }
        }
        if let Err(e) = self.pipeline.set_state(gstreamer::State::Null) {
            error!(?e, "Failed to set pipeline to Null on drop");
        }
    }
}

/// Deliver bus messages to control callbacks until asked to stop
fn dispatch_control_events(
    bus: gstreamer::Bus,
    state: Arc<Mutex<GraphState>>,
    stop: Arc<AtomicBool>,
) {
    let timeout = gstreamer::ClockTime::from_mseconds(timing::BUS_POLL_INTERVAL.as_millis() as u64);

    while !stop.load(Ordering::Acquire) {
        let Some(msg) = bus.timed_pop(timeout) else {
            continue;
        };

        let kind = match msg.view() {
            gstreamer::MessageView::Error(err) => EventKind::Error {
                status: Status::Io,
                message: err.error().to_string(),
            },
            gstreamer::MessageView::Eos(_) => EventKind::EndOfStream,
            gstreamer::MessageView::Warning(w) => {
                warn!(warning = %w.error(), debug = ?w.debug(), "GStreamer warning");
                continue;
            }
            _ => continue,
        };

        let Some(src) = msg.src().cloned() else {
            continue;
        };

        let target = match state.lock() {
            Ok(state) => state.components.values().find_map(|c| {
                let owns = src == *c.element.upcast_ref::<gstreamer::Object>()
                    || src.has_as_ancestor(&c.element);
                if owns {
                    c.control.map(|cb| (cb, c.info.name.clone()))
                } else {
                    None
                }
            }),
            Err(_) => {
                error!("Component graph state poisoned, stopping event delivery");
                break;
            }
        };

        match target {
            Some((callback, component)) => {
                let port = PortInfo {
                    name: port_name(&component, PortKind::Control, 0),
                };
                // The message is the event buffer: releasing it drops our reference
                let buffer = EventBuffer::new(kind, move || drop(msg));
                callback(&port, buffer);
            }
            None => debug!(source = %src.name(), event = %kind, "Event without a listening component"),
        }
    }
    debug!("Control event thread finished");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_mapping() {
        assert_eq!(video_format_for(Encoding::I420), Some(gstreamer_video::VideoFormat::I420));
        assert_eq!(video_format_for(Encoding::RGB24), Some(gstreamer_video::VideoFormat::Rgb));
        assert_eq!(video_format_for(Encoding::from_bytes(*b"ZZZZ")), None);
    }

    #[test]
    fn test_default_factories_cover_pipeline_components() {
        let factories = default_factories();
        assert_eq!(factories.get(components::SOURCE).map(String::as_str), Some("videotestsrc"));
        assert_eq!(factories.get(components::ISP).map(String::as_str), Some("videoconvert"));
        assert_eq!(
            factories.get(components::RENDER).map(String::as_str),
            Some("autovideosink")
        );
    }

    #[test]
    fn test_pattern_nicks() {
        assert_eq!(pattern_nick(SourcePattern::Random), "snow");
        assert_eq!(pattern_nick(SourcePattern::Black), "black");
    }

    /// Headless graph (`fakesink` renderer), `None` when GStreamer or the
    /// needed plugins are missing
    fn headless_graph() -> Option<GstGraph> {
        gstreamer::init().ok()?;
        let factories = [
            (components::SOURCE, "videotestsrc"),
            (components::ISP, "videoconvert"),
            (components::RENDER, "fakesink"),
        ];
        if factories
            .iter()
            .any(|(_, f)| gstreamer::ElementFactory::find(f).is_none())
        {
            return None;
        }
        let factories = factories
            .into_iter()
            .map(|(c, f)| (c.to_string(), f.to_string()))
            .collect();
        GstGraph::with_factories(factories).ok()
    }

    fn small_format() -> VideoFormat {
        VideoFormat {
            encoding: Encoding::I420,
            width: 64,
            height: 48,
            crop: Rect {
                x: 0,
                y: 0,
                width: 64,
                height: 48,
            },
        }
    }

    fn is_playing(graph: &GstGraph) -> bool {
        graph.state.lock().unwrap().playing
    }

    #[test]
    fn test_streaming_starts_once_graph_is_connected() {
        let Some(graph) = headless_graph() else {
            eprintln!("GStreamer unavailable, skipping");
            return;
        };
        let format = small_format();

        let src = graph.component_create(components::SOURCE).unwrap();
        let isp = graph.component_create(components::ISP).unwrap();
        let sink = graph.component_create(components::RENDER).unwrap();
        let (src_out, isp_in) = (PortRef::output(src, 0), PortRef::input(isp, 0));
        let (isp_out, sink_in) = (PortRef::output(isp, 0), PortRef::input(sink, 0));
        for port in [src_out, isp_in, isp_out, sink_in] {
            graph.port_format_commit(port, &format).unwrap();
        }

        for component in [src, isp, sink] {
            graph.component_enable(component).unwrap();
        }
        // Committed ports are still unlinked
        assert!(!is_playing(&graph));

        let first = graph
            .connection_create(src_out, isp_in, ConnectionFlags::TUNNELLING)
            .unwrap();
        graph.connection_enable(first).unwrap();
        assert!(!is_playing(&graph));

        let second = graph
            .connection_create(isp_out, sink_in, ConnectionFlags::TUNNELLING)
            .unwrap();
        assert!(!is_playing(&graph));
        graph.connection_enable(second).unwrap();
        assert!(is_playing(&graph));

        graph.connection_disable(second).unwrap();
        assert!(!is_playing(&graph));
        graph.connection_destroy(second).unwrap();
        graph.connection_destroy(first).unwrap();
        for component in [sink, isp, src] {
            graph.component_disable(component).unwrap();
            graph.component_destroy(component).unwrap();
        }
    }

    #[test]
    fn test_connection_requires_tunnelling() {
        let Some(graph) = headless_graph() else {
            eprintln!("GStreamer unavailable, skipping");
            return;
        };
        let format = small_format();
        let src = graph.component_create(components::SOURCE).unwrap();
        let isp = graph.component_create(components::ISP).unwrap();
        graph.port_format_commit(PortRef::output(src, 0), &format).unwrap();
        graph.port_format_commit(PortRef::input(isp, 0), &format).unwrap();
        graph.component_enable(src).unwrap();
        graph.component_enable(isp).unwrap();

        let result = graph.connection_create(
            PortRef::output(src, 0),
            PortRef::input(isp, 0),
            ConnectionFlags::default(),
        );
        assert_eq!(result, Err(Status::NotImplemented));
        assert!(!is_playing(&graph));
    }
}
