// SPDX-License-Identifier: GPL-3.0-only

//! In-memory media framework that records every call
//!
//! Keeps enough component graph state to enforce the framework's own rules
//! (known components, committed and matching formats, enabled endpoints) so
//! that a setup sequence which passes here is well ordered. Failures can be
//! injected per call.
//!
//! Accessors (`component_info`, `port_format`) are not recorded.

use super::types::*;
use super::MediaFramework;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, trace};

/// Framework call as issued, with handles resolved to names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ComponentCreate { name: String },
    ComponentEnable { component: String },
    ComponentDisable { component: String },
    ComponentDestroy { component: String },
    PortEnable { port: String },
    PortFormatCommit { port: String, format: VideoFormat },
    PortParameterSet { port: String, parameter: Parameter },
    ConnectionCreate {
        output: String,
        input: String,
        flags: ConnectionFlags,
    },
    ConnectionEnable { connection: String },
    ConnectionDisable { connection: String },
    ConnectionDestroy { connection: String },
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Call::ComponentCreate { name } => write!(f, "component_create({})", name),
            Call::ComponentEnable { component } => write!(f, "component_enable({})", component),
            Call::ComponentDisable { component } => write!(f, "component_disable({})", component),
            Call::ComponentDestroy { component } => write!(f, "component_destroy({})", component),
            Call::PortEnable { port } => write!(f, "port_enable({})", port),
            Call::PortFormatCommit { port, format } => {
                write!(f, "port_format_commit({}, {})", port, format)
            }
            Call::PortParameterSet { port, parameter } => {
                write!(f, "port_parameter_set({}, {:?})", port, parameter)
            }
            Call::ConnectionCreate {
                output,
                input,
                flags,
            } => write!(
                f,
                "connection_create({} -> {}, tunnelling={})",
                output, input, flags.tunnelling
            ),
            Call::ConnectionEnable { connection } => write!(f, "connection_enable({})", connection),
            Call::ConnectionDisable { connection } => {
                write!(f, "connection_disable({})", connection)
            }
            Call::ConnectionDestroy { connection } => {
                write!(f, "connection_destroy({})", connection)
            }
        }
    }
}

type FailurePredicate = Box<dyn Fn(&Call) -> Option<Status> + Send>;

#[derive(Debug, Default)]
struct RecordedPort {
    format: Option<VideoFormat>,
    zero_copy: Option<bool>,
    pattern: Option<SourcePattern>,
    connected: bool,
}

struct RecordedComponent {
    info: ComponentInfo,
    enabled: bool,
    control: Option<ControlCallback>,
    ports: HashMap<(PortKind, usize), RecordedPort>,
}

#[derive(Debug)]
struct RecordedConnection {
    name: String,
    output: PortRef,
    input: PortRef,
    enabled: bool,
}

#[derive(Default)]
struct State {
    registry: HashMap<String, (usize, usize)>,
    components: BTreeMap<ComponentId, RecordedComponent>,
    connections: BTreeMap<ConnectionId, RecordedConnection>,
    next_id: u32,
    calls: Vec<Call>,
    fail_when: Option<FailurePredicate>,
}

impl State {
    fn component_name(&self, id: ComponentId) -> String {
        self.components
            .get(&id)
            .map(|c| c.info.name.clone())
            .unwrap_or_else(|| format!("<component {}>", id.0))
    }

    fn port_label(&self, port: PortRef) -> String {
        port_name(&self.component_name(port.component), port.kind, port.index)
    }

    fn connection_name(&self, id: ConnectionId) -> String {
        self.connections
            .get(&id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("<connection {}>", id.0))
    }

    /// Record the call and apply any injected failure
    fn issue(&mut self, call: Call) -> FrameworkResult<()> {
        trace!(%call, "framework call");
        let injected = self.fail_when.as_ref().and_then(|pred| pred(&call));
        self.calls.push(call);
        match injected {
            Some(status) => {
                debug!(%status, "injected failure");
                Err(status)
            }
            None => Ok(()),
        }
    }

    fn component_mut(&mut self, id: ComponentId) -> FrameworkResult<&mut RecordedComponent> {
        self.components.get_mut(&id).ok_or(Status::Invalid)
    }

    fn data_port_mut(&mut self, port: PortRef) -> FrameworkResult<&mut RecordedPort> {
        if port.kind == PortKind::Control {
            return Err(Status::Invalid);
        }
        let component = self.component_mut(port.component)?;
        if !component.info.has_port(port.kind, port.index) {
            return Err(Status::Invalid);
        }
        Ok(component.ports.entry((port.kind, port.index)).or_default())
    }

    fn data_port(&self, port: PortRef) -> FrameworkResult<Option<&RecordedPort>> {
        let component = self.components.get(&port.component).ok_or(Status::Invalid)?;
        if port.kind == PortKind::Control || !component.info.has_port(port.kind, port.index) {
            return Err(Status::Invalid);
        }
        Ok(component.ports.get(&(port.kind, port.index)))
    }

    fn is_enabled(&self, id: ComponentId) -> bool {
        self.components.get(&id).map(|c| c.enabled).unwrap_or(false)
    }
}

/// Recording framework
///
/// Cheap to clone; clones share the same graph and call log.
#[derive(Clone)]
pub struct RecordingFramework {
    state: Arc<Mutex<State>>,
    released: Arc<AtomicUsize>,
}

impl Default for RecordingFramework {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingFramework {
    /// Framework knowing the source, ISP and renderer components
    pub fn new() -> Self {
        let framework = Self::empty();
        framework
            .with_component(crate::constants::components::SOURCE, 0, 1)
            .with_component(crate::constants::components::ISP, 1, 2)
            .with_component(crate::constants::components::RENDER, 1, 0)
    }

    /// Framework with no known components
    pub fn empty() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                next_id: 1,
                ..Default::default()
            })),
            released: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make a component name creatable with the given port counts
    pub fn with_component(self, name: &str, inputs: usize, outputs: usize) -> Self {
        self.lock().registry.insert(name.to_string(), (inputs, outputs));
        self
    }

    /// Fail every call for which `predicate` returns a status
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&Call) -> Option<Status> + Send + 'static,
    {
        self.lock().fail_when = Some(Box::new(predicate));
    }

    /// Calls issued so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Number of control event buffers handed back
    pub fn released_events(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Zero-copy setting last applied to a port, by port name
    pub fn zero_copy(&self, port: &str) -> Option<bool> {
        self.find_port(port, |p| p.zero_copy)
    }

    /// Test pattern last applied to a port, by port name
    pub fn source_pattern(&self, port: &str) -> Option<SourcePattern> {
        self.find_port(port, |p| p.pattern)
    }

    /// Whether a component with this name currently exists and is enabled
    pub fn is_component_enabled(&self, name: &str) -> bool {
        self.lock()
            .components
            .values()
            .any(|c| c.info.name == name && c.enabled)
    }

    /// Number of live components
    pub fn component_count(&self) -> usize {
        self.lock().components.len()
    }

    /// Number of live connections
    pub fn connection_count(&self) -> usize {
        self.lock().connections.len()
    }

    /// Deliver a control event to the callback on a component's control port
    ///
    /// Returns `false` when no component of that name has its control port
    /// enabled. The callback runs without the framework lock held.
    pub fn emit_control_event(&self, component: &str, kind: EventKind) -> bool {
        let target = {
            let state = self.lock();
            state
                .components
                .values()
                .find(|c| c.info.name == component)
                .and_then(|c| c.control.map(|cb| (cb, c.info.name.clone())))
        };

        let Some((callback, name)) = target else {
            return false;
        };

        let released = self.released.clone();
        let buffer = EventBuffer::new(kind, move || {
            released.fetch_add(1, Ordering::SeqCst);
        });
        let port = PortInfo {
            name: port_name(&name, PortKind::Control, 0),
        };
        callback(&port, buffer);
        true
    }

    fn find_port<T>(&self, port: &str, get: impl Fn(&RecordedPort) -> Option<T>) -> Option<T> {
        let state = self.lock();
        state.components.values().find_map(|c| {
            c.ports.iter().find_map(|((kind, index), p)| {
                (port_name(&c.info.name, *kind, *index) == port)
                    .then(|| get(p))
                    .flatten()
            })
        })
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panicking test thread must not hide the log from the others
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl MediaFramework for RecordingFramework {
    fn component_create(&self, name: &str) -> FrameworkResult<ComponentId> {
        let mut state = self.lock();
        state.issue(Call::ComponentCreate {
            name: name.to_string(),
        })?;

        let (inputs, outputs) = *state.registry.get(name).ok_or(Status::NotFound)?;
        let id = ComponentId(state.next_id);
        state.next_id += 1;
        state.components.insert(
            id,
            RecordedComponent {
                info: ComponentInfo {
                    name: name.to_string(),
                    inputs,
                    outputs,
                },
                enabled: false,
                control: None,
                ports: HashMap::new(),
            },
        );
        Ok(id)
    }

    fn component_info(&self, component: ComponentId) -> FrameworkResult<ComponentInfo> {
        let state = self.lock();
        state
            .components
            .get(&component)
            .map(|c| c.info.clone())
            .ok_or(Status::Invalid)
    }

    fn component_enable(&self, component: ComponentId) -> FrameworkResult<()> {
        let mut state = self.lock();
        let name = state.component_name(component);
        state.issue(Call::ComponentEnable { component: name })?;
        state.component_mut(component)?.enabled = true;
        Ok(())
    }

    fn component_disable(&self, component: ComponentId) -> FrameworkResult<()> {
        let mut state = self.lock();
        let name = state.component_name(component);
        state.issue(Call::ComponentDisable { component: name })?;
        state.component_mut(component)?.enabled = false;
        Ok(())
    }

    fn component_destroy(&self, component: ComponentId) -> FrameworkResult<()> {
        let mut state = self.lock();
        let name = state.component_name(component);
        state.issue(Call::ComponentDestroy { component: name })?;

        let in_use = state
            .connections
            .values()
            .any(|c| c.output.component == component || c.input.component == component);
        if in_use {
            return Err(Status::AlreadyConnected);
        }
        state
            .components
            .remove(&component)
            .map(|_| ())
            .ok_or(Status::Invalid)
    }

    fn port_enable(&self, port: PortRef, callback: ControlCallback) -> FrameworkResult<()> {
        let mut state = self.lock();
        let label = state.port_label(port);
        state.issue(Call::PortEnable { port: label })?;

        if port.kind != PortKind::Control {
            return Err(Status::Invalid);
        }
        let component = state.component_mut(port.component)?;
        if component.control.is_some() {
            return Err(Status::Invalid);
        }
        component.control = Some(callback);
        Ok(())
    }

    fn port_format(&self, port: PortRef) -> FrameworkResult<VideoFormat> {
        let state = self.lock();
        state
            .data_port(port)?
            .and_then(|p| p.format)
            .ok_or(Status::NotConfigured)
    }

    fn port_format_commit(&self, port: PortRef, format: &VideoFormat) -> FrameworkResult<()> {
        let mut state = self.lock();
        let label = state.port_label(port);
        state.issue(Call::PortFormatCommit {
            port: label,
            format: *format,
        })?;

        let crop = format.crop;
        if format.width == 0
            || format.height == 0
            || crop.x + crop.width > format.width
            || crop.y + crop.height > format.height
        {
            return Err(Status::Invalid);
        }
        let data_port = state.data_port_mut(port)?;
        if data_port.connected {
            return Err(Status::AlreadyConnected);
        }
        data_port.format = Some(*format);
        Ok(())
    }

    fn port_parameter_set(&self, port: PortRef, parameter: &Parameter) -> FrameworkResult<()> {
        let mut state = self.lock();
        let label = state.port_label(port);
        state.issue(Call::PortParameterSet {
            port: label,
            parameter: *parameter,
        })?;

        let data_port = state.data_port_mut(port)?;
        match *parameter {
            Parameter::ZeroCopy(enabled) => data_port.zero_copy = Some(enabled),
            Parameter::SourcePattern(pattern) => {
                if port.kind != PortKind::Output {
                    return Err(Status::Invalid);
                }
                data_port.pattern = Some(pattern);
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
        let mut state = self.lock();
        let output_label = state.port_label(output);
        let input_label = state.port_label(input);
        state.issue(Call::ConnectionCreate {
            output: output_label.clone(),
            input: input_label.clone(),
            flags,
        })?;

        if output.kind != PortKind::Output || input.kind != PortKind::Input {
            return Err(Status::Invalid);
        }
        if !state.is_enabled(output.component) || !state.is_enabled(input.component) {
            return Err(Status::NotReady);
        }

        let out_port = state.data_port(output)?;
        let in_port = state.data_port(input)?;
        let (out_format, in_format) = match (out_port.and_then(|p| p.format), in_port.and_then(|p| p.format)) {
            (Some(o), Some(i)) => (o, i),
            _ => return Err(Status::NotConfigured),
        };
        if out_port.map(|p| p.connected).unwrap_or(false)
            || in_port.map(|p| p.connected).unwrap_or(false)
        {
            return Err(Status::AlreadyConnected);
        }
        if !out_format.is_compatible_with(&in_format) {
            return Err(Status::Invalid);
        }

        state.data_port_mut(output)?.connected = true;
        state.data_port_mut(input)?.connected = true;

        let id = ConnectionId(state.next_id);
        state.next_id += 1;
        state.connections.insert(
            id,
            RecordedConnection {
                name: format!("{}->{}", output_label, input_label),
                output,
                input,
                enabled: false,
            },
        );
        Ok(id)
    }

    fn connection_enable(&self, connection: ConnectionId) -> FrameworkResult<()> {
        let mut state = self.lock();
        let name = state.connection_name(connection);
        state.issue(Call::ConnectionEnable { connection: name })?;
        let conn = state.connections.get_mut(&connection).ok_or(Status::Invalid)?;
        conn.enabled = true;
        Ok(())
    }

    fn connection_disable(&self, connection: ConnectionId) -> FrameworkResult<()> {
        let mut state = self.lock();
        let name = state.connection_name(connection);
        state.issue(Call::ConnectionDisable { connection: name })?;
        let conn = state.connections.get_mut(&connection).ok_or(Status::Invalid)?;
        conn.enabled = false;
        Ok(())
    }

    fn connection_destroy(&self, connection: ConnectionId) -> FrameworkResult<()> {
        let mut state = self.lock();
        let name = state.connection_name(connection);
        state.issue(Call::ConnectionDestroy { connection: name })?;
        let conn = state.connections.remove(&connection).ok_or(Status::Invalid)?;
        if conn.enabled {
            // Destroying an enabled connection disables it first
            debug!(connection = %conn.name, "destroying enabled connection");
        }
        state.data_port_mut(conn.output)?.connected = false;
        state.data_port_mut(conn.input)?.connected = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::components::{ISP, RENDER, SOURCE};

    fn format(encoding: Encoding, width: u32, height: u32) -> VideoFormat {
        VideoFormat {
            encoding,
            width,
            height,
            crop: Rect {
                x: 0,
                y: 0,
                width,
                height,
            },
        }
    }

    fn ignore_event(_port: &PortInfo, buffer: EventBuffer) {
        buffer.release();
    }

    #[test]
    fn test_unknown_component_is_not_found() {
        let fw = RecordingFramework::new();
        assert_eq!(fw.component_create("vc.ril.nothing"), Err(Status::NotFound));
        assert_eq!(fw.calls().len(), 1);
    }

    #[test]
    fn test_connection_requires_matching_formats() {
        let fw = RecordingFramework::new();
        let src = fw.component_create(SOURCE).unwrap();
        let isp = fw.component_create(ISP).unwrap();
        fw.port_format_commit(PortRef::output(src, 0), &format(Encoding::I420, 64, 32))
            .unwrap();
        fw.port_format_commit(PortRef::input(isp, 0), &format(Encoding::NV12, 64, 32))
            .unwrap();
        fw.component_enable(src).unwrap();
        fw.component_enable(isp).unwrap();

        let result = fw.connection_create(
            PortRef::output(src, 0),
            PortRef::input(isp, 0),
            ConnectionFlags::TUNNELLING,
        );
        assert_eq!(result, Err(Status::Invalid));
    }

    #[test]
    fn test_connection_requires_enabled_endpoints() {
        let fw = RecordingFramework::new();
        let isp = fw.component_create(ISP).unwrap();
        let render = fw.component_create(RENDER).unwrap();
        let f = format(Encoding::I420, 64, 32);
        fw.port_format_commit(PortRef::output(isp, 0), &f).unwrap();
        fw.port_format_commit(PortRef::input(render, 0), &f).unwrap();
        fw.component_enable(isp).unwrap();

        let result = fw.connection_create(
            PortRef::output(isp, 0),
            PortRef::input(render, 0),
            ConnectionFlags::TUNNELLING,
        );
        assert_eq!(result, Err(Status::NotReady));
    }

    #[test]
    fn test_injected_failure_is_recorded() {
        let fw = RecordingFramework::new();
        fw.fail_when(|call| matches!(call, Call::ComponentEnable { .. }).then_some(Status::NoSpace));
        let src = fw.component_create(SOURCE).unwrap();
        assert_eq!(fw.component_enable(src), Err(Status::NoSpace));
        assert_eq!(
            fw.calls().last(),
            Some(&Call::ComponentEnable {
                component: SOURCE.to_string()
            })
        );
        assert!(!fw.is_component_enabled(SOURCE));
    }

    #[test]
    fn test_control_events_reach_callback() {
        let fw = RecordingFramework::new();
        assert!(!fw.emit_control_event(SOURCE, EventKind::EndOfStream));

        let src = fw.component_create(SOURCE).unwrap();
        fw.port_enable(PortRef::control(src), ignore_event).unwrap();
        assert!(fw.emit_control_event(SOURCE, EventKind::EndOfStream));
        assert_eq!(fw.released_events(), 1);

        // A second callback on the same control port is rejected
        assert_eq!(
            fw.port_enable(PortRef::control(src), ignore_event),
            Err(Status::Invalid)
        );
    }

    #[test]
    fn test_port_lookup_by_name() {
        let fw = RecordingFramework::new();
        let src = fw.component_create(SOURCE).unwrap();
        fw.port_parameter_set(PortRef::output(src, 0), &Parameter::ZeroCopy(true))
            .unwrap();
        fw.port_parameter_set(
            PortRef::output(src, 0),
            &Parameter::SourcePattern(SourcePattern::Random),
        )
        .unwrap();
        assert_eq!(fw.zero_copy("vc.ril.source:out:0"), Some(true));
        assert_eq!(
            fw.source_pattern("vc.ril.source:out:0"),
            Some(SourcePattern::Random)
        );
        assert_eq!(fw.zero_copy("vc.ril.source:out:1"), None);
    }
}
