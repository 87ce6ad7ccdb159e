// SPDX-License-Identifier: GPL-3.0-only
// Shared types for the media framework abstraction

//! Shared types for media framework backends

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result of a single framework call
pub type FrameworkResult<T> = Result<T, Status>;

/// Numeric code the framework uses for a successful call
pub const STATUS_SUCCESS: u32 = 0;

/// Non-success status returned by a framework call
///
/// Discriminants are the framework's numeric status codes. Success (0) is
/// never represented here; a successful call returns `Ok`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Status {
    /// Out of memory
    NoMemory = 1,
    /// Out of resources other than memory
    NoSpace = 2,
    /// Argument is invalid
    Invalid = 3,
    /// Function not implemented
    NotImplemented = 4,
    /// No such file or directory
    NotFound = 5,
    /// No such device or address
    NoDevice = 6,
    /// I/O error
    Io = 7,
    /// Illegal seek
    IllegalSeek = 8,
    /// Data is corrupt
    Corrupt = 9,
    /// Component is not ready
    NotReady = 10,
    /// Component is not configured
    NotConfigured = 11,
    /// Port is already connected
    AlreadyConnected = 12,
    /// Port is disconnected
    NotConnected = 13,
    /// Resource temporarily unavailable, try again later
    Again = 14,
    /// Bad address
    Fault = 15,
}

impl Status {
    /// All status values in code order
    pub const ALL: [Status; 15] = [
        Status::NoMemory,
        Status::NoSpace,
        Status::Invalid,
        Status::NotImplemented,
        Status::NotFound,
        Status::NoDevice,
        Status::Io,
        Status::IllegalSeek,
        Status::Corrupt,
        Status::NotReady,
        Status::NotConfigured,
        Status::AlreadyConnected,
        Status::NotConnected,
        Status::Again,
        Status::Fault,
    ];

    /// Numeric framework status code
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Look up a status by numeric code (`None` for success or unknown codes)
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.code() == code)
    }

    /// Framework diagnostic name for this status
    pub fn as_str(self) -> &'static str {
        match self {
            Status::NoMemory => "ENOMEM",
            Status::NoSpace => "ENOSPC",
            Status::Invalid => "EINVAL",
            Status::NotImplemented => "ENOSYS",
            Status::NotFound => "ENOENT",
            Status::NoDevice => "ENXIO",
            Status::Io => "EIO",
            Status::IllegalSeek => "ESPIPE",
            Status::Corrupt => "ECORRUPT",
            Status::NotReady => "ENOTREADY",
            Status::NotConfigured => "ECONFIG",
            Status::AlreadyConnected => "EISCONN",
            Status::NotConnected => "ENOTCONN",
            Status::Again => "EAGAIN",
            Status::Fault => "EFAULT",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for Status {}

/// Human-readable name for any numeric status code
pub fn status_to_string(code: u32) -> &'static str {
    if code == STATUS_SUCCESS {
        return "SUCCESS";
    }
    Status::from_code(code).map(Status::as_str).unwrap_or("UNKNOWN")
}

/// FourCC pixel encoding
///
/// Packed little-endian: the first character occupies the lowest byte.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Encoding(u32);

impl Encoding {
    /// Planar YUV 4:2:0
    pub const I420: Encoding = Encoding::from_bytes(*b"I420");
    /// Planar YVU 4:2:0
    pub const YV12: Encoding = Encoding::from_bytes(*b"YV12");
    /// Semi-planar YUV 4:2:0
    pub const NV12: Encoding = Encoding::from_bytes(*b"NV12");
    /// Semi-planar YVU 4:2:0
    pub const NV21: Encoding = Encoding::from_bytes(*b"NV21");
    /// Packed YUV 4:2:2
    pub const YUYV: Encoding = Encoding::from_bytes(*b"YUYV");
    /// Packed YUV 4:2:2, chroma first
    pub const UYVY: Encoding = Encoding::from_bytes(*b"UYVY");
    /// Packed 24-bit RGB
    pub const RGB24: Encoding = Encoding::from_bytes(*b"RGB3");
    /// Packed 24-bit BGR
    pub const BGR24: Encoding = Encoding::from_bytes(*b"BGR3");
    /// Packed 32-bit RGBA
    pub const RGBA: Encoding = Encoding::from_bytes(*b"RGBA");
    /// Packed 32-bit BGRA
    pub const BGRA: Encoding = Encoding::from_bytes(*b"BGRA");

    /// Build an encoding from its four characters
    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Encoding(u32::from_le_bytes(b))
    }

    /// Raw FourCC value
    pub fn fourcc(self) -> u32 {
        self.0
    }

    /// The four characters of the code
    pub fn to_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.to_bytes() {
            let c = if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Encoding({})", self)
    }
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.is_empty() || bytes.len() > 4 || !bytes.iter().all(|b| b.is_ascii_graphic()) {
            return Err(format!("invalid FourCC encoding '{}'", s));
        }
        // Short codes are space padded, as in "RGB " style FourCCs
        let mut code = [b' '; 4];
        code[..bytes.len()].copy_from_slice(bytes);
        Ok(Encoding::from_bytes(code))
    }
}

impl TryFrom<String> for Encoding {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Encoding> for String {
    fn from(value: Encoding) -> Self {
        value.to_string().trim_end().to_string()
    }
}

/// Rectangle within a frame, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Video format of a port
///
/// `width`/`height` are the buffer dimensions including hardware padding;
/// `crop` is the visible region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoFormat {
    pub encoding: Encoding,
    pub width: u32,
    pub height: u32,
    pub crop: Rect,
}

impl VideoFormat {
    /// True when two formats can sit on either end of a connection
    pub fn is_compatible_with(&self, other: &VideoFormat) -> bool {
        self.encoding == other.encoding && self.width == other.width && self.height == other.height
    }
}

impl fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}x{} (crop {}x{}+{}+{})",
            self.encoding,
            self.width,
            self.height,
            self.crop.width,
            self.crop.height,
            self.crop.x,
            self.crop.y
        )
    }
}

/// Opaque component handle issued by a framework
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub u32);

/// Opaque connection handle issued by a framework
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u32);

/// Which side of a component a port sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortKind {
    Input,
    Output,
    Control,
}

impl PortKind {
    /// Short tag used in port names
    pub fn tag(self) -> &'static str {
        match self {
            PortKind::Input => "in",
            PortKind::Output => "out",
            PortKind::Control => "ctr",
        }
    }
}

/// Reference to one port of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRef {
    pub component: ComponentId,
    pub kind: PortKind,
    pub index: usize,
}

impl PortRef {
    pub fn input(component: ComponentId, index: usize) -> Self {
        Self {
            component,
            kind: PortKind::Input,
            index,
        }
    }

    pub fn output(component: ComponentId, index: usize) -> Self {
        Self {
            component,
            kind: PortKind::Output,
            index,
        }
    }

    pub fn control(component: ComponentId) -> Self {
        Self {
            component,
            kind: PortKind::Control,
            index: 0,
        }
    }
}

/// Framework port name, e.g. `vc.ril.isp:out:0`
pub fn port_name(component: &str, kind: PortKind, index: usize) -> String {
    format!("{}:{}:{}", component, kind.tag(), index)
}

/// Static description of a created component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentInfo {
    pub name: String,
    pub inputs: usize,
    pub outputs: usize,
}

impl ComponentInfo {
    /// Whether `port` exists on this component
    pub fn has_port(&self, kind: PortKind, index: usize) -> bool {
        match kind {
            PortKind::Input => index < self.inputs,
            PortKind::Output => index < self.outputs,
            PortKind::Control => index == 0,
        }
    }
}

/// Port as seen by a control callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    pub name: String,
}

/// Synthetic frame generation modes of the test-pattern source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourcePattern {
    White,
    Black,
    Diagonal,
    Noise,
    #[default]
    Random,
    Colour,
    Blocks,
    Swirly,
}

/// Port parameter understood by the framework
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    /// Request that buffer payloads are not duplicated between stages
    ZeroCopy(bool),
    /// Test-pattern selector on a source output
    SourcePattern(SourcePattern),
}

/// Connection creation flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectionFlags {
    /// Buffers move between the ports inside the framework
    pub tunnelling: bool,
}

impl ConnectionFlags {
    pub const TUNNELLING: ConnectionFlags = ConnectionFlags { tunnelling: true };
}

/// What a control event reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// The component hit an error
    Error { status: Status, message: String },
    /// A parameter changed on the component
    ParameterChanged { name: String },
    /// The component has no more data
    EndOfStream,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Error { status, message } => write!(f, "error {}: {}", status, message),
            EventKind::ParameterChanged { name } => write!(f, "parameter changed: {}", name),
            EventKind::EndOfStream => write!(f, "end of stream"),
        }
    }
}

/// Event buffer delivered on a control port
///
/// The buffer belongs to the framework. Handlers hand it back with
/// [`EventBuffer::release`]; dropping it releases it as well.
pub struct EventBuffer {
    kind: EventKind,
    on_release: Option<Box<dyn FnOnce() + Send>>,
}

impl EventBuffer {
    pub fn new(kind: EventKind, on_release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            kind,
            on_release: Some(Box::new(on_release)),
        }
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// Return the buffer to the framework
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if let Some(release) = self.on_release.take() {
            release();
        }
    }
}

impl Drop for EventBuffer {
    fn drop(&mut self) {
        self.release_inner();
    }
}

impl fmt::Debug for EventBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBuffer")
            .field("kind", &self.kind)
            .field("released", &self.on_release.is_none())
            .finish()
    }
}

/// Handler invoked by the framework for every control event
pub type ControlCallback = fn(&PortInfo, EventBuffer);

/// Result type for bringing a backend up
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors raised while initialising a framework backend
#[derive(Debug, Clone)]
pub enum BackendError {
    /// Backend is not available on this system
    NotAvailable(String),
    /// Failed to initialize backend
    InitializationFailed(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Backend not available: {}", msg),
            BackendError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}
