// SPDX-License-Identifier: GPL-3.0-only

//! Control port event handling

use crate::backends::framework::{EventBuffer, PortInfo};
use tracing::warn;

/// Control port callback shared by every component
///
/// Logs the port the event arrived on and hands the buffer straight back to
/// the framework. Runs on the framework's event thread.
pub fn control_event_logger(port: &PortInfo, buffer: EventBuffer) {
    warn!(
        port = %port.name,
        event = %buffer.kind(),
        "control_event_logger is called by {}",
        port.name
    );
    buffer.release();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::framework::EventKind;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_logger_releases_buffer() {
        let released = Arc::new(AtomicBool::new(false));
        let flag = released.clone();
        let buffer = EventBuffer::new(
            EventKind::ParameterChanged {
                name: "pattern".into(),
            },
            move || flag.store(true, Ordering::SeqCst),
        );
        let port = PortInfo {
            name: "vc.ril.isp:ctr:0".into(),
        };

        control_event_logger(&port, buffer);
        assert!(released.load(Ordering::SeqCst));
    }
}
